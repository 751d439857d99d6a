//! Typed edge collections.
//!
//! A [`RelationSet`] holds every edge of one relation type on top of a
//! [`RelationIndex`], enforcing the schema's record types, cardinality,
//! acyclicity, and attribute kind. It never notifies anyone itself: each
//! mutation returns the [`EdgeChange`]s it committed, and the owning
//! [`RecordGraph`](crate::RecordGraph) publishes them.

use reftree_foundation::{Error, ErrorKind, RecordRef, RecordSet, Result, Role};

use crate::event::EdgeChange;
use crate::index::RelationIndex;
use crate::schema::{Attribute, Cardinality, RelationSchema};

/// Edges of one relation type, with their nested attributes.
///
/// Forward direction is subject -> object.
#[derive(Clone, Debug)]
pub struct RelationSet {
    schema: RelationSchema,
    index: RelationIndex,
    attributes: im::HashMap<(RecordRef, RecordRef), Attribute>,
}

impl RelationSet {
    /// Creates an empty relation set for a schema.
    #[must_use]
    pub fn new(schema: RelationSchema) -> Self {
        Self {
            schema,
            index: RelationIndex::new(),
            attributes: im::HashMap::new(),
        }
    }

    /// The relation's schema.
    #[must_use]
    pub fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    /// The relation's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Adds `subject -> object`, optionally with a nested attribute.
    ///
    /// Adding an existing edge only updates its attribute (when one is
    /// given) and reports no changes. For a one-object-per-subject relation,
    /// a previous edge of the subject is displaced first, so the returned
    /// list is `[Removed(old), Added(new)]`.
    ///
    /// # Errors
    ///
    /// Returns an error, without changing anything, if:
    /// - an endpoint has the wrong record type
    /// - the attribute does not match the schema's attribute kind
    /// - the relation is acyclic and the edge would close a cycle
    pub fn add_edge(
        &mut self,
        subject: RecordRef,
        object: RecordRef,
        attribute: Option<Attribute>,
    ) -> Result<Vec<EdgeChange>> {
        self.insert(subject, object, attribute, true)
    }

    pub(crate) fn insert(
        &mut self,
        subject: RecordRef,
        object: RecordRef,
        attribute: Option<Attribute>,
        check_types: bool,
    ) -> Result<Vec<EdgeChange>> {
        if check_types {
            self.check_types(subject, object)?;
        }
        if let Some(value) = &attribute {
            self.check_attribute(value)?;
        }

        if self.index.contains(subject, object) {
            if let Some(value) = attribute {
                self.attributes.insert((subject, object), value);
            }
            return Ok(Vec::new());
        }

        if self.schema.acyclic && self.would_create_cycle(subject, object) {
            return Err(Error::cycle(self.schema.name.clone(), subject, object));
        }

        let mut changes = Vec::with_capacity(2);
        if self.schema.cardinality == Cardinality::OneObjectPerSubject {
            for old in self.index.forward_set(subject).sorted() {
                if let Some(change) = self.remove_edge(subject, old) {
                    changes.push(change);
                }
            }
        }

        self.index.add_forward(subject, object);
        if let Some(value) = attribute {
            self.attributes.insert((subject, object), value);
        }
        changes.push(EdgeChange::added(subject, object));
        Ok(changes)
    }

    fn check_types(&self, subject: RecordRef, object: RecordRef) -> Result<()> {
        if subject.ty != self.schema.subject_type {
            return Err(Error::record_type_mismatch(
                self.schema.name.clone(),
                Role::Subject,
                self.schema.subject_type,
                subject.ty,
            ));
        }
        if object.ty != self.schema.object_type {
            return Err(Error::record_type_mismatch(
                self.schema.name.clone(),
                Role::Object,
                self.schema.object_type,
                object.ty,
            ));
        }
        Ok(())
    }

    fn check_attribute(&self, value: &Attribute) -> Result<()> {
        if self.schema.accepts(value) {
            return Ok(());
        }
        let expected = self
            .schema
            .attribute
            .map_or_else(|| "no attribute".to_string(), |kind| kind.to_string());
        Err(Error::new(ErrorKind::AttributeKindMismatch {
            relation: self.schema.name.clone(),
            expected,
        }))
    }

    /// Removes `subject -> object` and its attribute.
    ///
    /// Returns the committed change, or `None` if the edge did not exist.
    pub fn remove_edge(&mut self, subject: RecordRef, object: RecordRef) -> Option<EdgeChange> {
        if !self.index.remove_forward(subject, object) {
            return None;
        }
        self.attributes.remove(&(subject, object));
        Some(EdgeChange::removed(subject, object))
    }

    /// Removes every edge touching `record`, in either role.
    pub fn remove_record(&mut self, record: RecordRef) -> Vec<EdgeChange> {
        self.index
            .remove_record(record)
            .into_iter()
            .map(|(subject, object)| {
                self.attributes.remove(&(subject, object));
                EdgeChange::removed(subject, object)
            })
            .collect()
    }

    /// Drops every attribute that points at `record`.
    ///
    /// Returns how many attributes were cleared. The edges themselves stay.
    pub fn clear_attributes_referencing(&mut self, record: RecordRef) -> usize {
        let before = self.attributes.len();
        self.attributes
            .retain(|_, value| value.as_record() != Some(record));
        before - self.attributes.len()
    }

    /// Subjects pointing at `object`.
    #[must_use]
    pub fn subjects_of(&self, object: RecordRef) -> RecordSet {
        self.index.reverse_set(object)
    }

    /// Objects of `subject`.
    #[must_use]
    pub fn objects_of(&self, subject: RecordRef) -> RecordSet {
        self.index.forward_set(subject)
    }

    /// Checks whether `subject -> object` exists.
    #[must_use]
    pub fn contains(&self, subject: RecordRef, object: RecordRef) -> bool {
        self.index.contains(subject, object)
    }

    /// Iterates over every `(subject, object)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (RecordRef, RecordRef)> + '_ {
        self.index.iter()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The attribute attached to an edge, if any.
    #[must_use]
    pub fn get_attribute(&self, subject: RecordRef, object: RecordRef) -> Option<&Attribute> {
        self.attributes.get(&(subject, object))
    }

    /// Attaches an attribute to an existing edge, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `MissingAttributeTarget` if the edge does not exist, or
    /// `AttributeKindMismatch` if the value has the wrong kind.
    pub fn set_attribute(
        &mut self,
        subject: RecordRef,
        object: RecordRef,
        value: Attribute,
    ) -> Result<()> {
        if !self.index.contains(subject, object) {
            return Err(Error::missing_attribute_target(
                self.schema.name.clone(),
                subject,
                object,
            ));
        }
        self.check_attribute(&value)?;
        self.attributes.insert((subject, object), value);
        Ok(())
    }

    /// Detaches the attribute from an edge. Returns the previous value.
    pub fn clear_attribute(&mut self, subject: RecordRef, object: RecordRef) -> Option<Attribute> {
        self.attributes.remove(&(subject, object))
    }

    /// Checks whether adding `subject -> object` would close a cycle.
    ///
    /// Walks forward edges from `object`, visiting each record once; the edge
    /// closes a cycle if the walk reaches `subject`. A self-edge is a cycle.
    #[must_use]
    pub fn would_create_cycle(&self, subject: RecordRef, object: RecordRef) -> bool {
        if subject == object {
            return true;
        }

        let mut visited = RecordSet::new();
        let mut stack = vec![object];
        visited.insert(object);

        while let Some(current) = stack.pop() {
            for next in &self.index.forward_set(current) {
                if *next == subject {
                    return true;
                }
                if visited.insert(*next) {
                    stack.push(*next);
                }
            }
        }
        false
    }

    /// Every record reachable from `record` along forward edges, excluding
    /// `record` itself unless it lies on a cycle.
    #[must_use]
    pub fn reachable_from(&self, record: RecordRef) -> RecordSet {
        let mut reached = RecordSet::new();
        let mut stack = vec![record];

        while let Some(current) = stack.pop() {
            for next in &self.index.forward_set(current) {
                if reached.insert(*next) {
                    stack.push(*next);
                }
            }
        }
        reached
    }
}

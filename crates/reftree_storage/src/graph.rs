//! The record graph: every relation set plus change dispatch.
//!
//! All edge mutations go through [`RecordGraph`] so that each committed
//! change reaches the listeners subscribed to its relation. Listeners run
//! synchronously, in subscription order, after the relation has committed
//! the whole operation; they receive only the event and cannot reach back
//! into the graph.

// Relation counts are bounded by `register`, which refuses to exceed u32
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::fmt;

use reftree_foundation::{Error, ErrorContext, ErrorKind, RecordRef, RecordSet, Result};
use tracing::{debug, trace, warn};

use crate::config::GraphConfig;
use crate::event::{EdgeChange, EdgeEvent, ListenerControl, ListenerId};
use crate::relation::RelationSet;
use crate::schema::{Attribute, RelationId, RelationSchema};

type Listener = Box<dyn FnMut(&EdgeEvent) -> ListenerControl>;

struct Subscription {
    id: ListenerId,
    relation: RelationId,
    listener: Listener,
}

/// Owns one [`RelationSet`] per registered relation type and dispatches
/// their changes.
pub struct RecordGraph {
    config: GraphConfig,
    relations: Vec<RelationSet>,
    by_name: HashMap<String, RelationId>,
    subscriptions: Vec<Subscription>,
    next_listener: u64,
}

impl Default for RecordGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordGraph")
            .field("config", &self.config)
            .field("relations", &self.relations.len())
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

impl RecordGraph {
    /// Creates an empty graph with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Creates an empty graph.
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            relations: Vec::new(),
            by_name: HashMap::new(),
            subscriptions: Vec::new(),
            next_listener: 0,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // =========================================================================
    // Relation registry
    // =========================================================================

    /// Registers a relation type.
    ///
    /// # Errors
    ///
    /// Returns an error if a relation with the same name is already registered.
    pub fn register(&mut self, schema: RelationSchema) -> Result<RelationId> {
        if self.by_name.contains_key(&schema.name) {
            return Err(Error::new(ErrorKind::DuplicateRelation(schema.name)));
        }
        let index = u32::try_from(self.relations.len())
            .map_err(|_| Error::internal("relation registry is full"))?;
        let id = RelationId(index);

        debug!(relation = %schema.name, id = index, acyclic = schema.acyclic, "registered relation");
        self.by_name.insert(schema.name.clone(), id);
        self.relations.push(RelationSet::new(schema));
        Ok(id)
    }

    /// Looks up a relation by name.
    #[must_use]
    pub fn relation_id(&self, name: &str) -> Option<RelationId> {
        self.by_name.get(name).copied()
    }

    /// All registered relation ids, in registration order.
    pub fn relation_ids(&self) -> impl Iterator<Item = RelationId> + '_ {
        (0..self.relations.len()).map(|i| RelationId(i as u32))
    }

    /// The schema of a relation.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` if the id was not issued by this graph.
    pub fn schema(&self, relation: RelationId) -> Result<&RelationSchema> {
        self.relation(relation).map(RelationSet::schema)
    }

    /// Read access to a relation's edges.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` if the id was not issued by this graph.
    pub fn relation(&self, relation: RelationId) -> Result<&RelationSet> {
        self.relations
            .get(relation.0 as usize)
            .ok_or_else(|| Error::unknown_relation(relation.to_string()))
    }

    fn relation_mut(&mut self, relation: RelationId) -> Result<&mut RelationSet> {
        self.relations
            .get_mut(relation.0 as usize)
            .ok_or_else(|| Error::unknown_relation(relation.to_string()))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds an edge and publishes the resulting changes.
    ///
    /// Returns true if a new edge was created. A displaced single-object edge
    /// is published as a removal before the addition.
    ///
    /// # Errors
    ///
    /// See [`RelationSet::add_edge`]. On error nothing is published.
    pub fn add_edge(
        &mut self,
        relation: RelationId,
        subject: RecordRef,
        object: RecordRef,
        attribute: Option<Attribute>,
    ) -> Result<bool> {
        let check_types = self.config.check_record_types;
        let set = self.relation_mut(relation)?;
        let changes = match set.insert(subject, object, attribute, check_types) {
            Ok(changes) => changes,
            Err(err) => {
                if err.is_cycle() {
                    warn!(relation = %set.name(), %subject, %object, "rejected edge that would close a cycle");
                }
                return Err(err.with_context(ErrorContext::new().with_operation("add_edge")));
            }
        };
        let created = !changes.is_empty();
        self.dispatch(relation, &changes);
        Ok(created)
    }

    /// Removes an edge and publishes the removal.
    ///
    /// Returns true if the edge existed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` for a foreign relation id.
    pub fn remove_edge(
        &mut self,
        relation: RelationId,
        subject: RecordRef,
        object: RecordRef,
    ) -> Result<bool> {
        let change = self.relation_mut(relation)?.remove_edge(subject, object);
        match change {
            Some(change) => {
                self.dispatch(relation, &[change]);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Makes `objects` the exact object list of `subject`.
    ///
    /// Objects no longer listed are removed first, then new ones are added
    /// in the given order. Changes are published as they are committed.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected addition and returns its error; changes
    /// committed before it remain in place and have been published.
    pub fn set_objects(
        &mut self,
        relation: RelationId,
        subject: RecordRef,
        objects: &[RecordRef],
    ) -> Result<()> {
        let current = self.relation(relation)?.objects_of(subject);
        let wanted: RecordSet = objects.iter().copied().collect();

        for stale in current.difference(&wanted).sorted() {
            self.remove_edge(relation, subject, stale)?;
        }
        for object in objects {
            if !current.contains(object) {
                self.add_edge(relation, subject, *object, None)
                    .map_err(|err| {
                        let context = err
                            .context
                            .clone()
                            .unwrap_or_default()
                            .with_frame("set_objects");
                        err.with_context(context)
                    })?;
            }
        }
        Ok(())
    }

    /// Attaches a nested attribute to an existing edge.
    ///
    /// # Errors
    ///
    /// See [`RelationSet::set_attribute`].
    pub fn set_attribute(
        &mut self,
        relation: RelationId,
        subject: RecordRef,
        object: RecordRef,
        value: Attribute,
    ) -> Result<()> {
        self.relation_mut(relation)?
            .set_attribute(subject, object, value)
    }

    /// Detaches the nested attribute of an edge.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` for a foreign relation id.
    pub fn clear_attribute(
        &mut self,
        relation: RelationId,
        subject: RecordRef,
        object: RecordRef,
    ) -> Result<Option<Attribute>> {
        Ok(self.relation_mut(relation)?.clear_attribute(subject, object))
    }

    /// Purges a permanently deleted record.
    ///
    /// Removes every edge touching the record in every relation, publishing
    /// each removal, and drops attributes that point at it. Returns the
    /// number of edges removed. Removals are published relation by relation;
    /// no ordering across relations is promised.
    pub fn on_record_deleted(&mut self, record: RecordRef) -> usize {
        let mut removed = 0;
        for index in 0..self.relations.len() {
            let relation = RelationId(index as u32);
            let set = &mut self.relations[index];
            let changes = set.remove_record(record);
            set.clear_attributes_referencing(record);
            removed += changes.len();
            self.dispatch(relation, &changes);
        }
        debug!(%record, removed, "purged deleted record");
        removed
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every `(relation, subject, object)` edge that involves `record`.
    #[must_use]
    pub fn edges_touching(&self, record: RecordRef) -> Vec<(RelationId, RecordRef, RecordRef)> {
        let mut result = Vec::new();
        for (index, set) in self.relations.iter().enumerate() {
            let relation = RelationId(index as u32);
            for object in set.objects_of(record).sorted() {
                result.push((relation, record, object));
            }
            for subject in set.subjects_of(record).sorted() {
                if subject != record {
                    result.push((relation, subject, record));
                }
            }
        }
        result
    }

    /// A structurally shared copy of all relation data, without listeners.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            relations: self.relations.clone(),
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener for one relation's changes.
    ///
    /// The listener must not call back into this graph. Returning
    /// [`ListenerControl::Unsubscribe`] removes it after the current dispatch.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` for a foreign relation id.
    pub fn subscribe<F>(&mut self, relation: RelationId, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&EdgeEvent) -> ListenerControl + 'static,
    {
        let name = self.relation(relation)?.name().to_string();
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.subscriptions.push(Subscription {
            id,
            relation,
            listener: Box::new(listener),
        });
        debug!(relation = %name, listener = id.0, "subscribed listener");
        Ok(id)
    }

    /// Removes a listener. Returns true if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn dispatch(&mut self, relation: RelationId, changes: &[EdgeChange]) {
        if changes.is_empty() {
            return;
        }
        let orientation = self.relations[relation.0 as usize].schema().orientation;
        let mut dropped = Vec::new();

        for change in changes {
            let event = EdgeEvent {
                relation,
                change: *change,
                orientation,
            };
            if self.config.trace_events {
                trace!(%event, "dispatching edge change");
            }
            for subscription in &mut self.subscriptions {
                if subscription.relation != relation || dropped.contains(&subscription.id) {
                    continue;
                }
                if (subscription.listener)(&event) == ListenerControl::Unsubscribe {
                    dropped.push(subscription.id);
                }
            }
        }

        if !dropped.is_empty() {
            debug!(count = dropped.len(), "dropping listeners that unsubscribed");
            self.subscriptions.retain(|s| !dropped.contains(&s.id));
        }
    }
}

/// Read-only copy of a graph's relations, as taken by
/// [`RecordGraph::snapshot`].
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    relations: Vec<RelationSet>,
}

impl GraphSnapshot {
    /// Read access to a relation's edges at snapshot time.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` if the relation did not exist yet.
    pub fn relation(&self, relation: RelationId) -> Result<&RelationSet> {
        self.relations
            .get(relation.0 as usize)
            .ok_or_else(|| Error::unknown_relation(relation.to_string()))
    }

    /// Total number of edges across all relations.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.relations.iter().map(RelationSet::len).sum()
    }
}

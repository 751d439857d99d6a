//! Live tree projections.
//!
//! A [`TreeProjection`] listens to one or more relations of a
//! [`RecordGraph`] and keeps a rooted tree of rows in step with their edges.
//! The same record may appear under several parents, so every operation works
//! on all rows of a record at once.
//!
//! The projection keeps its own union of the subscribed relations as a
//! parent -> child [`RelationIndex`], with a support count per pair. A pair
//! contributed by two relations renders one row and stays until both edges
//! are gone.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::mem;
use std::rc::Rc;

use reftree_foundation::{Error, ErrorKind, RecordRef, RecordSet, RecordType, Result};
use reftree_storage::{
    ListenerControl, ListenerId, RecordGraph, RelationId, RelationIndex, TreeOrientation,
};
use tracing::{debug, error, trace, warn};

use crate::arena::{RowArena, RowId};
use crate::batch::Batch;
use crate::config::ProjectionConfig;
use crate::factory::{NoObserver, RowFactory, TreeId, TreeObserver};
use crate::rows::RecordRows;

// =============================================================================
// Public types
// =============================================================================

/// How a subscribed relation's edges map onto the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Use the orientation declared by the relation.
    AsDeclared,
    /// Swap child and parent.
    Reversed,
}

/// Lifecycle state of a projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectionState {
    /// No root.
    Empty,
    /// A root row with no children.
    Rooted,
    /// A root row with at least one child.
    Populated,
}

/// Read-only view of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRow {
    /// Row handle.
    pub id: RowId,
    /// Record the row represents.
    pub record: RecordRef,
    /// Parent row, `None` for the root.
    pub parent: Option<RowId>,
    /// Child rows in sibling order.
    pub children: Vec<RowId>,
    /// Whether the UI shows this row expanded.
    pub expanded: bool,
}

// =============================================================================
// Internal state
// =============================================================================

struct RowNode<R, K> {
    record: RecordRef,
    parent: Option<RowId>,
    children: Vec<RowId>,
    key: K,
    payload: R,
    expanded: bool,
}

#[derive(Clone, Copy, Debug)]
struct Subscription {
    relation: RelationId,
    orientation: TreeOrientation,
    listener: ListenerId,
}

pub(crate) struct Projection<F: RowFactory> {
    id: TreeId,
    config: ProjectionConfig,
    factory: F,
    observer: Box<dyn TreeObserver>,
    subscriptions: Vec<Subscription>,
    record_types: BTreeSet<RecordType>,
    links: RelationIndex,
    support: HashMap<(RecordRef, RecordRef), u32>,
    rows: RowArena<RowNode<F::Row, F::Key>>,
    record_rows: RecordRows,
    root: Option<RowId>,
    batch_depth: u32,
    pending_hidden: Vec<RecordRef>,
    pending_vacated: Vec<RecordRef>,
}

impl<F: RowFactory> Projection<F> {
    fn new(factory: F, config: ProjectionConfig) -> Self {
        Self {
            id: TreeId::next(),
            config,
            factory,
            observer: Box::new(NoObserver),
            subscriptions: Vec::new(),
            record_types: BTreeSet::new(),
            links: RelationIndex::new(),
            support: HashMap::new(),
            rows: RowArena::default(),
            record_rows: RecordRows::default(),
            root: None,
            batch_depth: 0,
            pending_hidden: Vec::new(),
            pending_vacated: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.rows.clear();
        self.record_rows.clear();
        self.root = None;
        self.links.clear();
        self.support.clear();
        self.pending_hidden.clear();
        self.pending_vacated.clear();
    }

    fn state(&self) -> ProjectionState {
        match self.root.and_then(|root| self.rows.get(root)) {
            None => ProjectionState::Empty,
            Some(node) if node.children.is_empty() => ProjectionState::Rooted,
            Some(_) => ProjectionState::Populated,
        }
    }

    // -------------------------------------------------------------------------
    // Union links
    // -------------------------------------------------------------------------

    /// Counts one more supporting edge without touching rows.
    fn seed(&mut self, child: RecordRef, parent: RecordRef) {
        *self.support.entry((parent, child)).or_insert(0) += 1;
        self.links.add_forward(parent, child);
    }

    fn assign_parent(&mut self, child: RecordRef, parent: RecordRef) {
        let count = self.support.entry((parent, child)).or_insert(0);
        *count += 1;
        if *count > 1 {
            return;
        }
        self.links.add_forward(parent, child);

        for row in self.record_rows.rows_for(parent).to_vec() {
            if let Some(child_row) = self.attach_child(row, child) {
                self.attach_descendants(child_row);
            }
        }
    }

    fn unassign_parent(&mut self, child: RecordRef, parent: RecordRef) {
        let Some(count) = self.support.get_mut(&(parent, child)) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }
        self.support.remove(&(parent, child));
        self.detach_link(child, parent);
    }

    /// Drops the link and every row it backs, whatever its support.
    fn detach_link(&mut self, child: RecordRef, parent: RecordRef) {
        self.links.remove_forward(parent, child);

        let mut vacated = false;
        for row in self.record_rows.rows_for(parent).to_vec() {
            let doomed: Vec<RowId> = self.rows.get(row).map_or_else(Vec::new, |node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|c| self.rows.get(*c).is_some_and(|n| n.record == child))
                    .collect()
            });
            if doomed.is_empty() {
                continue;
            }
            if let Some(node) = self.rows.get_mut(row) {
                node.children.retain(|c| !doomed.contains(c));
                vacated |= node.children.is_empty();
            }
            for subtree in doomed {
                self.teardown(subtree);
            }
        }

        if vacated && self.all_rows_childless(parent) {
            self.note_vacated(parent);
        }
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    fn create_row(&mut self, record: RecordRef, parent: Option<RowId>) -> RowId {
        let key = self.factory.sort_key(record);
        let payload = self.factory.create_row(record, self.id);
        let id = self.rows.insert(RowNode {
            record,
            parent,
            children: Vec::new(),
            key,
            payload,
            expanded: false,
        });
        if let Some(parent) = parent {
            self.insert_sorted(parent, id);
        }
        if self.record_rows.insert(record, id) {
            // A record hidden and shown again inside one batch is reported as
            // neither.
            if let Some(pos) = self.pending_hidden.iter().position(|r| *r == record) {
                self.pending_hidden.remove(pos);
            } else {
                self.observer.record_shown(record);
            }
        }
        if self.config.trace_rows {
            trace!(tree = %self.config.label, %record, row = ?id, "created row");
        }
        id
    }

    fn insert_sorted(&mut self, parent: RowId, child: RowId) {
        let Some(node) = self.rows.get(child) else {
            return;
        };
        let Some(parent_node) = self.rows.get(parent) else {
            return;
        };
        let pos = parent_node.children.partition_point(|sibling| {
            self.rows
                .get(*sibling)
                .is_some_and(|s| (&s.key, s.record) < (&node.key, node.record))
        });
        if let Some(parent_node) = self.rows.get_mut(parent) {
            parent_node.children.insert(pos, child);
        }
    }

    fn attach_child(&mut self, parent_row: RowId, child: RecordRef) -> Option<RowId> {
        if self.config.guard_ancestors && self.on_path(parent_row, child) {
            return None;
        }
        Some(self.create_row(child, Some(parent_row)))
    }

    /// Materializes everything below `start` from the union links.
    fn attach_descendants(&mut self, start: RowId) {
        let mut stack = vec![start];
        while let Some(row) = stack.pop() {
            let Some(record) = self.rows.get(row).map(|n| n.record) else {
                continue;
            };
            for child in self.links.forward_set(record).sorted() {
                if let Some(child_row) = self.attach_child(row, child) {
                    stack.push(child_row);
                }
            }
        }
    }

    /// True if `record` is shown by `row` or any of its ancestors.
    fn on_path(&self, row: RowId, record: RecordRef) -> bool {
        let mut current = Some(row);
        while let Some(id) = current {
            let Some(node) = self.rows.get(id) else {
                break;
            };
            if node.record == record {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Removes `row` and its subtree. The caller has already unlinked `row`
    /// from its parent.
    fn teardown(&mut self, row: RowId) {
        let mut order = Vec::new();
        let mut stack = vec![row];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.rows.get(current) {
                stack.extend(node.children.iter().copied());
                order.push(current);
            }
        }

        // Children go before their parents.
        for current in order.into_iter().rev() {
            let Some(node) = self.rows.remove(current) else {
                continue;
            };
            if self.config.trace_rows {
                trace!(tree = %self.config.label, record = %node.record, row = ?current, "removed row");
            }
            if self.record_rows.remove(node.record, current) {
                self.note_hidden(node.record);
            }
        }
    }

    fn all_rows_childless(&self, record: RecordRef) -> bool {
        self.record_rows
            .rows_for(record)
            .iter()
            .all(|r| self.rows.get(*r).is_some_and(|n| n.children.is_empty()))
    }

    fn resort(&mut self, record: RecordRef) -> usize {
        let rows = self.record_rows.rows_for(record).to_vec();
        for row in &rows {
            let key = self.factory.sort_key(record);
            let Some(node) = self.rows.get_mut(*row) else {
                continue;
            };
            node.key = key;
            let Some(parent) = node.parent else {
                continue;
            };
            if let Some(parent_node) = self.rows.get_mut(parent) {
                parent_node.children.retain(|c| c != row);
            }
            self.insert_sorted(parent, *row);
        }
        rows.len()
    }

    // -------------------------------------------------------------------------
    // Observer notifications
    // -------------------------------------------------------------------------

    fn note_hidden(&mut self, record: RecordRef) {
        if self.batch_depth > 0 {
            if !self.pending_hidden.contains(&record) {
                self.pending_hidden.push(record);
            }
        } else {
            self.observer.record_hidden(record);
        }
    }

    fn note_vacated(&mut self, record: RecordRef) {
        if self.batch_depth > 0 {
            if !self.pending_vacated.contains(&record) {
                self.pending_vacated.push(record);
            }
        } else {
            self.observer.children_vacated(record);
        }
    }

    fn sweep(&mut self) {
        let vacated = mem::take(&mut self.pending_vacated);
        let hidden = mem::take(&mut self.pending_hidden);
        let mut reported = 0usize;

        for record in vacated {
            if self.record_rows.contains(record) && self.all_rows_childless(record) {
                self.observer.children_vacated(record);
                reported += 1;
            }
        }
        for record in hidden {
            if !self.record_rows.contains(record) {
                self.observer.record_hidden(record);
                reported += 1;
            }
        }
        debug!(tree = %self.config.label, reported, "batch sweep");
    }
}

// =============================================================================
// TreeProjection
// =============================================================================

/// A rooted, incrementally maintained tree over one or more relations.
///
/// The handle is cheap to clone; clones share the same projection. Graph
/// listeners only hold a weak reference, so dropping the last handle makes
/// them unsubscribe on the next event.
///
/// Methods must not be called from inside a [`TreeObserver`] hook or a
/// [`RowFactory`] method of the same projection.
pub struct TreeProjection<F: RowFactory> {
    inner: Rc<RefCell<Projection<F>>>,
}

impl<F: RowFactory> Clone for TreeProjection<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F: RowFactory> fmt::Debug for TreeProjection<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("TreeProjection")
                .field("id", &inner.id)
                .field("label", &inner.config.label)
                .field("rows", &inner.rows.len())
                .field("links", &inner.links.len())
                .finish(),
            Err(_) => f.write_str("TreeProjection(<busy>)"),
        }
    }
}

impl<F: RowFactory + 'static> TreeProjection<F> {
    /// Creates an empty projection.
    #[must_use]
    pub fn new(factory: F, config: ProjectionConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Projection::new(factory, config))),
        }
    }

    /// Installs an observer, replacing any previous one.
    #[must_use]
    pub fn with_observer(self, observer: impl TreeObserver + 'static) -> Self {
        self.inner.borrow_mut().observer = Box::new(observer);
        self
    }

    /// Identifier handed to the factory with every row.
    #[must_use]
    pub fn id(&self) -> TreeId {
        self.inner.borrow().id
    }

    /// Label from the configuration.
    #[must_use]
    pub fn label(&self) -> String {
        self.inner.borrow().config.label.clone()
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Listens to `relation` on `graph`.
    ///
    /// If the projection already has a root, the relation's current edges are
    /// projected right away.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelation` for a relation `graph` does not know and
    /// `DuplicateSubscription` if this relation is already subscribed in the
    /// same direction.
    pub fn subscribe_relation(
        &self,
        graph: &mut RecordGraph,
        relation: RelationId,
        direction: Direction,
    ) -> Result<()> {
        let schema = graph.schema(relation)?;
        let orientation = match direction {
            Direction::AsDeclared => schema.orientation,
            Direction::Reversed => schema.orientation.flipped(),
        };
        let name = schema.name.clone();
        let (subject_type, object_type) = (schema.subject_type, schema.object_type);

        let duplicate = self
            .inner
            .borrow()
            .subscriptions
            .iter()
            .any(|s| s.relation == relation && s.orientation == orientation);
        if duplicate {
            return Err(Error::new(ErrorKind::DuplicateSubscription { relation: name }));
        }

        let weak = Rc::downgrade(&self.inner);
        let label = self.label();
        let listener = graph.subscribe(relation, move |event| {
            let Some(inner) = weak.upgrade() else {
                warn!(tree = %label, "projection dropped; unsubscribing");
                return ListenerControl::Unsubscribe;
            };
            let Ok(mut projection) = inner.try_borrow_mut() else {
                error!(tree = %label, %event, "projection busy; edge change dropped");
                return ListenerControl::Continue;
            };
            let (child, parent, added) = event.tree_view(orientation);
            if added {
                projection.assign_parent(child, parent);
            } else {
                projection.unassign_parent(child, parent);
            }
            ListenerControl::Continue
        })?;

        let existing: Vec<(RecordRef, RecordRef)> = graph.relation(relation)?.edges().collect();
        let mut inner = self.inner.borrow_mut();
        inner.subscriptions.push(Subscription {
            relation,
            orientation,
            listener,
        });
        inner.record_types.insert(subject_type);
        inner.record_types.insert(object_type);
        if inner.root.is_some() {
            for (subject, object) in existing {
                let (child, parent) = orientation.child_parent(subject, object);
                inner.assign_parent(child, parent);
            }
        }
        debug!(tree = %inner.config.label, relation = %name, ?direction, "subscribed relation");
        Ok(())
    }

    /// Removes every graph listener of this projection. Returns how many
    /// were removed. Rows stay as they are.
    pub fn detach(&self, graph: &mut RecordGraph) -> usize {
        let subscriptions = mem::take(&mut self.inner.borrow_mut().subscriptions);
        subscriptions
            .into_iter()
            .filter(|s| graph.unsubscribe(s.listener))
            .count()
    }

    /// Record types appearing on either end of a subscribed relation.
    #[must_use]
    pub fn record_types(&self) -> Vec<RecordType> {
        self.inner.borrow().record_types.iter().copied().collect()
    }

    // -------------------------------------------------------------------------
    // Root and lifecycle
    // -------------------------------------------------------------------------

    /// Rebuilds the projection under `record`.
    ///
    /// # Errors
    ///
    /// Returns `NotSubscribed` if no relation has been subscribed, or
    /// `UnknownRelation` if a subscribed relation is foreign to `graph`.
    pub fn set_root(&self, graph: &RecordGraph, record: RecordRef) -> Result<RowId> {
        let mut inner = self.inner.borrow_mut();
        if inner.subscriptions.is_empty() {
            return Err(Error::new(ErrorKind::NotSubscribed));
        }
        inner.reset();

        let subscriptions = inner.subscriptions.clone();
        for sub in subscriptions {
            for (subject, object) in graph.relation(sub.relation)?.edges() {
                let (child, parent) = sub.orientation.child_parent(subject, object);
                inner.seed(child, parent);
            }
        }

        let root = inner.create_row(record, None);
        inner.root = Some(root);
        inner.attach_descendants(root);
        if inner.config.expand_root {
            if let Some(node) = inner.rows.get_mut(root) {
                node.expanded = true;
            }
        }
        debug!(
            tree = %inner.config.label,
            %record,
            rows = inner.rows.len(),
            links = inner.links.len(),
            "set root"
        );
        Ok(root)
    }

    /// Drops the root, every row and every union link. Observers are not
    /// notified. Subscriptions stay.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.reset();
        debug!(tree = %inner.config.label, "cleared");
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProjectionState {
        self.inner.borrow().state()
    }

    /// The root row.
    #[must_use]
    pub fn root(&self) -> Option<RowId> {
        self.inner.borrow().root
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Every row currently showing `record`, in creation order.
    #[must_use]
    pub fn rows_for(&self, record: RecordRef) -> Vec<RowId> {
        self.inner.borrow().record_rows.rows_for(record).to_vec()
    }

    /// True if `record` has at least one row.
    #[must_use]
    pub fn contains_record(&self, record: RecordRef) -> bool {
        self.inner.borrow().record_rows.contains(record)
    }

    /// Snapshot of one row.
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<TreeRow> {
        self.inner.borrow().rows.get(id).map(|node| TreeRow {
            id,
            record: node.record,
            parent: node.parent,
            children: node.children.clone(),
            expanded: node.expanded,
        })
    }

    /// Child rows of `id` in sibling order.
    #[must_use]
    pub fn children_of(&self, id: RowId) -> Vec<RowId> {
        self.inner
            .borrow()
            .rows
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Records of the child rows of `id` in sibling order.
    #[must_use]
    pub fn children_records(&self, id: RowId) -> Vec<RecordRef> {
        let inner = self.inner.borrow();
        inner.rows.get(id).map_or_else(Vec::new, |node| {
            node.children
                .iter()
                .filter_map(|c| inner.rows.get(*c).map(|n| n.record))
                .collect()
        })
    }

    /// Clone of a row's payload.
    #[must_use]
    pub fn payload(&self, id: RowId) -> Option<F::Row>
    where
        F::Row: Clone,
    {
        self.with_payload(id, Clone::clone)
    }

    /// Runs `f` on a row's payload.
    pub fn with_payload<R>(&self, id: RowId, f: impl FnOnce(&F::Row) -> R) -> Option<R> {
        self.inner.borrow().rows.get(id).map(|node| f(&node.payload))
    }

    /// Runs `f` on a row's payload mutably.
    pub fn with_payload_mut<R>(&self, id: RowId, f: impl FnOnce(&mut F::Row) -> R) -> Option<R> {
        self.inner
            .borrow_mut()
            .rows
            .get_mut(id)
            .map(|node| f(&mut node.payload))
    }

    /// Walks from `id` up to the root, both included.
    #[must_use]
    pub fn path_to_root(&self, id: RowId) -> Vec<RowId> {
        let inner = self.inner.borrow();
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(row) = current {
            let Some(node) = inner.rows.get(row) else {
                break;
            };
            path.push(row);
            current = node.parent;
        }
        path
    }

    /// Every record with at least one row.
    #[must_use]
    pub fn reachable_records(&self) -> RecordSet {
        self.inner.borrow().record_rows.records()
    }

    /// Number of live rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.inner.borrow().rows.len()
    }

    /// Number of distinct parent -> child links in the union.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.inner.borrow().links.len()
    }

    /// Pre-order listing of `(depth, record)` starting at the root.
    #[must_use]
    pub fn outline(&self) -> Vec<(usize, RecordRef)> {
        let inner = self.inner.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<(RowId, usize)> = inner.root.into_iter().map(|r| (r, 0)).collect();
        while let Some((row, depth)) = stack.pop() {
            let Some(node) = inner.rows.get(row) else {
                continue;
            };
            out.push((depth, node.record));
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Marks a row expanded. Returns false for a stale row.
    pub fn expand(&self, id: RowId) -> bool {
        self.set_expanded(id, true)
    }

    /// Marks a row collapsed. Returns false for a stale row.
    pub fn collapse(&self, id: RowId) -> bool {
        self.set_expanded(id, false)
    }

    /// Expands the root row.
    pub fn expand_main_branch(&self) -> bool {
        self.root().is_some_and(|root| self.expand(root))
    }

    /// Whether a row is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: RowId) -> bool {
        self.inner.borrow().rows.get(id).is_some_and(|n| n.expanded)
    }

    fn set_expanded(&self, id: RowId, expanded: bool) -> bool {
        match self.inner.borrow_mut().rows.get_mut(id) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Local edits
    // -------------------------------------------------------------------------

    /// Re-reads the sort key of `record` and repositions each of its rows.
    /// Returns the number of rows touched.
    pub fn refresh_record(&self, record: RecordRef) -> usize {
        self.inner.borrow_mut().resort(record)
    }

    /// Drops every union link touching `record` from this projection only.
    /// The graph is not modified; a later edge event for the same pair is
    /// projected again.
    pub fn remove_record(&self, record: RecordRef) {
        let mut inner = self.inner.borrow_mut();
        for child in inner.links.forward_set(record).sorted() {
            inner.support.remove(&(record, child));
            inner.detach_link(child, record);
        }
        for parent in inner.links.reverse_set(record).sorted() {
            inner.support.remove(&(parent, record));
            inner.detach_link(record, parent);
        }
        debug!(tree = %inner.config.label, %record, "removed record links");
    }

    /// Replays this projection's union links into `dest`, skipping links
    /// `dest` already has. Copying into the same projection does nothing.
    pub fn copy_links_to<G: RowFactory + 'static>(&self, dest: &TreeProjection<G>) {
        if Rc::as_ptr(&self.inner).cast::<()>() == Rc::as_ptr(&dest.inner).cast::<()>() {
            return;
        }
        let pairs: Vec<(RecordRef, RecordRef)> = self.inner.borrow().links.iter().collect();
        let mut target = dest.inner.borrow_mut();
        let mut copied = 0usize;
        for (parent, child) in pairs {
            if !target.links.contains(parent, child) {
                target.assign_parent(child, parent);
                copied += 1;
            }
        }
        debug!(from = %self.label(), to = %target.config.label, copied, "copied links");
    }

    // -------------------------------------------------------------------------
    // Batch scope
    // -------------------------------------------------------------------------

    /// Opens a batch scope. Scopes nest.
    pub fn begin_batch(&self) {
        self.inner.borrow_mut().batch_depth += 1;
    }

    /// Closes a batch scope. Closing the outermost scope reports deferred
    /// `children_vacated` and `record_hidden` checks once per record.
    pub fn end_batch(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.batch_depth == 0 {
            warn!(tree = %inner.config.label, "end_batch without begin_batch");
            return;
        }
        inner.batch_depth -= 1;
        if inner.batch_depth == 0 {
            inner.sweep();
        }
    }

    /// Opens a batch scope that closes when the guard is dropped.
    #[must_use = "the batch ends as soon as the guard is dropped"]
    pub fn batch(&self) -> Batch<'_, F> {
        self.begin_batch();
        Batch::new(self)
    }

    /// True while at least one batch scope is open.
    #[must_use]
    pub fn in_batch(&self) -> bool {
        self.inner.borrow().batch_depth > 0
    }
}

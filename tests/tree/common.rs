//! Shared fixtures for tree projection tests.

use reftree_foundation::{Interner, RecordRef, RecordType};
use reftree_storage::{RecordGraph, RelationId, RelationSchema, TreeOrientation};
use reftree_tree::{Direction, ProjectionConfig, RowFactory, TreeId, TreeProjection};

/// Orders siblings by record id. The payload remembers the record and tree.
pub struct ById;

impl RowFactory for ById {
    type Row = (RecordRef, TreeId);
    type Key = u64;

    fn create_row(&mut self, record: RecordRef, tree: TreeId) -> Self::Row {
        (record, tree)
    }

    fn sort_key(&self, record: RecordRef) -> u64 {
        record.id.raw()
    }
}

/// A graph with one acyclic `parent -> child` relation over `node` records.
pub struct Fixture {
    pub graph: RecordGraph,
    pub rel: RelationId,
    pub node: RecordType,
}

impl Fixture {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let node = interner.intern("node");
        let mut graph = RecordGraph::new();
        let rel = graph
            .register(
                RelationSchema::new("parent-of", node, node)
                    .acyclic()
                    .with_orientation(TreeOrientation::ObjectIsChild),
            )
            .unwrap();
        Self { graph, rel, node }
    }

    pub fn r(&self, id: u64) -> RecordRef {
        RecordRef::new(self.node, id)
    }

    pub fn link(&mut self, parent: u64, child: u64) {
        let (p, c) = (self.r(parent), self.r(child));
        self.graph.add_edge(self.rel, p, c, None).unwrap();
    }

    pub fn unlink(&mut self, parent: u64, child: u64) {
        let (p, c) = (self.r(parent), self.r(child));
        self.graph.remove_edge(self.rel, p, c).unwrap();
    }

    pub fn tree(&mut self) -> TreeProjection<ById> {
        let tree = TreeProjection::new(ById, ProjectionConfig::named("test"));
        tree.subscribe_relation(&mut self.graph, self.rel, Direction::AsDeclared)
            .unwrap();
        tree
    }
}

/// `(depth, id)` pairs of a projection's outline.
pub fn outline_ids<F: RowFactory + 'static>(tree: &TreeProjection<F>) -> Vec<(usize, u64)> {
    tree.outline()
        .into_iter()
        .map(|(depth, record)| (depth, record.id.raw()))
        .collect()
}

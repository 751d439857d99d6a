//! A work library: works sit in folders, folders nest under a single parent.
//! Two projections share one graph.

use reftree::foundation::{Interner, RecordRef, RecordType};
use reftree::storage::{Cardinality, RecordGraph, RelationId, RelationSchema};
use reftree::tree::{Direction, ProjectionConfig, RowFactory, TreeId, TreeProjection};

struct Library {
    graph: RecordGraph,
    folder: RecordType,
    work: RecordType,
    parent_folder: RelationId,
    work_in_folder: RelationId,
}

impl Library {
    fn new() -> Self {
        let mut interner = Interner::new();
        let folder = interner.intern("folder");
        let work = interner.intern("work");
        let mut graph = RecordGraph::new();
        let parent_folder = graph
            .register(
                RelationSchema::new("parent-folder", folder, folder)
                    .with_cardinality(Cardinality::OneObjectPerSubject)
                    .acyclic(),
            )
            .unwrap();
        let work_in_folder = graph
            .register(RelationSchema::new("work-in-folder", work, folder))
            .unwrap();
        Self {
            graph,
            folder,
            work,
            parent_folder,
            work_in_folder,
        }
    }

    fn folder(&self, id: u64) -> RecordRef {
        RecordRef::new(self.folder, id)
    }

    fn work(&self, id: u64) -> RecordRef {
        RecordRef::new(self.work, id)
    }

    fn tree(&mut self, label: &str, relations: &[RelationId]) -> TreeProjection<Plain> {
        let tree = TreeProjection::new(Plain, ProjectionConfig::named(label));
        for rel in relations {
            tree.subscribe_relation(&mut self.graph, *rel, Direction::AsDeclared)
                .unwrap();
        }
        tree
    }
}

struct Plain;

impl RowFactory for Plain {
    type Row = ();
    type Key = RecordRef;

    fn create_row(&mut self, _record: RecordRef, _tree: TreeId) {}

    fn sort_key(&self, record: RecordRef) -> RecordRef {
        record
    }
}

#[test]
fn reparenting_a_folder_displaces_it() {
    let mut lib = Library::new();
    let (root, a, b) = (lib.folder(0), lib.folder(1), lib.folder(2));
    let rels = [lib.parent_folder, lib.work_in_folder];
    let tree = lib.tree("folders", &rels);
    tree.set_root(&lib.graph, root).unwrap();

    lib.graph.add_edge(lib.parent_folder, a, root, None).unwrap();
    lib.graph.add_edge(lib.parent_folder, b, root, None).unwrap();
    let w = lib.work(1);
    lib.graph.add_edge(lib.work_in_folder, w, a, None).unwrap();

    // One parent per folder: moving `a` under `b` drops it from the root.
    lib.graph.add_edge(lib.parent_folder, a, b, None).unwrap();
    assert_eq!(
        tree.outline(),
        vec![(0, root), (1, b), (2, a), (3, w)]
    );
}

#[test]
fn work_in_several_folders() {
    let mut lib = Library::new();
    let (root, a, b) = (lib.folder(0), lib.folder(1), lib.folder(2));
    let rels = [lib.parent_folder, lib.work_in_folder];
    let tree = lib.tree("folders", &rels);
    lib.graph.add_edge(lib.parent_folder, a, root, None).unwrap();
    lib.graph.add_edge(lib.parent_folder, b, root, None).unwrap();
    tree.set_root(&lib.graph, root).unwrap();

    let w = lib.work(7);
    lib.graph.set_objects(lib.work_in_folder, w, &[a, b]).unwrap();
    assert_eq!(tree.rows_for(w).len(), 2);

    lib.graph.set_objects(lib.work_in_folder, w, &[b]).unwrap();
    let rows = tree.rows_for(w);
    assert_eq!(rows.len(), 1);
    let parent = tree.row(rows[0]).unwrap().parent.unwrap();
    assert_eq!(tree.row(parent).unwrap().record, b);
}

#[test]
fn two_projections_stay_independent() {
    let mut lib = Library::new();
    let (root, a) = (lib.folder(0), lib.folder(1));
    let (parent_folder, work_in_folder) = (lib.parent_folder, lib.work_in_folder);
    let everything = lib.tree("everything", &[parent_folder, work_in_folder]);
    let folders_only = lib.tree("folders-only", &[parent_folder]);
    everything.set_root(&lib.graph, root).unwrap();
    folders_only.set_root(&lib.graph, root).unwrap();

    let w = lib.work(1);
    lib.graph.add_edge(lib.parent_folder, a, root, None).unwrap();
    lib.graph.add_edge(lib.work_in_folder, w, a, None).unwrap();

    assert_eq!(everything.row_count(), 3);
    assert_eq!(folders_only.row_count(), 2);
    assert_ne!(everything.id(), folders_only.id());

    everything.remove_record(a);
    assert_eq!(everything.row_count(), 1);
    assert_eq!(folders_only.row_count(), 2);
}

#[test]
fn dropping_a_projection_releases_its_listeners() {
    let mut lib = Library::new();
    let root = lib.folder(0);
    let rels = [lib.parent_folder, lib.work_in_folder];
    let tree = lib.tree("short-lived", &rels);
    tree.set_root(&lib.graph, root).unwrap();
    assert_eq!(lib.graph.listener_count(), 2);

    let (sub, w) = (lib.folder(1), lib.work(1));
    drop(tree);
    lib.graph.add_edge(lib.parent_folder, sub, root, None).unwrap();
    assert_eq!(lib.graph.listener_count(), 1);
    lib.graph.add_edge(lib.work_in_folder, w, root, None).unwrap();
    assert_eq!(lib.graph.listener_count(), 0);
}

#[test]
fn detach_freezes_projection() {
    let mut lib = Library::new();
    let root = lib.folder(0);
    let rels = [lib.parent_folder];
    let tree = lib.tree("frozen", &rels);
    tree.set_root(&lib.graph, root).unwrap();

    assert_eq!(tree.detach(&mut lib.graph), 1);
    let sub = lib.folder(1);
    lib.graph.add_edge(lib.parent_folder, sub, root, None).unwrap();
    assert_eq!(tree.row_count(), 1);
}

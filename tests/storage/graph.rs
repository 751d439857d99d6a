//! Integration tests for the record graph
//!
//! Tests registration, listener dispatch, bulk updates, and record deletion.

use std::cell::RefCell;
use std::rc::Rc;

use reftree_foundation::{ErrorKind, Interner, RecordRef};
use reftree_storage::{
    Attribute, AttributeKind, Cardinality, EdgeChangeKind, GraphConfig, ListenerControl,
    RecordGraph, RelationSchema,
};

// =============================================================================
// Registration
// =============================================================================

#[test]
fn register_and_look_up_relations() {
    let mut interner = Interner::new();
    let work = interner.intern("work");
    let folder = interner.intern("folder");
    let mut graph = RecordGraph::new();

    let rel = graph
        .register(RelationSchema::new("work-in-folder", work, folder))
        .unwrap();
    assert_eq!(graph.relation_id("work-in-folder"), Some(rel));
    assert_eq!(graph.schema(rel).unwrap().subject_type, work);

    let err = graph
        .register(RelationSchema::new("work-in-folder", work, folder))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateRelation(_)));
    assert_eq!(graph.relation_ids().count(), 1);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn listeners_see_displacement_as_removed_then_added() {
    let mut interner = Interner::new();
    let argument = interner.intern("argument");
    let position = interner.intern("position");
    let mut graph = RecordGraph::new();
    let rel = graph
        .register(
            RelationSchema::new("position-of-argument", argument, position)
                .with_cardinality(Cardinality::OneObjectPerSubject),
        )
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    graph
        .subscribe(rel, move |event| {
            sink.borrow_mut().push((event.change.kind, event.object()));
            ListenerControl::Continue
        })
        .unwrap();

    let a = RecordRef::new(argument, 1);
    let (p1, p2) = (RecordRef::new(position, 1), RecordRef::new(position, 2));
    graph.add_edge(rel, a, p1, None).unwrap();
    graph.add_edge(rel, a, p2, None).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            (EdgeChangeKind::Added, p1),
            (EdgeChangeKind::Removed, p1),
            (EdgeChangeKind::Added, p2),
        ]
    );
}

#[test]
fn rejected_edge_publishes_nothing() {
    let mut interner = Interner::new();
    let node = interner.intern("node");
    let r = |id| RecordRef::new(node, id);
    let mut graph = RecordGraph::new();
    let rel = graph
        .register(RelationSchema::new("child", node, node).acyclic())
        .unwrap();

    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    graph
        .subscribe(rel, move |_| {
            *sink.borrow_mut() += 1;
            ListenerControl::Continue
        })
        .unwrap();

    graph.add_edge(rel, r(1), r(2), None).unwrap();
    graph.add_edge(rel, r(2), r(3), None).unwrap();
    let err = graph.add_edge(rel, r(3), r(1), None).unwrap_err();

    assert!(err.is_cycle());
    assert_eq!(
        err.context.and_then(|c| c.operation).as_deref(),
        Some("add_edge")
    );
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn listener_can_unsubscribe_itself() {
    let mut interner = Interner::new();
    let node = interner.intern("node");
    let r = |id| RecordRef::new(node, id);
    let mut graph = RecordGraph::new();
    let rel = graph
        .register(RelationSchema::new("child", node, node))
        .unwrap();

    graph
        .subscribe(rel, |_| ListenerControl::Unsubscribe)
        .unwrap();
    assert_eq!(graph.listener_count(), 1);

    graph.add_edge(rel, r(1), r(2), None).unwrap();
    assert_eq!(graph.listener_count(), 0);
}

// =============================================================================
// Bulk Updates
// =============================================================================

#[test]
fn set_objects_replaces_object_list() {
    let mut interner = Interner::new();
    let work = interner.intern("work");
    let person = interner.intern("person");
    let mut graph = RecordGraph::new();
    let rel = graph
        .register(RelationSchema::new("author-of-work", work, person))
        .unwrap();

    let w = RecordRef::new(work, 1);
    let p = |id| RecordRef::new(person, id);
    graph.set_objects(rel, w, &[p(1), p(2)]).unwrap();
    graph.set_objects(rel, w, &[p(2), p(3)]).unwrap();

    assert_eq!(
        graph.relation(rel).unwrap().objects_of(w).sorted(),
        vec![p(2), p(3)]
    );
}

#[test]
fn set_objects_stops_at_first_rejection() {
    let mut interner = Interner::new();
    let node = interner.intern("node");
    let r = |id| RecordRef::new(node, id);
    let mut graph = RecordGraph::new();
    let rel = graph
        .register(RelationSchema::new("child", node, node).acyclic())
        .unwrap();
    graph.add_edge(rel, r(2), r(1), None).unwrap();

    let err = graph
        .set_objects(rel, r(1), &[r(3), r(2), r(4)])
        .unwrap_err();

    assert!(err.is_cycle());
    assert!(err.context.unwrap().stack.contains(&"set_objects".to_string()));
    let relation = graph.relation(rel).unwrap();
    assert!(relation.contains(r(1), r(3)));
    assert!(!relation.contains(r(1), r(4)));
}

// =============================================================================
// Record Deletion
// =============================================================================

#[test]
fn deleted_record_leaves_no_edges_or_attributes() {
    let mut interner = Interner::new();
    let argument = interner.intern("argument");
    let verdict = interner.intern("argument-verdict");
    let mut graph = RecordGraph::new();
    let counter = graph
        .register(
            RelationSchema::new("counter", argument, argument)
                .acyclic()
                .with_attribute(AttributeKind::Record(verdict)),
        )
        .unwrap();
    let support = graph
        .register(RelationSchema::new("support", argument, argument))
        .unwrap();

    let a = |id| RecordRef::new(argument, id);
    let refutes = RecordRef::new(verdict, 1);
    graph.add_edge(counter, a(1), a(2), Some(Attribute::Record(refutes))).unwrap();
    graph.add_edge(counter, a(2), a(3), None).unwrap();
    graph.add_edge(support, a(4), a(2), None).unwrap();
    graph.add_edge(counter, a(4), a(5), Some(Attribute::Record(refutes))).unwrap();

    assert_eq!(graph.edges_touching(a(2)).len(), 3);
    assert_eq!(graph.on_record_deleted(a(2)), 3);
    assert!(graph.edges_touching(a(2)).is_empty());

    // Deleting the verdict record clears attributes but keeps the edge.
    graph.on_record_deleted(refutes);
    let relation = graph.relation(counter).unwrap();
    assert!(relation.contains(a(4), a(5)));
    assert!(relation.get_attribute(a(4), a(5)).is_none());
}

#[test]
fn snapshot_is_isolated_from_later_edits() {
    let mut interner = Interner::new();
    let node = interner.intern("node");
    let r = |id| RecordRef::new(node, id);
    let mut graph = RecordGraph::with_config(GraphConfig::debug());
    let rel = graph
        .register(RelationSchema::new("child", node, node))
        .unwrap();
    graph.add_edge(rel, r(1), r(2), None).unwrap();

    let snapshot = graph.snapshot();
    graph.add_edge(rel, r(1), r(3), None).unwrap();
    graph.remove_edge(rel, r(1), r(2)).unwrap();

    assert_eq!(snapshot.edge_count(), 1);
    assert!(snapshot.relation(rel).unwrap().contains(r(1), r(2)));
    assert_eq!(graph.relation(rel).unwrap().len(), 1);
}

#[test]
fn unchecked_types_in_bulk_load() {
    let mut interner = Interner::new();
    let work = interner.intern("work");
    let folder = interner.intern("folder");
    let mut graph = RecordGraph::with_config(GraphConfig::bulk_load());
    let rel = graph
        .register(RelationSchema::new("work-in-folder", work, folder))
        .unwrap();

    // Type checks are off, so a mislabelled record slips through.
    assert!(
        graph
            .add_edge(rel, RecordRef::new(work, 1), RecordRef::new(work, 2), None)
            .unwrap()
    );
}

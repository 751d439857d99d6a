//! Integration tests for observer notifications and batch scopes

use std::cell::RefCell;
use std::rc::Rc;

use reftree_foundation::RecordRef;
use reftree_tree::TreeObserver;

use crate::common::Fixture;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Note {
    Shown(u64),
    Hidden(u64),
    Vacated(u64),
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Note>>>);

impl Recorder {
    fn drain(&self) -> Vec<Note> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl TreeObserver for Recorder {
    fn record_shown(&mut self, record: RecordRef) {
        self.0.borrow_mut().push(Note::Shown(record.id.raw()));
    }

    fn record_hidden(&mut self, record: RecordRef) {
        self.0.borrow_mut().push(Note::Hidden(record.id.raw()));
    }

    fn children_vacated(&mut self, record: RecordRef) {
        self.0.borrow_mut().push(Note::Vacated(record.id.raw()));
    }
}

// =============================================================================
// Immediate Notifications
// =============================================================================

#[test]
fn second_row_does_not_reshow_record() {
    let mut fx = Fixture::new();
    let notes = Recorder::default();
    let tree = fx.tree().with_observer(notes.clone());
    tree.set_root(&fx.graph, fx.r(1)).unwrap();
    fx.link(1, 2);
    fx.link(1, 3);
    fx.link(2, 4);
    notes.drain();

    fx.link(3, 4);
    assert!(notes.drain().is_empty());

    fx.unlink(2, 4);
    assert_eq!(notes.drain(), vec![Note::Vacated(2)]);

    fx.unlink(3, 4);
    assert_eq!(notes.drain(), vec![Note::Hidden(4), Note::Vacated(3)]);
}

#[test]
fn subtree_teardown_hides_leaves_first() {
    let mut fx = Fixture::new();
    let notes = Recorder::default();
    let tree = fx.tree().with_observer(notes.clone());
    tree.set_root(&fx.graph, fx.r(1)).unwrap();
    fx.link(1, 2);
    fx.link(2, 3);
    fx.link(1, 9);
    notes.drain();

    fx.unlink(1, 2);
    assert_eq!(notes.drain(), vec![Note::Hidden(3), Note::Hidden(2)]);
}

// =============================================================================
// Batch Scope
// =============================================================================

#[test]
fn batch_reports_vacated_parent_once() {
    let mut fx = Fixture::new();
    let notes = Recorder::default();
    let tree = fx.tree().with_observer(notes.clone());
    tree.set_root(&fx.graph, fx.r(1)).unwrap();
    fx.link(1, 2);
    fx.link(1, 3);
    fx.link(2, 10);
    fx.link(2, 11);
    fx.link(3, 10);
    notes.drain();

    {
        let _batch = tree.batch();
        fx.graph.on_record_deleted(fx.r(10));
        fx.graph.on_record_deleted(fx.r(11));
        assert!(notes.drain().is_empty());
    }

    let mut reported = notes.drain();
    reported.sort_by_key(|n| format!("{n:?}"));
    assert_eq!(
        reported,
        vec![
            Note::Hidden(10),
            Note::Hidden(11),
            Note::Vacated(2),
            Note::Vacated(3),
        ]
    );
}

#[test]
fn batch_skips_parent_that_got_children_back() {
    let mut fx = Fixture::new();
    let notes = Recorder::default();
    let tree = fx.tree().with_observer(notes.clone());
    tree.set_root(&fx.graph, fx.r(1)).unwrap();
    fx.link(1, 2);
    fx.link(2, 3);
    notes.drain();

    tree.begin_batch();
    fx.unlink(2, 3);
    fx.link(2, 4);
    tree.end_batch();

    assert_eq!(notes.drain(), vec![Note::Shown(4), Note::Hidden(3)]);
}

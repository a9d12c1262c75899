use core::cell::RefCell;

use deeptrap::{FnHandler, Path, TrapError, Value, value, wrap};
use deeptrap_testhelpers::test;

use crate::Recorder;

#[test]
fn rejected_write_changes_nothing() {
    let original = value!({ "attr": { "foo": "bar" }, "n": 1 });
    let mut tree = wrap(original.clone(), Recorder::rejecting(&["attr"])).unwrap();
    let root = tree.root_id();
    let attr = tree.child(root, "attr").unwrap();

    assert!(!tree.set(root, "attr", value!({ "fresh": [1, 2] })).unwrap());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"set ["attr"] = {"fresh": [1, 2]} on root"#);
    assert_eq!(tree.snapshot(), original);
    assert!(tree.is_attached(attr));
    assert_eq!(tree.wrapper_count(), 2);
    tree.verify().unwrap();
}

#[test]
fn failing_set_is_not_committed() {
    let mut tree = wrap(value!({ "attr": "hello" }), Recorder::failing(&["attr"])).unwrap();
    let root = tree.root_id();

    let err = tree.set(root, "attr", value!(["x"])).unwrap_err();
    assert!(matches!(err, TrapError::Handler(_)));
    insta::assert_snapshot!(err.to_string(), @"handler failed: refusing to write attr");

    assert_eq!(tree.snapshot(), value!({ "attr": "hello" }));
    assert_eq!(tree.wrapper_count(), 1);
    tree.verify().unwrap();
}

#[test]
fn failing_delete_is_still_committed() {
    let mut tree = wrap(value!({ "attr": { "foo": 1 } }), Recorder::failing(&["attr"])).unwrap();
    let root = tree.root_id();

    let err = tree.delete(root, "attr").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"handler failed: refusing to delete attr");
    let TrapError::HandlerAfterDelete { removed, .. } = err else {
        panic!("expected the removed value back, got {err:?}");
    };
    assert_eq!(removed, value!({ "foo": 1 }));

    assert_eq!(tree.snapshot(), value!({}));
    assert_eq!(tree.wrapper_count(), 1);
    tree.verify().unwrap();
}

#[test]
fn delete_verdict_is_ignored() {
    let deletes = RefCell::new(0);
    let handler = FnHandler::new().on_delete(|_| {
        *deletes.borrow_mut() += 1;
        Ok(false)
    });
    let mut tree = wrap(value!({ "a": 1, "b": 2 }), handler).unwrap();
    let root = tree.root_id();

    assert_eq!(tree.delete(root, "a").unwrap(), Some(Value::from(1)));
    assert_eq!(tree.snapshot(), value!({ "b": 2 }));
    drop(tree);
    assert_eq!(deletes.into_inner(), 1);
}

#[test]
fn handler_sees_the_tree_before_the_write() {
    let seen = RefCell::new(Vec::new());
    let handler = FnHandler::new().on_set(|event| {
        let before = event.target.get("foo").map(|v| v.to_value());
        let root_attr = event
            .root
            .get("attr")
            .and_then(|v| v.as_node())
            .map(|n| n.id());
        seen.borrow_mut().push((
            event.path.clone(),
            before,
            root_attr == Some(event.target.id()),
        ));
        Ok(true)
    });
    let mut tree = wrap(value!({ "attr": { "foo": "bar" } }), handler).unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();

    tree.set(attr, "foo", "barrio").unwrap();
    tree.set(attr, "foo", "baz").unwrap();
    drop(tree);

    assert_eq!(
        seen.into_inner(),
        [
            (
                Path::from_keys(["attr", "foo"]),
                Some(value!("bar")),
                true
            ),
            (
                Path::from_keys(["attr", "foo"]),
                Some(value!("barrio")),
                true
            ),
        ]
    );
}

#[test]
fn unit_handler_accepts_everything() {
    let mut tree = wrap(value!({ "list": [] }), ()).unwrap();
    let mut list = tree.root_mut().into_child("list").unwrap();

    assert!(list.push("a").unwrap());
    assert!(list.set(0usize, "b").unwrap());
    assert_eq!(list.pop().unwrap(), Some(value!("b")));
    assert!(list.get(0usize).is_none());

    assert_eq!(tree.into_inner(), value!({ "list": [] }));
}

#[test]
fn handler_can_be_swapped_out_between_traps() {
    let mut tree = wrap(value!({ "a": 1 }), Recorder::default()).unwrap();
    let root = tree.root_id();

    tree.handler_mut().reject = vec![vec!["a".to_owned()]];
    assert!(!tree.set(root, "a", 2).unwrap());
    tree.handler_mut().reject.clear();
    assert!(tree.set(root, "a", 3).unwrap());

    let (value, recorder) = tree.into_parts();
    assert_eq!(value, value!({ "a": 3 }));
    assert_eq!(recorder.log.len(), 2);
}

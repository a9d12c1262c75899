use deeptrap::{Options, PathStep, Tracked, TrapError, Value, value, wrap};
use deeptrap_testhelpers::test;

use crate::Recorder;

#[test]
fn push_writes_index_then_length() {
    let mut tree = wrap(value!({ "attr": ["a", "b", "c"] }), Recorder::default()).unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();

    assert!(tree.push(attr, "d").unwrap());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    set ["attr", "3"] = "d" on attr
    set ["attr", "length"] = 4 on attr
    "#);
    assert_eq!(tree.snapshot(), value!({ "attr": ["a", "b", "c", "d"] }));
    assert_eq!(
        tree.node(attr).unwrap().get("length").unwrap(),
        Value::from(4)
    );
}

#[test]
fn pushed_containers_are_tracked() {
    let mut tree = wrap(value!({ "list": [] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert!(tree.root_mut().into_child("list").unwrap().push(value!({ "y": [1] })).unwrap());
    assert_eq!(tree.wrapper_count(), 4);
    tree.verify().unwrap();

    let y = tree.node_at(&deeptrap::Path::from_keys(["list", "0", "y"])).unwrap();
    assert!(tree.push(y, 2).unwrap());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    set ["list", "0"] = {"y": [1]} on list
    set ["list", "length"] = 1 on list
    set ["list", "0", "y", "1"] = 2 on list[0].y
    set ["list", "0", "y", "length"] = 2 on list[0].y
    "#);
    assert_eq!(tree.node(list).unwrap(), value!([{ "y": [1, 2] }]));
}

#[test]
fn rejected_index_write_stops_the_push() {
    let mut tree = wrap(value!({ "attr": ["a"] }), Recorder::rejecting(&["attr", "1"])).unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();

    assert!(!tree.push(attr, "b").unwrap());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"set ["attr", "1"] = "b" on attr"#);
    assert_eq!(tree.snapshot(), value!({ "attr": ["a"] }));
}

#[test]
fn rejected_length_write_keeps_the_element() {
    let mut tree = wrap(
        value!({ "attr": ["a"] }),
        Recorder::rejecting(&["attr", "length"]),
    )
    .unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();

    assert!(!tree.push(attr, "b").unwrap());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    set ["attr", "1"] = "b" on attr
    set ["attr", "length"] = 2 on attr
    "#);
    assert_eq!(tree.snapshot(), value!({ "attr": ["a", "b"] }));
}

#[test]
fn pop_deletes_then_shrinks() {
    let mut tree = wrap(
        value!({ "attr": ["a", "b", { "x": 1 }] }),
        Recorder::default(),
    )
    .unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();
    let last = tree.child(attr, 2usize).unwrap();

    let popped = tree.pop(attr).unwrap();
    assert_eq!(popped, Some(value!({ "x": 1 })));
    assert!(!tree.is_attached(last));

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    delete ["attr", "2"] on attr
    set ["attr", "length"] = 2 on attr
    "#);
    assert_eq!(tree.snapshot(), value!({ "attr": ["a", "b"] }));
    tree.verify().unwrap();
}

#[test]
fn pop_on_an_empty_array_only_writes_length() {
    let mut tree = wrap(value!({ "attr": [] }), Recorder::default()).unwrap();
    let attr = tree.child(tree.root_id(), "attr").unwrap();

    assert_eq!(tree.pop(attr).unwrap(), None);

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"set ["attr", "length"] = 0 on attr"#);
}

#[test]
fn truncate_detaches_dropped_containers() {
    let mut tree = wrap(
        value!({ "list": [{ "a": 1 }, { "b": 2 }, 3] }),
        Recorder::default(),
    )
    .unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();
    let second = tree.child(list, 1usize).unwrap();
    assert_eq!(tree.wrapper_count(), 4);

    assert!(tree.truncate(list, 1).unwrap());
    assert!(!tree.is_attached(second));
    assert_eq!(tree.wrapper_count(), 3);
    assert_eq!(tree.snapshot(), value!({ "list": [{ "a": 1 }] }));
    tree.verify().unwrap();

    assert!(tree.node_mut(list).truncate(3).unwrap());
    assert_eq!(tree.snapshot(), value!({ "list": [{ "a": 1 }, null, null] }));

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    set ["list", "length"] = 1 on list
    set ["list", "length"] = 3 on list
    "#);
}

#[test]
fn length_must_be_a_non_negative_integer() {
    let mut tree = wrap(value!({ "list": [1, 2] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    for bad in [Value::from(-1), value!(1.5), value!("2"), value!([])] {
        assert!(matches!(
            tree.set(list, "length", bad),
            Err(TrapError::InvalidLength { .. })
        ));
    }
    assert!(tree.handler().log.is_empty());

    assert!(tree.set(list, "length", 1.0).unwrap());
    assert_eq!(tree.snapshot(), value!({ "list": [1] }));
}

#[test]
fn sequence_operations_need_an_array() {
    let mut tree = wrap(value!({ "attr": {} }), Recorder::default()).unwrap();
    let root = tree.root_id();

    assert!(matches!(
        tree.push(root, 1),
        Err(TrapError::NotAnArray { node }) if node == root
    ));
    assert!(matches!(tree.pop(root), Err(TrapError::NotAnArray { .. })));
    assert!(matches!(
        tree.truncate(root, 0),
        Err(TrapError::NotAnArray { .. })
    ));
    assert!(tree.handler().log.is_empty());
}

#[test]
fn growth_is_bounded_by_max_length() {
    let options = Options::new().with_max_length(4);
    let mut tree =
        Tracked::with_options(value!({ "list": [] }), Recorder::default(), options).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert!(matches!(
        tree.set(list, 4_000_000_000usize, 1),
        Err(TrapError::InvalidKey { key: PathStep::Index(4_000_000_000), .. })
    ));
    assert!(matches!(
        tree.truncate(list, 4_000_000_000),
        Err(TrapError::InvalidLength { .. })
    ));
    assert!(matches!(
        tree.set(list, 4usize, "e"),
        Err(TrapError::InvalidKey { .. })
    ));
    assert!(matches!(
        tree.truncate(list, 5),
        Err(TrapError::InvalidLength { .. })
    ));
    assert!(tree.handler().log.is_empty());
    assert_eq!(tree.snapshot(), value!({ "list": [] }));

    // Up to the limit is fine.
    assert!(tree.set(list, 3usize, "d").unwrap());
    assert!(tree.truncate(list, 4).unwrap());
    assert!(matches!(tree.push(list, "e"), Err(TrapError::InvalidKey { .. })));
    assert_eq!(tree.node(list).unwrap().len(), 4);
}

#[test]
fn arrays_longer_than_max_length_can_still_shrink() {
    let options = Options::new().with_max_length(2);
    let mut tree =
        Tracked::with_options(value!({ "list": [1, 2, 3] }), Recorder::default(), options)
            .unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert!(tree.set(list, 2usize, 30).unwrap());
    assert!(tree.truncate(list, 3).unwrap());
    assert_eq!(tree.pop(list).unwrap(), Some(Value::from(30)));
    assert!(matches!(
        tree.truncate(list, 3),
        Err(TrapError::InvalidLength { .. })
    ));
    assert_eq!(tree.snapshot(), value!({ "list": [1, 2] }));
}

#[test]
fn default_max_length_rejects_huge_writes() {
    let mut tree = wrap(value!({ "list": [] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert_eq!(tree.options().max_length, Options::DEFAULT_MAX_LENGTH);
    assert!(tree.set(list, 4_000_000_000usize, 1).is_err());
    assert!(tree.set(list, "length", 4_000_000_000u64).is_err());
    assert!(tree.handler().log.is_empty());
}

#[test]
fn pop_over_a_trailing_hole_only_writes_length() {
    let mut tree = wrap(value!({ "list": ["a"] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();
    assert!(tree.truncate(list, 2).unwrap());
    tree.handler_mut().take_log();

    assert_eq!(tree.pop(list).unwrap(), None);

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"set ["list", "length"] = 1 on list"#);
    assert_eq!(tree.snapshot(), value!({ "list": ["a"] }));
}

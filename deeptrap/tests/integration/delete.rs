use deeptrap::{TrapError, Value, value, wrap};
use deeptrap_testhelpers::test;

use crate::Recorder;

#[test]
fn captures_delete_shallow_property() {
    let mut tree = wrap(value!({ "attr1": "hello" }), Recorder::default()).unwrap();
    let root = tree.root_id();

    assert_eq!(tree.delete(root, "attr1").unwrap(), Some(value!("hello")));

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["attr1"] on root"#);
    assert_eq!(tree.snapshot(), value!({}));
}

#[test]
fn captures_delete_child_property() {
    let mut tree = wrap(value!({ "attr2": { "foo": "bar" } }), Recorder::default()).unwrap();
    let attr2 = tree.child(tree.root_id(), "attr2").unwrap();

    assert!(tree.delete(attr2, "foo").unwrap().is_some());

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["attr2", "foo"] on attr2"#);
    assert_eq!(tree.snapshot(), value!({ "attr2": {} }));
}

#[test]
fn captures_delete_parent_of_children() {
    let mut tree = wrap(value!({ "attr2": { "foo": "bar" } }), Recorder::default()).unwrap();
    let root = tree.root_id();
    let attr2 = tree.child(root, "attr2").unwrap();

    let removed = tree.delete(root, "attr2").unwrap();

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["attr2"] on root"#);
    assert_eq!(removed, Some(value!({ "foo": "bar" })));
    assert_eq!(tree.snapshot(), value!({}));
    assert_eq!(tree.wrapper_count(), 1);
    tree.verify().unwrap();

    // The handle to the deleted object no longer reaches the handler.
    assert!(!tree.is_attached(attr2));
    assert!(matches!(
        tree.set(attr2, "foo", "baz"),
        Err(TrapError::Detached { node }) if node == attr2
    ));
    assert!(matches!(
        tree.delete(attr2, "foo"),
        Err(TrapError::Detached { .. })
    ));
    assert!(tree.handler().log.is_empty());

    // The returned value is plain data.
    let mut removed = removed.unwrap();
    removed.as_object_mut().unwrap().insert("foo", "baz");
    assert!(tree.handler().log.is_empty());
}

#[test]
fn captures_delete_parent_of_grandchildren() {
    let original = value!({ "attr3": { "foo": { "bar": "baz" } } });
    let mut tree = wrap(original.clone(), Recorder::default()).unwrap();
    let root = tree.root_id();
    let attr3 = tree.child(root, "attr3").unwrap();
    let foo = tree.child(attr3, "foo").unwrap();

    let removed = tree.delete(root, "attr3").unwrap().unwrap();

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["attr3"] on root"#);
    assert_eq!(removed, original.as_object().unwrap()["attr3"]);
    assert!(!tree.is_attached(attr3));
    assert!(!tree.is_attached(foo));
    assert!(tree.set(foo, "bar", "qux").is_err());
    assert!(tree.handler().log.is_empty());
    tree.verify().unwrap();
}

#[test]
fn delete_of_a_missing_key_is_silent() {
    let mut tree = wrap(value!({ "attr1": "hello" }), Recorder::default()).unwrap();
    let root = tree.root_id();

    assert_eq!(tree.delete(root, "attr2").unwrap(), None);

    assert!(tree.handler().log.is_empty());
    assert_eq!(tree.snapshot(), value!({ "attr1": "hello" }));
}

#[test]
fn deleting_an_element_leaves_null() {
    let mut tree = wrap(
        value!({ "list": ["a", { "b": 1 }, "c"] }),
        Recorder::default(),
    )
    .unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert_eq!(tree.delete(list, "1").unwrap(), Some(value!({ "b": 1 })));
    assert_eq!(tree.snapshot(), value!({ "list": ["a", null, "c"] }));
    assert_eq!(tree.wrapper_count(), 2);

    // Out of range, `length` and non-index keys have nothing to delete.
    assert_eq!(tree.delete(list, 3usize).unwrap(), None);
    assert_eq!(tree.delete(list, "length").unwrap(), None);
    assert_eq!(tree.delete(list, "first").unwrap(), None);

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["list", "1"] on list"#);
    tree.verify().unwrap();
}

#[test]
fn deleted_keys_can_be_written_again() {
    let mut tree = wrap(value!({ "attr": { "x": 1 } }), Recorder::default()).unwrap();
    let root = tree.root_id();
    let old = tree.child(root, "attr").unwrap();

    tree.delete(root, "attr").unwrap();
    assert!(tree.set(root, "attr", value!({ "x": 2 })).unwrap());

    let new = tree.child(root, "attr").unwrap();
    assert_ne!(old, new);
    assert!(tree.node(old).is_none());
    assert_eq!(tree.node(new).unwrap().get("x").unwrap(), Value::from(2));

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    delete ["attr"] on root
    set ["attr"] = {"x": 2} on root
    "#);
    tree.verify().unwrap();
}

#[test]
fn deleting_an_element_twice_reports_nothing_the_second_time() {
    let mut tree = wrap(value!({ "list": ["a", "b"] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert_eq!(tree.delete(list, 0usize).unwrap(), Some(value!("a")));
    assert_eq!(tree.delete(list, 0usize).unwrap(), None);

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["list", "0"] on list"#);
    let view = tree.node(list).unwrap();
    assert!(!view.contains_key(0usize));
    assert_eq!(view.get("length").unwrap(), Value::from(2));
    assert_eq!(tree.snapshot(), value!({ "list": [null, "b"] }));

    // Writing the hole fills it again.
    assert!(tree.set(list, 0usize, "c").unwrap());
    assert_eq!(tree.delete(list, 0usize).unwrap(), Some(value!("c")));
    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"
    set ["list", "0"] = "c" on list
    delete ["list", "0"] on list
    "#);
}

#[test]
fn slots_from_growing_an_array_cannot_be_deleted() {
    let mut tree = wrap(value!({ "list": ["a"] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert!(tree.truncate(list, 3).unwrap());
    assert_eq!(tree.delete(list, 1usize).unwrap(), None);
    assert_eq!(tree.delete(list, 2usize).unwrap(), None);

    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"set ["list", "length"] = 3 on list"#);
    assert_eq!(tree.snapshot(), value!({ "list": ["a", null, null] }));
}

#[test]
fn explicit_null_elements_can_be_deleted() {
    let mut tree = wrap(value!({ "list": [null] }), Recorder::default()).unwrap();
    let list = tree.child(tree.root_id(), "list").unwrap();

    assert_eq!(tree.delete(list, 0usize).unwrap(), Some(Value::Null));
    assert_eq!(tree.delete(list, 0usize).unwrap(), None);
    insta::assert_snapshot!(tree.handler_mut().take_log(), @r#"delete ["list", "0"] on list"#);
}

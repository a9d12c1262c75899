use deeptrap_testhelpers::test;
use deeptrap_value::{VArray, VObject, Value, ValueType, value};

#[test]
fn builds_nested_containers() {
    let v = value!({
        "attr": {
            "baz": [{ "nested": true }]
        },
        "n": 3,
        "gone": null
    });

    let attr = v.as_object().unwrap()["attr"].as_object().unwrap();
    let baz = attr["baz"].as_array().unwrap();
    assert_eq!(baz.len(), 1);
    assert_eq!(baz[0].as_object().unwrap()["nested"], true);
    assert_eq!(v.as_object().unwrap()["gone"].value_type(), ValueType::Null);
}

#[test]
fn matches_hand_built_tree() {
    let mut inner = VObject::new();
    inner.insert("foo", "bar");
    let mut list = VArray::new();
    list.push("a");
    list.push(Value::Null);
    let mut root = VObject::new();
    root.insert("attr", inner);
    root.insert("list", list);

    assert_eq!(
        value!({ "attr": { "foo": "bar" }, "list": ["a", null] }),
        Value::Object(root)
    );
}

#[test]
fn parenthesized_negative_numbers() {
    let v = value!([(-1), 2]);
    let arr = v.as_array().unwrap();
    assert_eq!(arr[0].as_number().and_then(|n| n.as_i64()), Some(-1));
}

#[test]
fn display_is_json_like() {
    insta::assert_snapshot!(value!({ "attr": ["a", "b"] }).to_string(), @r#"
    {
      "attr": [
        "a",
        "b"
      ]
    }
    "#);
}

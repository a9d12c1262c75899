/// Build a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// ```
/// use deeptrap_value::value;
///
/// let v = value!({
///     "name": "deeptrap",
///     "tags": ["a", "b"],
///     "nested": { "ok": true, "none": null }
/// });
/// assert!(v.is_object());
/// ```
///
/// Array elements and object values are single token trees, so negative
/// numbers and other compound expressions need parentheses: `value!([(-1)])`.
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {{
        let items: ::std::vec::Vec<$crate::Value> = ::std::vec![$( $crate::value!($elem) ),*];
        $crate::Value::Array(items.into_iter().collect::<$crate::VArray>())
    }};
    ({ $($key:literal : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut obj = $crate::VObject::new();
        $( obj.insert($key, $crate::value!($val)); )*
        $crate::Value::Object(obj)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

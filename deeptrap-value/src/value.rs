//! Core `Value` type.

use core::fmt::{self, Debug, Display, Formatter};

use crate::array::VArray;
use crate::number::VNumber;
use crate::object::VObject;

/// Enum distinguishing the value types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// Null value
    Null,
    /// Boolean value
    Bool,
    /// Number (integers and floats)
    Number,
    /// String (UTF-8)
    String,
    /// Array
    Array,
    /// Object (key-value map)
    Object,
}

impl ValueType {
    /// Returns `true` for the composite types (arrays and objects).
    pub const fn is_container(self) -> bool {
        matches!(self, ValueType::Array | ValueType::Object)
    }

    /// Lowercase name of the type, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamic value: null, a boolean, a number, a string, an array or an object.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// An integer or finite float.
    Number(VNumber),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence of values.
    Array(VArray),
    /// An insertion-ordered map of string keys to values.
    Object(VObject),
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Returns `true` if this value is an array or an object.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.value_type().is_container()
    }

    /// Returns `true` if this is the `null` value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a boolean.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if this is a number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if this is an object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    pub const fn as_number(&self) -> Option<&VNumber> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array, if this is one.
    pub const fn as_array(&self) -> Option<&VArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the array mutably, if this is one.
    pub fn as_array_mut(&mut self) -> Option<&mut VArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the object, if this is one.
    pub const fn as_object(&self) -> Option<&VObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the object mutably, if this is one.
    pub fn as_object_mut(&mut self) -> Option<&mut VObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Replace this value with `null`, returning the previous value.
    pub fn take(&mut self) -> Value {
        core::mem::take(self)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => Debug::fmt(b, f),
            Value::Number(n) => Debug::fmt(n, f),
            Value::String(s) => Debug::fmt(s, f),
            Value::Array(a) => Debug::fmt(a, f),
            Value::Object(o) => Debug::fmt(o, f),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format_value(self))
    }
}

// === Conversions ===

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().collect())
    }
}

// === Scalar comparisons ===

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_number().and_then(VNumber::as_i64) == Some(*other)
    }
}

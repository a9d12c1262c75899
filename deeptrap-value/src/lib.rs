//! `deeptrap-value` provides the plain data trees that `deeptrap` tracks.
//!
//! A [`Value`] is either a scalar leaf (null, boolean, number, string) or a
//! container: an insertion-ordered [`VObject`] or an index-addressable [`VArray`].
//! Containers nest arbitrarily.
//!
//! ```
//! use deeptrap_value::{Value, value};
//!
//! let v = value!({
//!     "attr": { "foo": "bar" },
//!     "list": ["a", "b", "c"]
//! });
//! assert!(v.is_object());
//! assert_eq!(v.as_object().unwrap().len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod macros;

mod value;
pub use value::*;

mod number;
pub use number::*;

mod array;
pub use array::*;

mod object;
pub use object::*;

mod format;
pub use format::format_value;

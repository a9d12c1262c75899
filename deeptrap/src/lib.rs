//! Deep mutation interception for trees of objects and arrays.
//!
//! [`wrap`] takes a plain [`Value`] tree and fronts every nested container with
//! a wrapper. Reads pass straight through. Every write and delete, at any
//! depth, is reported to a [`MutationHandler`] together with the full path
//! from the root, and a write can be vetoed before it lands.
//!
//! ```
//! use deeptrap::{FnHandler, value, wrap};
//!
//! let mut log = Vec::new();
//! let handler = FnHandler::new().on_set(|event| {
//!     log.push((event.path.keys(), event.value.to_value()));
//!     Ok(true)
//! });
//!
//! let mut tree = wrap(value!({ "attr": ["a", "b", "c"] }), handler)?;
//! let attr = tree.child(tree.root_id(), "attr")?;
//! tree.push(attr, "d")?;
//! assert_eq!(tree.snapshot(), value!({ "attr": ["a", "b", "c", "d"] }));
//! drop(tree);
//!
//! assert_eq!(
//!     log,
//!     [
//!         (vec!["attr".to_owned(), "3".to_owned()], value!("d")),
//!         (vec!["attr".to_owned(), "length".to_owned()], value!(4)),
//!     ]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Wrappers and detaching
//!
//! Wrappers are addressed by [`NodeId`] handles. Deleting or overwriting a
//! container detaches its whole subtree: the removed data comes back as a
//! plain [`Value`], and every handle into it goes stale, so it can never reach
//! the handler again.
//!
//! # Arrays
//!
//! Arrays expose their size under the `length` key. [`Tracked::push`] writes
//! the new index and then `length`, [`Tracked::pop`] deletes the last index
//! and then writes `length`, and [`Tracked::truncate`] writes `length` alone.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod tracing_macros;

mod builder;
mod reconcile;
mod registry;
pub use registry::NodeId;

mod error;
pub use error::{TrapError, WrapError};

mod handler;
pub use handler::{DeleteEvent, FnHandler, HandlerError, MutationHandler, SetEvent};

mod options;
pub use options::Options;

mod view;
pub use view::{Iter, NodeRef, ValueRef};

mod tracked;
pub use tracked::{Tracked, wrap};

mod cursor;
pub use cursor::NodeMut;

pub mod invariant;

pub use deeptrap_codec as codec;
pub use deeptrap_path::{LENGTH_KEY, Path, PathAccessError, PathStep};
pub use deeptrap_value::{VArray, VNumber, VObject, Value, ValueType, format_value, value};

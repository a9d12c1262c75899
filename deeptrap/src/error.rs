//! Errors reported while wrapping a tree or running a trap.

use deeptrap_path::{Path, PathStep};
use deeptrap_value::{Value, ValueType};

use crate::handler::HandlerError;
use crate::registry::NodeId;

/// Error returned when a value cannot be wrapped.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum WrapError {
    /// Only arrays and objects can be tracked.
    NotAContainer {
        /// The type of the value that was handed in.
        found: ValueType,
    },

    /// Containers nest deeper than [`Options::max_depth`](crate::Options::max_depth).
    TooDeep {
        /// Path to the first container past the limit.
        path: Path,
        /// The configured limit.
        max_depth: usize,
    },

    /// The tree already holds as many wrappers as handles can address.
    TooManyWrappers,
}

impl core::fmt::Display for WrapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WrapError::NotAContainer { found } => {
                write!(f, "cannot wrap a {found}: expected an array or an object")
            }
            WrapError::TooDeep { path, max_depth } => {
                write!(f, "container at {path} nests deeper than {max_depth} levels")
            }
            WrapError::TooManyWrappers => f.write_str("too many wrappers in one tree"),
        }
    }
}

impl core::error::Error for WrapError {}

/// Error returned by a trap ([`Tracked::set`](crate::Tracked::set),
/// [`Tracked::delete`](crate::Tracked::delete) and the sequence operations).
///
/// A rejected write or a delete of a missing key is not an error: those are
/// reported through the `Ok` value.
#[derive(Debug)]
#[non_exhaustive]
pub enum TrapError {
    /// The wrapper was detached from the tree (deleted or overwritten).
    Detached {
        /// The stale handle.
        node: NodeId,
    },

    /// The key cannot address this container, such as `"foo"` on an array,
    /// or an index that would grow the array past
    /// [`Options::max_length`](crate::Options::max_length).
    InvalidKey {
        /// The wrapper the key was applied to.
        node: NodeId,
        /// The offending key.
        key: PathStep,
    },

    /// A `length` write whose value is not a non-negative integer, or that
    /// would grow the array past [`Options::max_length`](crate::Options::max_length).
    InvalidLength {
        /// The value that was written.
        value: Value,
    },

    /// A sequence operation on an object.
    NotAnArray {
        /// The wrapper the operation was applied to.
        node: NodeId,
    },

    /// A path lookup did not end at a container.
    NoContainer {
        /// The path that was looked up.
        path: Path,
        /// What was found there, or `None` when nothing was.
        found: Option<ValueType>,
    },

    /// The written value could not be wrapped.
    Wrap(WrapError),

    /// The handler returned an error.
    Handler(HandlerError),

    /// The handler returned an error after a delete was committed.
    ///
    /// The key is gone regardless; `removed` is what it held.
    HandlerAfterDelete {
        /// The removed value, fully unwrapped.
        removed: Value,
        /// What the handler returned.
        error: HandlerError,
    },
}

impl core::fmt::Display for TrapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TrapError::Detached { node } => {
                write!(f, "wrapper {node} is detached from the tree")
            }
            TrapError::InvalidKey { node, key } => {
                write!(f, "key {key:?} does not apply to wrapper {node}")
            }
            TrapError::InvalidLength { value } => {
                write!(f, "invalid array length {value:?}")
            }
            TrapError::NotAnArray { node } => {
                write!(f, "wrapper {node} is not an array")
            }
            TrapError::NoContainer { path, found: None } => {
                write!(f, "nothing at {path}")
            }
            TrapError::NoContainer {
                path,
                found: Some(found),
            } => {
                write!(f, "expected a container at {path}, found a {found}")
            }
            TrapError::Wrap(err) => write!(f, "{err}"),
            TrapError::Handler(err) | TrapError::HandlerAfterDelete { error: err, .. } => {
                write!(f, "handler failed: {err}")
            }
        }
    }
}

impl core::error::Error for TrapError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TrapError::Wrap(err) => Some(err),
            TrapError::Handler(err) | TrapError::HandlerAfterDelete { error: err, .. } => {
                Some(err.as_ref())
            }
            _ => None,
        }
    }
}

impl From<WrapError> for TrapError {
    fn from(err: WrapError) -> Self {
        TrapError::Wrap(err)
    }
}

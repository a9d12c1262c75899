//! Path-based value access and its error type.

use deeptrap_value::{Value, ValueType};

use crate::{Path, PathStep};

/// Error returned when navigating a value using a [`Path`].
///
/// Each variant captures enough context for a caller to produce
/// a meaningful diagnostic without re-walking the path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathAccessError {
    /// A step tried to descend into a scalar leaf.
    NotAContainer {
        /// The step that didn't apply.
        step: PathStep,
        /// Index of this step in the path (0-based).
        step_index: usize,
        /// The type found where a container was expected.
        found: ValueType,
    },

    /// The step kind doesn't apply to the current container.
    ///
    /// For example a non-numeric key on an array, or `length`, which has no
    /// stored value to borrow.
    WrongStepKind {
        /// The step that didn't apply.
        step: PathStep,
        /// Index of this step in the path (0-based).
        step_index: usize,
        /// The container type at the point where the step was attempted.
        found: ValueType,
    },

    /// An array index is out of bounds.
    IndexOutOfBounds {
        /// Index of this step in the path (0-based).
        step_index: usize,
        /// The index that was requested.
        index: usize,
        /// The number of elements.
        bound: usize,
    },

    /// An object has no entry for the key.
    MissingKey {
        /// Index of this step in the path (0-based).
        step_index: usize,
        /// The key that was requested.
        key: String,
    },
}

impl core::fmt::Display for PathAccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PathAccessError::NotAContainer {
                step,
                step_index,
                found,
            } => {
                write!(
                    f,
                    "step {step_index} ({step:?}): cannot descend into a {found}"
                )
            }
            PathAccessError::WrongStepKind {
                step,
                step_index,
                found,
            } => {
                write!(f, "step {step_index} ({step:?}) does not apply to an {found}")
            }
            PathAccessError::IndexOutOfBounds {
                step_index,
                index,
                bound,
            } => {
                write!(
                    f,
                    "step {step_index}: index {index} out of bounds (has {bound})"
                )
            }
            PathAccessError::MissingKey { step_index, key } => {
                write!(f, "step {step_index}: no entry for key {key:?}")
            }
        }
    }
}

impl core::error::Error for PathAccessError {}

/// Follow `path` from `root` and borrow the value it ends at.
///
/// Steps are normalized against the container they address (see
/// [`PathStep::for_array`]), so `["list", "0"]` and `[Key("list"), Index(0)]`
/// resolve to the same element.
pub fn resolve<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, PathAccessError> {
    let mut current = root;
    for (step_index, step) in path.steps().iter().enumerate() {
        current = match current {
            Value::Object(obj) => {
                let key = step.as_key();
                obj.get(&key).ok_or_else(|| PathAccessError::MissingKey {
                    step_index,
                    key: key.into_owned(),
                })?
            }
            Value::Array(arr) => match step.clone().for_array() {
                Ok(PathStep::Index(index)) => {
                    arr.get(index).ok_or(PathAccessError::IndexOutOfBounds {
                        step_index,
                        index,
                        bound: arr.len(),
                    })?
                }
                Ok(step) | Err(step) => {
                    return Err(PathAccessError::WrongStepKind {
                        step,
                        step_index,
                        found: ValueType::Array,
                    });
                }
            },
            scalar => {
                return Err(PathAccessError::NotAContainer {
                    step: step.clone(),
                    step_index,
                    found: scalar.value_type(),
                });
            }
        };
    }
    Ok(current)
}

//! Paths from the root of a value tree to one of its keys.
//!
//! A [`Path`] is an ordered list of [`PathStep`]s. Object keys, array indices
//! and the array size attribute (`length`) are distinct steps, but every step
//! also has a plain string form ([`PathStep::as_key`]) so a path can be handed
//! out as a list of keys: `["attr", "3"]`, `["attr", "length"]`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::fmt::{self, Write};

pub mod access;
pub use access::{PathAccessError, resolve};

/// The key under which a sequence exposes its size.
pub const LENGTH_KEY: &str = "length";

/// A single step in a path through a value tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// Navigate to an object entry by key
    Key(String),
    /// Navigate to an array element by index
    Index(usize),
    /// The size attribute of an array
    Length,
}

impl PathStep {
    /// The string form of this step, as a dynamic-language property key.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathStep::Key(k) => Cow::Borrowed(k),
            PathStep::Index(i) => Cow::Owned(i.to_string()),
            PathStep::Length => Cow::Borrowed(LENGTH_KEY),
        }
    }

    /// Normalize this step for addressing an object.
    ///
    /// Objects only have string keys, so indices and `length` become keys.
    pub fn for_object(self) -> PathStep {
        match self {
            PathStep::Key(k) => PathStep::Key(k),
            PathStep::Index(i) => PathStep::Key(i.to_string()),
            PathStep::Length => PathStep::Key(LENGTH_KEY.to_owned()),
        }
    }

    /// Normalize this step for addressing an array.
    ///
    /// `"length"` becomes [`PathStep::Length`] and canonical decimal strings
    /// (`"0"`, `"17"`, but not `"017"` or `"+1"`) become indices. Any other
    /// key cannot address an array and is handed back as the error.
    pub fn for_array(self) -> Result<PathStep, PathStep> {
        match self {
            PathStep::Key(k) if k == LENGTH_KEY => Ok(PathStep::Length),
            PathStep::Key(k) => match parse_index(&k) {
                Some(i) => Ok(PathStep::Index(i)),
                None => Err(PathStep::Key(k)),
            },
            other => Ok(other),
        }
    }
}

fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_owned())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// A path through a value tree, recorded as a series of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Create a new empty path (the root).
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Create a path with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Build a path of object keys.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().map(|k| PathStep::Key(k.into())).collect()
    }

    /// Push a step onto the path.
    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    /// Pop the last step from the path.
    pub fn pop(&mut self) -> Option<PathStep> {
        self.steps.pop()
    }

    /// Remove every step, keeping the allocation.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Get the steps in this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Get the length of this path.
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if this path is empty.
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The string form of every step, root first.
    pub fn keys(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.as_key().into_owned()).collect()
    }

    /// Returns a new path with `step` appended.
    pub fn join(&self, step: PathStep) -> Path {
        let mut path = Path::with_capacity(self.len() + 1);
        path.steps.extend_from_slice(&self.steps);
        path.push(step);
        path
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl Extend<PathStep> for Path {
    fn extend<I: IntoIterator<Item = PathStep>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Formats like `attr.baz[0].nested`, or `<root>` for the empty path.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("<root>");
        }
        let mut result = String::new();
        for step in &self.steps {
            match step {
                PathStep::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathStep::Index(i) => {
                    write!(result, "[{i}]")?;
                }
                PathStep::Length => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(LENGTH_KEY);
                }
            }
        }
        f.write_str(&result)
    }
}

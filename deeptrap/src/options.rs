/// Limits applied while wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Options {
    /// Deepest path at which a container may sit. The root is at depth 0.
    ///
    /// Wrapping and detaching recurse once per level, so this bounds stack use.
    pub max_depth: usize,

    /// Longest an array may grow through an index or `length` write.
    ///
    /// Arrays are stored densely, so growing one allocates every slot up to
    /// the new length. Arrays that are already longer can still be written
    /// and shrunk.
    pub max_length: usize,
}

impl Options {
    /// Default for [`Options::max_depth`].
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    /// Default for [`Options::max_length`].
    pub const DEFAULT_MAX_LENGTH: usize = 1 << 20;

    /// Options with every limit at its default.
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }

    /// Set the deepest path at which a container may sit.
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the longest an array may grow.
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

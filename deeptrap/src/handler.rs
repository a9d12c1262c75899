//! The caller's side of a trap.

use core::fmt;

use deeptrap_path::Path;

use crate::registry::NodeId;
use crate::view::{NodeRef, ValueRef};

/// Error type a handler may fail with.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync>;

/// A write about to be committed.
///
/// Container values are already wrapped when the handler sees them, but not
/// yet attached: `event.value` has no parent until the write is accepted.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct SetEvent<'e> {
    /// The root of the tree.
    pub root: NodeRef<'e>,
    /// The wrapper being written to, before the write.
    pub target: NodeRef<'e>,
    /// Path from the root to the key being written, key included.
    pub path: &'e Path,
    /// The value being written.
    pub value: ValueRef<'e>,
    /// The wrapper the write was issued on.
    pub receiver: NodeId,
}

/// A delete that has already been committed.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct DeleteEvent<'e> {
    /// The root of the tree.
    pub root: NodeRef<'e>,
    /// The wrapper the key was removed from, after the removal.
    pub target: NodeRef<'e>,
    /// Path from the root to the removed key, key included.
    pub path: &'e Path,
}

/// Observes every write and delete on a tracked tree.
///
/// Both methods default to accepting. Events only carry read-only views, so a
/// handler cannot mutate the tree it is observing.
pub trait MutationHandler {
    /// Called once per write, before it is committed.
    ///
    /// Return `Ok(false)` to reject the write: the tree is left unchanged and
    /// the trap reports failure. An error also leaves the tree unchanged and
    /// is returned to the caller.
    fn set(&mut self, event: SetEvent<'_>) -> Result<bool, HandlerError> {
        let _ = event;
        Ok(true)
    }

    /// Called once per successful delete, after the key is gone.
    ///
    /// The returned flag is ignored: the delete has already happened.
    fn delete_property(&mut self, event: DeleteEvent<'_>) -> Result<bool, HandlerError> {
        let _ = event;
        Ok(true)
    }
}

/// Accepts everything.
impl MutationHandler for () {}

impl<H: MutationHandler + ?Sized> MutationHandler for &mut H {
    fn set(&mut self, event: SetEvent<'_>) -> Result<bool, HandlerError> {
        (**self).set(event)
    }

    fn delete_property(&mut self, event: DeleteEvent<'_>) -> Result<bool, HandlerError> {
        (**self).delete_property(event)
    }
}

impl<H: MutationHandler + ?Sized> MutationHandler for Box<H> {
    fn set(&mut self, event: SetEvent<'_>) -> Result<bool, HandlerError> {
        (**self).set(event)
    }

    fn delete_property(&mut self, event: DeleteEvent<'_>) -> Result<bool, HandlerError> {
        (**self).delete_property(event)
    }
}

type SetFn<'f> = Box<dyn FnMut(SetEvent<'_>) -> Result<bool, HandlerError> + 'f>;
type DeleteFn<'f> = Box<dyn FnMut(DeleteEvent<'_>) -> Result<bool, HandlerError> + 'f>;

/// A handler assembled from closures. Missing closures accept.
///
/// ```
/// use deeptrap::{FnHandler, wrap, value};
///
/// let mut seen = Vec::new();
/// let handler = FnHandler::new().on_set(|event| {
///     seen.push(event.path.keys());
///     Ok(true)
/// });
/// let mut tree = wrap(value!({ "attr": "hello" }), handler).unwrap();
/// let root = tree.root_id();
/// tree.set(root, "attr", "hello world!").unwrap();
/// drop(tree);
/// assert_eq!(seen, [["attr"]]);
/// ```
#[derive(Default)]
pub struct FnHandler<'f> {
    on_set: Option<SetFn<'f>>,
    on_delete: Option<DeleteFn<'f>>,
}

impl<'f> FnHandler<'f> {
    /// A handler that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `f` for every write.
    pub fn on_set<F>(mut self, f: F) -> Self
    where
        F: FnMut(SetEvent<'_>) -> Result<bool, HandlerError> + 'f,
    {
        self.on_set = Some(Box::new(f));
        self
    }

    /// Call `f` for every delete.
    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: FnMut(DeleteEvent<'_>) -> Result<bool, HandlerError> + 'f,
    {
        self.on_delete = Some(Box::new(f));
        self
    }
}

impl MutationHandler for FnHandler<'_> {
    fn set(&mut self, event: SetEvent<'_>) -> Result<bool, HandlerError> {
        match &mut self.on_set {
            Some(f) => f(event),
            None => Ok(true),
        }
    }

    fn delete_property(&mut self, event: DeleteEvent<'_>) -> Result<bool, HandlerError> {
        match &mut self.on_delete {
            Some(f) => f(event),
            None => Ok(true),
        }
    }
}

impl fmt::Debug for FnHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("on_set", &self.on_set.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

//! A write cursor that walks a tracked tree.

use deeptrap_path::PathStep;
use deeptrap_value::Value;

use crate::error::TrapError;
use crate::handler::MutationHandler;
use crate::registry::NodeId;
use crate::tracked::Tracked;
use crate::view::{NodeRef, ValueRef};

/// A mutable borrow of a tracked tree, positioned at one wrapper.
///
/// Every write goes through the same traps as [`Tracked::set`] and friends.
///
/// ```
/// use deeptrap::{value, wrap};
///
/// let mut tree = wrap(value!({ "attr": { "baz": [{ "nested": true }] } }), ()).unwrap();
/// tree.root_mut()
///     .into_child("attr")?
///     .into_child("baz")?
///     .into_child(0usize)?
///     .set("nested", false)?;
/// assert_eq!(tree.snapshot(), value!({ "attr": { "baz": [{ "nested": false }] } }));
/// # Ok::<(), deeptrap::TrapError>(())
/// ```
pub struct NodeMut<'t, H> {
    tracked: &'t mut Tracked<H>,
    id: NodeId,
}

impl<'t, H: MutationHandler> NodeMut<'t, H> {
    pub(crate) fn new(tracked: &'t mut Tracked<H>, id: NodeId) -> Self {
        Self { tracked, id }
    }

    /// The wrapper this cursor points at.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of the wrapper, or `None` if it was detached.
    pub fn view(&self) -> Option<NodeRef<'_>> {
        self.tracked.node(self.id)
    }

    /// Read the value under `key`.
    pub fn get(&self, key: impl Into<PathStep>) -> Option<ValueRef<'_>> {
        self.view()?.get(key)
    }

    /// See [`Tracked::set`].
    pub fn set(
        &mut self,
        key: impl Into<PathStep>,
        value: impl Into<Value>,
    ) -> Result<bool, TrapError> {
        self.tracked.set(self.id, key, value)
    }

    /// See [`Tracked::delete`].
    pub fn delete(&mut self, key: impl Into<PathStep>) -> Result<Option<Value>, TrapError> {
        self.tracked.delete(self.id, key)
    }

    /// See [`Tracked::push`].
    pub fn push(&mut self, value: impl Into<Value>) -> Result<bool, TrapError> {
        self.tracked.push(self.id, value)
    }

    /// See [`Tracked::pop`].
    pub fn pop(&mut self) -> Result<Option<Value>, TrapError> {
        self.tracked.pop(self.id)
    }

    /// See [`Tracked::truncate`].
    pub fn truncate(&mut self, len: usize) -> Result<bool, TrapError> {
        self.tracked.truncate(self.id, len)
    }

    /// A cursor at the container under `key`, reborrowing this one.
    pub fn child(&mut self, key: impl Into<PathStep>) -> Result<NodeMut<'_, H>, TrapError> {
        let id = self.tracked.child(self.id, key)?;
        Ok(NodeMut::new(self.tracked, id))
    }

    /// Move this cursor to the container under `key`.
    pub fn into_child(self, key: impl Into<PathStep>) -> Result<NodeMut<'t, H>, TrapError> {
        let id = self.tracked.child(self.id, key)?;
        Ok(NodeMut::new(self.tracked, id))
    }
}

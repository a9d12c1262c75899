//! The tracked tree and its traps.

use core::fmt;

use deeptrap_path::{Path, PathStep};
use deeptrap_value::Value;

use crate::builder::Builder;
use crate::error::{TrapError, WrapError};
use crate::handler::{DeleteEvent, MutationHandler, SetEvent};
use crate::invariant::{InvariantViolation, invariant, invariant_with};
use crate::options::Options;
use crate::reconcile;
use crate::registry::{Body, NodeId, Registry, Slot};
use crate::tracing_macros::{debug, trace};
use crate::view::{NodeRef, ValueRef};

/// Largest length an array may be given through its `length` key.
const MAX_LENGTH: u64 = u32::MAX as u64;

/// Wrap `root` so that every write and delete below it reaches `handler`.
///
/// Shorthand for [`Tracked::new`].
pub fn wrap<H: MutationHandler>(root: Value, handler: H) -> Result<Tracked<H>, WrapError> {
    Tracked::new(root, handler)
}

/// A container tree whose mutations are reported to a [`MutationHandler`].
///
/// Every array and object in the tree is fronted by exactly one wrapper,
/// addressed by a [`NodeId`]. Reads go straight to the data; writes go through
/// [`set`](Self::set), [`delete`](Self::delete) and the sequence operations,
/// which report the full path from the root to the handler.
pub struct Tracked<H = ()> {
    registry: Registry,
    root: NodeId,
    handler: H,
    options: Options,
    /// Reused for every trap.
    scratch: Path,
}

impl<H: MutationHandler> Tracked<H> {
    /// Wrap `root` with the default [`Options`].
    pub fn new(root: Value, handler: H) -> Result<Self, WrapError> {
        Self::with_options(root, handler, Options::default())
    }

    /// Wrap `root`, registering one wrapper per container.
    ///
    /// Fails if `root` is not an array or an object, or if it nests deeper
    /// than `options.max_depth`.
    pub fn with_options(root: Value, handler: H, options: Options) -> Result<Self, WrapError> {
        let mut registry = Registry::new();
        let mut scratch = Path::new();
        let slot = Builder::new(&mut registry, &mut scratch, options.max_depth).slot(root)?;
        let root = match slot {
            Slot::Node(id) => id,
            leaf => {
                return Err(WrapError::NotAContainer {
                    found: reconcile::detach(&mut registry, leaf).value_type(),
                });
            }
        };
        debug!(root = %root, wrappers = registry.len(), "wrapped tree");
        Ok(Self {
            registry,
            root,
            handler,
            options,
            scratch,
        })
    }

    /// Write `value` under `key` on `node`.
    ///
    /// A container value is wrapped first, then the handler decides. Returns
    /// `Ok(true)` once committed and `Ok(false)` if the handler rejected the
    /// write, in which case nothing changes. Overwriting a container detaches
    /// it.
    ///
    /// On arrays, `key` is an index or `"length"`. Writing past the end leaves
    /// holes in the gap; writing `length` truncates or extends with holes.
    /// Neither may grow the array past [`Options::max_length`].
    pub fn set(
        &mut self,
        node: NodeId,
        key: impl Into<PathStep>,
        value: impl Into<Value>,
    ) -> Result<bool, TrapError> {
        let key = self.normalize(node, key.into())?;
        let value = value.into();
        let new_len = match key {
            PathStep::Length => match length_from(&value) {
                Some(len) if self.may_grow_to(node, len) => Some(len),
                _ => return Err(TrapError::InvalidLength { value }),
            },
            _ => None,
        };

        self.scratch.clear();
        self.registry.path_into(node, &mut self.scratch);
        self.scratch.push(key.clone());
        let max_depth = self.options.max_depth;
        let slot = Builder::new(&mut self.registry, &mut self.scratch, max_depth).slot(value)?;

        let views = NodeRef::new(&self.registry, self.root).zip(NodeRef::new(&self.registry, node));
        let Some((root, target)) = views else {
            reconcile::detach(&mut self.registry, slot);
            return Err(TrapError::Detached { node });
        };
        let verdict = self.handler.set(SetEvent {
            root,
            target,
            path: &self.scratch,
            value: ValueRef::from_slot(&self.registry, &slot),
            receiver: node,
        });
        match verdict {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %self.scratch, "write rejected");
                reconcile::detach(&mut self.registry, slot);
                return Ok(false);
            }
            Err(err) => {
                debug!(path = %self.scratch, "handler failed, write dropped");
                reconcile::detach(&mut self.registry, slot);
                return Err(TrapError::Handler(err));
            }
        }

        trace!(path = %self.scratch, "write committed");
        self.commit_set(node, key, slot, new_len)?;
        Ok(true)
    }

    fn commit_set(
        &mut self,
        node: NodeId,
        key: PathStep,
        slot: Slot,
        new_len: Option<usize>,
    ) -> Result<(), TrapError> {
        if let Slot::Node(child) = &slot
            && let Some(child) = self.registry.get_mut(*child)
        {
            child.parent = Some((node, key.clone()));
        }
        let Some(entry) = self.registry.get_mut(node) else {
            reconcile::detach(&mut self.registry, slot);
            return Err(TrapError::Detached { node });
        };

        let displaced: Vec<Slot> = match &mut entry.body {
            Body::Object(map) => map
                .insert(key.as_key().into_owned(), slot)
                .into_iter()
                .collect(),
            Body::Array(items) => match key {
                PathStep::Length => {
                    let len = new_len.unwrap_or(items.len());
                    if len < items.len() {
                        items.drain(len..).collect()
                    } else {
                        items.resize_with(len, || Slot::Hole);
                        Vec::new()
                    }
                }
                PathStep::Index(i) => {
                    if i >= items.len() {
                        items.resize_with(i + 1, || Slot::Hole);
                    }
                    vec![core::mem::replace(&mut items[i], slot)]
                }
                PathStep::Key(_) => unreachable!("array keys are normalized to indices"),
            },
        };
        for old in displaced {
            reconcile::detach(&mut self.registry, old);
        }
        Ok(())
    }

    /// Remove `key` from `node`.
    ///
    /// Returns the removed value, fully unwrapped, or `None` if there was
    /// nothing to remove; the handler is only told about real removals.
    /// Deleting an array element leaves a hole in its place, which reads as
    /// absent and shows up as `null` in snapshots. Holes and `length` cannot
    /// be deleted.
    ///
    /// The handler runs after the key is gone. If it fails, the delete stands
    /// and the removed value comes back in [`TrapError::HandlerAfterDelete`].
    pub fn delete(
        &mut self,
        node: NodeId,
        key: impl Into<PathStep>,
    ) -> Result<Option<Value>, TrapError> {
        let key: PathStep = key.into();
        let Some(entry) = self.registry.get_mut(node) else {
            debug!(node = %node, "delete on a detached wrapper");
            return Err(TrapError::Detached { node });
        };

        let (step, removed) = match &mut entry.body {
            Body::Object(map) => {
                let key = key.for_object();
                let removed = map.shift_remove(&*key.as_key());
                (key, removed)
            }
            Body::Array(items) => match key.for_array() {
                Ok(PathStep::Index(i)) => match items.get_mut(i) {
                    Some(slot) if !matches!(slot, Slot::Hole) => (
                        PathStep::Index(i),
                        Some(core::mem::replace(slot, Slot::Hole)),
                    ),
                    _ => (PathStep::Index(i), None),
                },
                Ok(step) | Err(step) => (step, None),
            },
        };
        let Some(removed) = removed else {
            trace!(node = %node, key = %step, "nothing to delete");
            return Ok(None);
        };

        let value = reconcile::detach(&mut self.registry, removed);
        self.scratch.clear();
        self.registry.path_into(node, &mut self.scratch);
        self.scratch.push(step);
        debug!(path = %self.scratch, "delete committed");

        if let (Some(root), Some(target)) = (
            NodeRef::new(&self.registry, self.root),
            NodeRef::new(&self.registry, node),
        ) && let Err(error) = self.handler.delete_property(DeleteEvent {
            root,
            target,
            path: &self.scratch,
        }) {
            debug!(path = %self.scratch, "handler failed after delete");
            return Err(TrapError::HandlerAfterDelete {
                removed: value,
                error,
            });
        }
        Ok(Some(value))
    }

    /// Append `value` to the array `node`.
    ///
    /// Writes the new index, then `length`, each through the handler. Stops
    /// with `Ok(false)` at the first rejection; a rejected `length` write
    /// leaves the element in place.
    pub fn push(&mut self, node: NodeId, value: impl Into<Value>) -> Result<bool, TrapError> {
        let len = self.array_len(node)?;
        if !self.set(node, PathStep::Index(len), value)? {
            return Ok(false);
        }
        self.set(node, PathStep::Length, len + 1)
    }

    /// Remove and return the last element of the array `node`.
    ///
    /// Deletes the last index, then writes the shorter `length`. On an empty
    /// array only `length` is written and `None` is returned; the same goes
    /// for a hole at the end, which has nothing to delete.
    pub fn pop(&mut self, node: NodeId) -> Result<Option<Value>, TrapError> {
        let len = self.array_len(node)?;
        let Some(last) = len.checked_sub(1) else {
            self.set(node, PathStep::Length, 0usize)?;
            return Ok(None);
        };
        let removed = self.delete(node, PathStep::Index(last))?;
        self.set(node, PathStep::Length, last)?;
        Ok(removed)
    }

    /// Write `length` on the array `node`, detaching any dropped containers.
    pub fn truncate(&mut self, node: NodeId, len: usize) -> Result<bool, TrapError> {
        self.array_len(node)?;
        self.set(node, PathStep::Length, len)
    }

    /// A write cursor at the root.
    pub fn root_mut(&mut self) -> crate::NodeMut<'_, H> {
        let root = self.root;
        crate::NodeMut::new(self, root)
    }

    /// A write cursor at `node`. Stale handles fail on first use.
    pub fn node_mut(&mut self, node: NodeId) -> crate::NodeMut<'_, H> {
        crate::NodeMut::new(self, node)
    }
}

impl<H> Tracked<H> {
    /// The root wrapper.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(&self.registry, self.root).expect("root wrapper is never detached")
    }

    /// Handle of the root wrapper.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Look up a wrapper. `None` once it has been detached.
    pub fn node(&self, node: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::new(&self.registry, node)
    }

    /// Returns `true` while `node` is part of the tree.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.registry.contains(node)
    }

    /// Read the value at `path`, starting from the root.
    pub fn get_path(&self, path: &Path) -> Option<ValueRef<'_>> {
        let mut current = ValueRef::Node(self.root());
        for step in path {
            current = current.get(step.clone())?;
        }
        Some(current)
    }

    /// The container at `path`.
    pub fn node_at(&self, path: &Path) -> Result<NodeId, TrapError> {
        match self.get_path(path) {
            Some(ValueRef::Node(node)) => Ok(node.id()),
            other => Err(TrapError::NoContainer {
                path: path.clone(),
                found: other.map(|v| v.value_type()),
            }),
        }
    }

    /// The container stored under `key` on `node`.
    pub fn child(&self, node: NodeId, key: impl Into<PathStep>) -> Result<NodeId, TrapError> {
        let parent = self.node(node).ok_or(TrapError::Detached { node })?;
        let key = key.into();
        match parent.get(key.clone()) {
            Some(ValueRef::Node(child)) => Ok(child.id()),
            other => Err(TrapError::NoContainer {
                path: parent.path().join(key),
                found: other.map(|v| v.value_type()),
            }),
        }
    }

    /// Path from the root to `node`, or `None` if it is detached.
    pub fn path_of(&self, node: NodeId) -> Option<Path> {
        self.node(node).map(|n| n.path())
    }

    /// Number of live wrappers, one per container in the tree.
    pub fn wrapper_count(&self) -> usize {
        self.registry.len()
    }

    /// The options the tree was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The handler, mutably. Handler state can be changed between traps.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Copy the whole tree out as a plain value.
    pub fn snapshot(&self) -> Value {
        self.root().to_value()
    }

    /// Detach the whole tree and return it as a plain value.
    pub fn into_inner(self) -> Value {
        self.into_parts().0
    }

    /// Detach the whole tree, returning the plain value and the handler.
    pub fn into_parts(mut self) -> (Value, H) {
        let value = reconcile::detach_node(&mut self.registry, self.root).unwrap_or_default();
        (value, self.handler)
    }

    /// Check the bookkeeping: every reachable container is registered exactly
    /// once with a back-reference to where it sits, no leaf holds a container,
    /// and nothing unreachable is left registered.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let root = self.registry.get(self.root);
        invariant(root.is_some(), "root wrapper is registered")?;
        invariant(root.is_some_and(|n| n.parent.is_none()), "root has no parent")?;

        let mut reachable = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            reachable += 1;
            crate::invariant!(
                reachable <= self.registry.len(),
                "more reachable wrappers than registered ones"
            );
            let Some(node) = self.registry.get(id) else {
                return Err(InvariantViolation::with_message(format!(
                    "wrapper {id} is stale"
                )));
            };
            for (child, step) in node.body.child_nodes() {
                let parent = self.registry.get(child).and_then(|n| n.parent.as_ref());
                invariant_with(parent == Some(&(id, step.clone())), || {
                    format!("wrapper {child} under {id} at {step:?} has parent {parent:?}")
                })?;
                stack.push(child);
            }
            for slot in node.body.slots() {
                if let Slot::Leaf(value) = slot {
                    invariant_with(!value.is_container(), || {
                        format!("wrapper {id} holds an unwrapped {}", value.value_type())
                    })?;
                }
            }
        }
        invariant_with(reachable == self.registry.len(), || {
            format!(
                "{} registered wrappers are unreachable",
                self.registry.len() - reachable
            )
        })
    }

    fn normalize(&self, node: NodeId, key: PathStep) -> Result<PathStep, TrapError> {
        let Some(entry) = self.registry.get(node) else {
            debug!(node = %node, "trap on a detached wrapper");
            return Err(TrapError::Detached { node });
        };
        match entry.body {
            Body::Object(_) => Ok(key.for_object()),
            Body::Array(ref items) => match key.for_array() {
                Ok(PathStep::Index(i))
                    if i as u64 >= MAX_LENGTH
                        || (i >= items.len() && i >= self.options.max_length) =>
                {
                    Err(TrapError::InvalidKey {
                        node,
                        key: PathStep::Index(i),
                    })
                }
                Ok(step) => Ok(step),
                Err(key) => Err(TrapError::InvalidKey { node, key }),
            },
        }
    }

    /// Shrinking is always allowed; growing only up to `max_length`.
    fn may_grow_to(&self, node: NodeId, len: usize) -> bool {
        let current = match self.registry.get(node).map(|n| &n.body) {
            Some(Body::Array(items)) => items.len(),
            _ => 0,
        };
        len <= current || len <= self.options.max_length
    }

    fn array_len(&self, node: NodeId) -> Result<usize, TrapError> {
        match self.registry.get(node).map(|n| &n.body) {
            Some(Body::Array(items)) => Ok(items.len()),
            Some(Body::Object(_)) => Err(TrapError::NotAnArray { node }),
            None => Err(TrapError::Detached { node }),
        }
    }
}

/// A valid array length: a non-negative integer no larger than [`MAX_LENGTH`].
/// Integral floats count.
fn length_from(value: &Value) -> Option<usize> {
    let n = value.as_number()?;
    let len = match n.as_u64() {
        Some(len) => len,
        None => {
            let f = n.as_f64();
            let integral = f >= 0.0 && f.fract() == 0.0 && f <= MAX_LENGTH as f64;
            if !integral {
                return None;
            }
            f as u64
        }
    };
    if len > MAX_LENGTH {
        return None;
    }
    usize::try_from(len).ok()
}

impl<H> fmt::Debug for Tracked<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("root", &self.root())
            .field("wrappers", &self.registry.len())
            .finish_non_exhaustive()
    }
}

//! Turns plain values into registered wrappers.

use deeptrap_path::{Path, PathStep};
use deeptrap_value::Value;
use indexmap::IndexMap;

use crate::error::WrapError;
use crate::reconcile;
use crate::registry::{Body, Node, NodeId, Registry, Slot};
use crate::tracing_macros::trace;

/// Walks a value depth-first and registers one wrapper per container.
///
/// Children are registered before their parent; once the parent has an id,
/// each child's back-reference is pointed at it. The builder leaves the top
/// wrapper unattached: linking it into a tree is the caller's job.
pub(crate) struct Builder<'a> {
    registry: &'a mut Registry,
    /// Path of the value being built, starting from the tracked root.
    path: &'a mut Path,
    max_depth: usize,
}

impl<'a> Builder<'a> {
    /// `path` holds where the value will be stored and is restored on return.
    pub(crate) fn new(registry: &'a mut Registry, path: &'a mut Path, max_depth: usize) -> Self {
        Self {
            registry,
            path,
            max_depth,
        }
    }

    /// Wrap `value` if it is a container, or keep it inline as a leaf.
    ///
    /// On error, every wrapper registered so far for `value` is removed again.
    pub(crate) fn slot(&mut self, value: Value) -> Result<Slot, WrapError> {
        if !value.is_container() {
            return Ok(Slot::Leaf(value));
        }
        if self.path.len() > self.max_depth {
            return Err(WrapError::TooDeep {
                path: self.path.clone(),
                max_depth: self.max_depth,
            });
        }
        self.container(value).map(Slot::Node)
    }

    fn container(&mut self, value: Value) -> Result<NodeId, WrapError> {
        let body = match value {
            Value::Object(obj) => {
                let mut map = IndexMap::with_capacity(obj.len());
                for (key, child) in obj {
                    self.path.push(PathStep::Key(key.clone()));
                    let built = self.slot(child);
                    self.path.pop();
                    match built {
                        Ok(slot) => {
                            map.insert(key, slot);
                        }
                        Err(err) => {
                            reconcile::discard(self.registry, Body::Object(map));
                            return Err(err);
                        }
                    }
                }
                Body::Object(map)
            }
            Value::Array(arr) => {
                let mut items = Vec::with_capacity(arr.len());
                for (index, child) in arr.into_iter().enumerate() {
                    self.path.push(PathStep::Index(index));
                    let built = self.slot(child);
                    self.path.pop();
                    match built {
                        Ok(slot) => items.push(slot),
                        Err(err) => {
                            reconcile::discard(self.registry, Body::Array(items));
                            return Err(err);
                        }
                    }
                }
                Body::Array(items)
            }
            leaf => {
                return Err(WrapError::NotAContainer {
                    found: leaf.value_type(),
                });
            }
        };

        let children = body.child_nodes();
        let id = match self.registry.insert(Node { body, parent: None }) {
            Ok(id) => id,
            Err(node) => {
                reconcile::discard(self.registry, node.body);
                return Err(WrapError::TooManyWrappers);
            }
        };
        for (child, step) in children {
            if let Some(node) = self.registry.get_mut(child) {
                node.parent = Some((id, step));
            }
        }
        trace!(node = %id, path = %self.path, "wrapped container");
        Ok(id)
    }
}

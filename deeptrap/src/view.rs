//! Read-only views into a tracked tree.
//!
//! Reads never go through the handler: a [`NodeRef`] borrows the wrapper's
//! body directly.

use core::fmt;

use deeptrap_path::{Path, PathStep};
use deeptrap_value::{Value, ValueType};

use crate::registry::{Body, Node, NodeId, Registry, Slot};

static NULL: Value = Value::Null;

/// A borrowed view of one wrapper.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    registry: &'t Registry,
    id: NodeId,
    node: &'t Node,
}

impl<'t> NodeRef<'t> {
    /// `None` if `id` is stale.
    pub(crate) fn new(registry: &'t Registry, id: NodeId) -> Option<Self> {
        let node = registry.get(id)?;
        Some(Self { registry, id, node })
    }

    /// The handle of this wrapper.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// [`ValueType::Array`] or [`ValueType::Object`].
    pub fn value_type(&self) -> ValueType {
        self.node.body.value_type()
    }

    /// Returns `true` if this wrapper fronts an array.
    pub fn is_array(&self) -> bool {
        matches!(self.node.body, Body::Array(_))
    }

    /// Returns `true` if this wrapper fronts an object.
    pub fn is_object(&self) -> bool {
        matches!(self.node.body, Body::Object(_))
    }

    /// Number of entries or elements.
    pub fn len(&self) -> usize {
        self.node.body.len()
    }

    /// Returns `true` if there are no entries or elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the value stored under `key`.
    ///
    /// On arrays, decimal keys address elements and `"length"` reads the size.
    /// Holes left by deletes or by growing the array read as absent.
    pub fn get(&self, key: impl Into<PathStep>) -> Option<ValueRef<'t>> {
        let key: PathStep = key.into();
        match &self.node.body {
            Body::Object(map) => map
                .get(&*key.as_key())
                .map(|slot| ValueRef::from_slot(self.registry, slot)),
            Body::Array(items) => match key.for_array().ok()? {
                PathStep::Index(i) => match items.get(i)? {
                    Slot::Hole => None,
                    slot => Some(ValueRef::from_slot(self.registry, slot)),
                },
                PathStep::Length => Some(ValueRef::Length(items.len())),
                PathStep::Key(_) => None,
            },
        }
    }

    /// Returns `true` if `key` holds a value. `"length"` counts on arrays.
    pub fn contains_key(&self, key: impl Into<PathStep>) -> bool {
        self.get(key).is_some()
    }

    /// Entries in order: object keys in insertion order, array elements by
    /// index. Array holes are skipped.
    pub fn iter(&self) -> Iter<'t> {
        let inner = match &self.node.body {
            Body::Object(map) => IterInner::Object(map.iter()),
            Body::Array(items) => IterInner::Array(items.iter().enumerate()),
        };
        Iter {
            registry: self.registry,
            inner,
        }
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = PathStep> + 't {
        self.iter().map(|(key, _)| key)
    }

    /// The wrapper holding this one, with the key this one is stored under.
    pub fn parent(&self) -> Option<(NodeRef<'t>, &'t PathStep)> {
        let (parent, step) = self.node.parent.as_ref()?;
        Some((NodeRef::new(self.registry, *parent)?, step))
    }

    /// Path from the root of the tree to this wrapper.
    pub fn path(&self) -> Path {
        let mut path = Path::new();
        self.registry.path_into(self.id, &mut path);
        path
    }

    /// Copy the subtree out as a plain value. Array holes become `null`.
    pub fn to_value(&self) -> Value {
        match &self.node.body {
            Body::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, slot)| {
                        (key.as_str(), ValueRef::from_slot(self.registry, slot).to_value())
                    })
                    .collect(),
            ),
            Body::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|slot| ValueRef::from_slot(self.registry, slot).to_value())
                    .collect(),
            ),
        }
    }
}

impl PartialEq<Value> for NodeRef<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (&self.node.body, other) {
            (Body::Object(map), Value::Object(obj)) => {
                map.len() == obj.len()
                    && map.iter().all(|(key, slot)| {
                        obj.get(key)
                            .is_some_and(|v| ValueRef::from_slot(self.registry, slot) == *v)
                    })
            }
            (Body::Array(items), Value::Array(arr)) => {
                items.len() == arr.len()
                    && items
                        .iter()
                        .zip(arr.iter())
                        .all(|(slot, v)| ValueRef::from_slot(self.registry, slot) == *v)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.body {
            Body::Object(map) => f
                .debug_map()
                .entries(
                    map.iter()
                        .map(|(key, slot)| (key, ValueRef::from_slot(self.registry, slot))),
                )
                .finish(),
            Body::Array(items) => f
                .debug_list()
                .entries(
                    items
                        .iter()
                        .map(|slot| ValueRef::from_slot(self.registry, slot)),
                )
                .finish(),
        }
    }
}

/// A borrowed view of any value in a tracked tree.
#[derive(Clone, Copy)]
pub enum ValueRef<'t> {
    /// A scalar leaf.
    Leaf(&'t Value),
    /// A wrapped container.
    Node(NodeRef<'t>),
    /// The size of an array, read through its `length` key.
    Length(usize),
}

impl<'t> ValueRef<'t> {
    pub(crate) fn from_slot(registry: &'t Registry, slot: &'t Slot) -> Self {
        match slot {
            Slot::Leaf(value) => ValueRef::Leaf(value),
            Slot::Hole => ValueRef::Leaf(&NULL),
            Slot::Node(id) => {
                NodeRef::new(registry, *id).map_or(ValueRef::Leaf(&NULL), ValueRef::Node)
            }
        }
    }

    /// The type of the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueRef::Leaf(value) => value.value_type(),
            ValueRef::Node(node) => node.value_type(),
            ValueRef::Length(_) => ValueType::Number,
        }
    }

    /// Returns `true` if this is a wrapped container.
    pub fn is_container(&self) -> bool {
        matches!(self, ValueRef::Node(_))
    }

    /// The leaf, if this is one.
    pub fn as_leaf(&self) -> Option<&'t Value> {
        match self {
            ValueRef::Leaf(value) => Some(*value),
            _ => None,
        }
    }

    /// The wrapper, if this is a container.
    pub fn as_node(&self) -> Option<NodeRef<'t>> {
        match self {
            ValueRef::Node(node) => Some(*node),
            _ => None,
        }
    }

    /// Read a nested value. `None` on leaves.
    pub fn get(&self, key: impl Into<PathStep>) -> Option<ValueRef<'t>> {
        self.as_node()?.get(key)
    }

    /// Copy the value out as a plain value.
    pub fn to_value(&self) -> Value {
        match self {
            ValueRef::Leaf(value) => (*value).clone(),
            ValueRef::Node(node) => node.to_value(),
            ValueRef::Length(len) => Value::from(*len),
        }
    }
}

impl PartialEq<Value> for ValueRef<'_> {
    fn eq(&self, other: &Value) -> bool {
        match self {
            ValueRef::Leaf(value) => *value == other,
            ValueRef::Node(node) => node == other,
            ValueRef::Length(len) => {
                other.as_number().and_then(|n| n.as_u64()) == u64::try_from(*len).ok()
            }
        }
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Leaf(value) => fmt::Debug::fmt(value, f),
            ValueRef::Node(node) => fmt::Debug::fmt(node, f),
            ValueRef::Length(len) => fmt::Debug::fmt(len, f),
        }
    }
}

/// Iterator over the entries of a [`NodeRef`].
pub struct Iter<'t> {
    registry: &'t Registry,
    inner: IterInner<'t>,
}

enum IterInner<'t> {
    Object(indexmap::map::Iter<'t, String, Slot>),
    Array(core::iter::Enumerate<core::slice::Iter<'t, Slot>>),
}

impl<'t> Iterator for Iter<'t> {
    type Item = (PathStep, ValueRef<'t>);

    fn next(&mut self) -> Option<Self::Item> {
        let (step, slot) = match &mut self.inner {
            IterInner::Object(iter) => {
                let (key, slot) = iter.next()?;
                (PathStep::Key(key.clone()), slot)
            }
            IterInner::Array(iter) => {
                let (index, slot) = iter.find(|(_, slot)| !matches!(slot, Slot::Hole))?;
                (PathStep::Index(index), slot)
            }
        };
        Some((step, ValueRef::from_slot(self.registry, slot)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Object(iter) => iter.size_hint(),
            IterInner::Array(iter) => (0, iter.size_hint().1),
        }
    }
}

//! The wrapper registry: a generation-checked arena of container nodes.
//!
//! Each occupied entry is one wrapper. It owns the container body it fronts
//! (object entries or array elements), where nested containers are stored as
//! child [`NodeId`]s and scalars are stored inline. Removing an entry bumps
//! its generation, so every handle to a discarded wrapper stops resolving.

use core::fmt;

use deeptrap_path::{Path, PathStep};
use deeptrap_value::{Value, ValueType};
use indexmap::IndexMap;

/// Handle to a wrapper in a [`Tracked`](crate::Tracked) tree.
///
/// Handles are cheap to copy. Once the container they front is detached
/// (deleted or overwritten), the handle is stale: it never resolves again,
/// even if the slot is reused for a new wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A value slot inside a container body.
#[derive(Debug)]
pub(crate) enum Slot {
    /// A scalar leaf. Never holds an array or an object.
    Leaf(Value),
    /// A nested container, wrapped.
    Node(NodeId),
    /// An array index with nothing in it: deleted, or never written after
    /// the array grew. Reads as absent and converts to `null`.
    Hole,
}

/// The raw container a wrapper fronts.
#[derive(Debug)]
pub(crate) enum Body {
    Object(IndexMap<String, Slot>),
    Array(Vec<Slot>),
}

impl Body {
    pub(crate) const fn value_type(&self) -> ValueType {
        match self {
            Body::Object(_) => ValueType::Object,
            Body::Array(_) => ValueType::Array,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Body::Object(map) => map.len(),
            Body::Array(items) => items.len(),
        }
    }

    /// Every slot, in order.
    pub(crate) fn slots(&self) -> impl Iterator<Item = &Slot> {
        let (object, array) = match self {
            Body::Object(map) => (Some(map.values()), None),
            Body::Array(items) => (None, Some(items.iter())),
        };
        object.into_iter().flatten().chain(array.into_iter().flatten())
    }

    /// Every child wrapper together with the step that reaches it.
    pub(crate) fn child_nodes(&self) -> Vec<(NodeId, PathStep)> {
        match self {
            Body::Object(map) => map
                .iter()
                .filter_map(|(k, slot)| match slot {
                    Slot::Node(id) => Some((*id, PathStep::Key(k.clone()))),
                    Slot::Leaf(_) | Slot::Hole => None,
                })
                .collect(),
            Body::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| match slot {
                    Slot::Node(id) => Some((*id, PathStep::Index(i))),
                    Slot::Leaf(_) | Slot::Hole => None,
                })
                .collect(),
        }
    }
}

/// A registered wrapper.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) body: Body,
    /// The wrapper holding this one and the step it is stored under.
    /// `None` for the root and for values not yet attached.
    pub(crate) parent: Option<(NodeId, PathStep)>,
}

#[derive(Debug)]
enum Entry {
    Occupied { generation: u32, node: Node },
    Vacant { generation: u32 },
}

/// Arena with free list for slot reuse.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    free_list: Vec<u32>,
    live: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a wrapper. Hands the node back once every `u32` index is live.
    pub(crate) fn insert(&mut self, node: Node) -> Result<NodeId, Node> {
        if let Some(index) = self.free_list.pop()
            && let Entry::Vacant { generation } = self.entries[index as usize]
        {
            self.entries[index as usize] = Entry::Occupied { generation, node };
            self.live += 1;
            return Ok(NodeId { index, generation });
        }
        let Ok(index) = u32::try_from(self.entries.len()) else {
            return Err(node);
        };
        self.entries.push(Entry::Occupied {
            generation: 0,
            node,
        });
        self.live += 1;
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        match self.entries.get(id.index as usize)? {
            Entry::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.entries.get_mut(id.index as usize)? {
            Entry::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a wrapper, invalidating every handle to it.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let entry = self.entries.get_mut(id.index as usize)?;
        match entry {
            Entry::Occupied { generation, .. } if *generation == id.generation => {}
            _ => return None,
        }
        let vacant = Entry::Vacant {
            generation: id.generation.wrapping_add(1),
        };
        let Entry::Occupied { node, .. } = core::mem::replace(entry, vacant) else {
            return None;
        };
        self.free_list.push(id.index);
        self.live -= 1;
        Some(node)
    }

    /// Number of live wrappers.
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Append the steps from the top of `id`'s tree down to `id` onto `out`.
    ///
    /// The path is rebuilt from the parent back-references every time, so it
    /// always reflects where the wrapper currently sits.
    pub(crate) fn path_into(&self, id: NodeId, out: &mut Path) {
        let Some(node) = self.get(id) else {
            return;
        };
        if let Some((parent, step)) = &node.parent {
            self.path_into(*parent, out);
            out.push(step.clone());
        }
    }
}

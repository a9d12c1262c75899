//! Restores wrapped subtrees to plain values.
//!
//! Detaching removes each wrapper from the registry before descending into its
//! children, so by the time a subtree is handed back as a [`Value`] none of its
//! old handles resolve. Leaves pass through untouched and array holes come
//! back as `null`. Nothing here reaches the handler.

use deeptrap_value::Value;

use crate::registry::{Body, NodeId, Registry, Slot};
use crate::tracing_macros::trace;

/// Consume a slot and return its plain value.
pub(crate) fn detach(registry: &mut Registry, slot: Slot) -> Value {
    match slot {
        Slot::Leaf(value) => value,
        Slot::Hole => Value::Null,
        Slot::Node(id) => detach_node(registry, id).unwrap_or_default(),
    }
}

/// Unregister `id` and its whole subtree, returning the plain container.
///
/// `None` if `id` is already stale.
pub(crate) fn detach_node(registry: &mut Registry, id: NodeId) -> Option<Value> {
    let node = registry.remove(id)?;
    trace!(node = %id, "detached wrapper");
    Some(restore(registry, node.body))
}

/// Detach every slot of a body that was never registered itself.
pub(crate) fn discard(registry: &mut Registry, body: Body) {
    drop(restore(registry, body));
}

fn restore(registry: &mut Registry, body: Body) -> Value {
    match body {
        Body::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, slot)| (key, detach(registry, slot)))
                .collect(),
        ),
        Body::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|slot| detach(registry, slot))
                .collect(),
        ),
    }
}

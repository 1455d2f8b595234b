use serde::{Deserialize, Serialize};

use super::arena::{DiffTree, NodeId};
use crate::input::types::DiffType;

/// Nested treemap node handed to the visualization layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreemapDiffElement {
    pub name: String,
    /// Slash-joined path from the root ("" for the root)
    pub path: String,
    pub size: u64,
    pub size_diff: i64,
    pub diff_type: DiffType,
    pub is_dir: bool,
    #[serde(rename = "type")]
    pub element_type: String,
    /// Present on directories, absent on files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreemapDiffElement>>,
}

impl TreemapDiffElement {
    /// True if this node or any descendant has a nonzero delta.
    pub fn has_changes(&self) -> bool {
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            if element.size_diff != 0 {
                return true;
            }
            stack.extend(element.children());
        }
        false
    }

    pub fn children(&self) -> &[TreemapDiffElement] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Direct child by name; directories win over same-named files.
    pub fn child(&self, name: &str) -> Option<&TreemapDiffElement> {
        let mut matches = self.children().iter().filter(|c| c.name == name);
        let first = matches.next()?;
        if first.is_dir {
            return Some(first);
        }
        Some(matches.find(|c| c.is_dir).unwrap_or(first))
    }
}

// Dropping nested children recursively would use one stack frame per level.
impl Drop for TreemapDiffElement {
    fn drop(&mut self) {
        let Some(mut pending) = self.children.take() else {
            return;
        };
        while let Some(mut child) = pending.pop() {
            if let Some(grandchildren) = child.children.take() {
                pending.extend(grandchildren);
            }
        }
    }
}

/// A node queued for conversion: its arena id, full path, and the
/// slots of its children in sibling order.
struct Pending {
    id: NodeId,
    path: String,
    child_slots: Vec<usize>,
}

impl DiffTree {
    /// Convert the subtree rooted at `id` into the nested output shape.
    ///
    /// Works without recursion: a pre-order walk assigns each node a slot
    /// (children after their parent), then slots are assembled in reverse.
    pub fn to_element(&self, id: NodeId) -> TreemapDiffElement {
        let mut order = vec![Pending {
            id,
            path: self.path_of(id),
            child_slots: Vec::new(),
        }];
        let mut stack: Vec<(NodeId, usize)> = self.child_entries(id, 0);

        while let Some((node_id, parent_slot)) = stack.pop() {
            let name = &self.get(node_id).name;
            let parent_path = &order[parent_slot].path;
            let path = if parent_path.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", parent_path, name)
            };

            let slot = order.len();
            order[parent_slot].child_slots.push(slot);
            order.push(Pending {
                id: node_id,
                path,
                child_slots: Vec::new(),
            });
            stack.extend(self.child_entries(node_id, slot));
        }

        let mut built: Vec<Option<TreemapDiffElement>> = Vec::with_capacity(order.len());
        built.resize_with(order.len(), || None);

        let descendants = order.split_off(1);
        for (offset, pending) in descendants.into_iter().enumerate().rev() {
            let element = self.element_from(pending, &mut built);
            built[offset + 1] = Some(element);
        }

        // only the subtree root is left in `order`
        let root = order.swap_remove(0);
        self.element_from(root, &mut built)
    }

    /// Children of `id` paired with the parent slot, reversed so they pop in sibling order.
    fn child_entries(&self, id: NodeId, parent_slot: usize) -> Vec<(NodeId, usize)> {
        let mut entries: Vec<(NodeId, usize)> =
            self.children(id).map(|c| (c, parent_slot)).collect();
        entries.reverse();
        entries
    }

    fn element_from(
        &self,
        pending: Pending,
        built: &mut [Option<TreemapDiffElement>],
    ) -> TreemapDiffElement {
        let node = self.get(pending.id);
        let children = node.is_dir.then(|| {
            pending
                .child_slots
                .iter()
                .filter_map(|&slot| built[slot].take())
                .collect()
        });

        TreemapDiffElement {
            name: node.name.to_string(),
            path: pending.path,
            size: node.size,
            size_diff: node.size_diff,
            diff_type: node.diff_type,
            is_dir: node.is_dir,
            element_type: node.item_type.to_string(),
            children,
        }
    }
}

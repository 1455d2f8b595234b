use std::cmp::Reverse;

use super::arena::{DiffTree, NodeId};
use crate::input::types::DiffType;

/// Compute aggregated size and delta for all directory nodes (bottom-up).
///
/// Only directories whose own `size` and `size_diff` are both zero are filled.
/// A filled directory becomes `Increased` or `Decreased` by the sign of its delta;
/// a zero aggregate keeps whatever `diff_type` it was built with.
pub fn aggregate_diffs(tree: &mut DiffTree) {
    // Children always have higher indices than their parents in the arena,
    // so a reverse sweep visits every child before its parent.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if !node.is_dir || node.size != 0 || node.size_diff != 0 {
            continue;
        }

        let mut size: u64 = 0;
        let mut size_diff: i64 = 0;
        let mut child = node.first_child;
        while let Some(child_id) = child {
            let c = &tree.nodes[child_id.index()];
            size = size.saturating_add(c.size);
            size_diff = size_diff.saturating_add(c.size_diff);
            child = c.next_sibling;
        }

        let node = &mut tree.nodes[i];
        node.size = size;
        node.size_diff = size_diff;
        if size_diff > 0 {
            node.diff_type = DiffType::Increased;
        } else if size_diff < 0 {
            node.diff_type = DiffType::Decreased;
        }
    }
}

/// Re-link every directory's sibling list by delta magnitude (descending), then size.
/// Nodes do not move in the arena.
pub fn sort_children_by_magnitude(tree: &mut DiffTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if !tree.nodes[i].is_dir || tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut children: Vec<NodeId> = tree.children(NodeId(i as u32)).collect();
        children.sort_by_key(|&id| {
            let n = tree.get(id);
            (Reverse(n.size_diff.unsigned_abs()), Reverse(n.size))
        });

        relink(tree, i, &children);
    }
}

/// Re-link every directory's sibling list by absolute size (descending).
/// The squarified layout expects children in this order.
pub fn sort_children_by_size(tree: &mut DiffTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if !tree.nodes[i].is_dir || tree.nodes[i].first_child.is_none() {
            continue;
        }

        let mut children: Vec<NodeId> = tree.children(NodeId(i as u32)).collect();
        children.sort_by_key(|&id| Reverse(tree.get(id).size));

        relink(tree, i, &children);
    }
}

fn relink(tree: &mut DiffTree, parent: usize, children: &[NodeId]) {
    let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
        return;
    };
    tree.nodes[parent].first_child = Some(first);
    tree.nodes[parent].last_child = Some(last);
    for w in children.windows(2) {
        tree.nodes[w[0].index()].next_sibling = Some(w[1]);
    }
    tree.nodes[last.index()].next_sibling = None;
}

use std::collections::HashMap;

use compact_str::CompactString;

use crate::input::types::{DiffType, DEFAULT_ITEM_TYPE};

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "root";

/// Index into the arena `Vec<DiffNode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node in the diff tree, stored in a flat arena.
/// Uses sibling-list representation; children are appended, so sibling order is insertion order.
#[derive(Debug, Clone)]
pub struct DiffNode {
    /// Final path segment (not the full path)
    pub name: CompactString,
    /// For files: size from the sizing rule. For dirs: aggregated sum of children.
    pub size: u64,
    /// For files: delta from input. For dirs: aggregated sum of children.
    pub size_diff: i64,
    pub diff_type: DiffType,
    pub is_dir: bool,
    /// Category label
    pub item_type: CompactString,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u32,
}

impl DiffNode {
    /// Fresh directory node; sizes are filled in by aggregation.
    pub fn directory(name: &str) -> Self {
        Self {
            name: CompactString::new(name),
            size: 0,
            size_diff: 0,
            diff_type: DiffType::Increased,
            is_dir: true,
            item_type: CompactString::new(DEFAULT_ITEM_TYPE),
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }

    pub fn file(name: &str, size: u64, size_diff: i64, diff_type: DiffType, item_type: &str) -> Self {
        Self {
            name: CompactString::new(name),
            size,
            size_diff,
            diff_type,
            is_dir: false,
            item_type: CompactString::new(item_type),
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }
}

/// The diff tree stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct DiffTree {
    /// All nodes in contiguous memory; parents always precede their children
    pub nodes: Vec<DiffNode>,
    pub root: NodeId,
    /// Directory children keyed by (parent, name). Only directories are registered,
    /// so a file never shadows a same-named directory at its level.
    dirs: HashMap<(NodeId, CompactString), NodeId>,
}

impl Default for DiffTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffTree {
    /// Create a tree holding only the synthetic root directory.
    pub fn new() -> Self {
        DiffTree {
            nodes: vec![DiffNode::directory(ROOT_NAME)],
            root: NodeId(0),
            dirs: HashMap::new(),
        }
    }

    /// Append a child under the given parent. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: DiffNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth.saturating_add(1);
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        if node.is_dir {
            self.dirs.insert((parent, node.name.clone()), new_id);
        }

        self.nodes.push(node);
        new_id
    }

    /// Directory child of `parent` with the given name, if one exists.
    pub fn child_dir(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.dirs.get(&(parent, CompactString::new(name))).copied()
    }

    /// Return the directory child of `parent` named `name`, creating it if needed.
    pub fn ensure_dir(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.child_dir(parent, name) {
            Some(id) => id,
            None => self.add_child(parent, DiffNode::directory(name)),
        }
    }

    pub fn get(&self, id: NodeId) -> &DiffNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut DiffNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node in sibling order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.get(id).depth
    }

    /// Slash-joined path from the root; empty for the root itself.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            if node_id == self.root {
                break;
            }
            let node = self.get(node_id);
            parts.push(node.name.as_str());
            current = node.parent;
        }

        parts.reverse();
        parts.join("/")
    }

    /// Find a node by slash path. Directories win over same-named files at each level.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match self.child_dir(current, segment) {
                Some(id) => id,
                None => self
                    .children(current)
                    .find(|&id| self.get(id).name == segment)?,
            };
        }
        Some(current)
    }

    /// True if any node carries a nonzero delta.
    pub fn has_changes(&self) -> bool {
        self.nodes.iter().any(|n| n.size_diff != 0)
    }

    /// True if `id` or any node below it carries a nonzero delta.
    /// A directory whose changes cancel out still counts as changed.
    pub fn subtree_has_changes(&self, id: NodeId) -> bool {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.get(current).size_diff != 0 {
                return true;
            }
            stack.extend(self.children(current));
        }
        false
    }

    /// `subtree_has_changes` for every node at once, indexed by `NodeId::index`.
    pub fn changed_subtrees(&self) -> Vec<bool> {
        let mut changed: Vec<bool> = self.nodes.iter().map(|n| n.size_diff != 0).collect();
        // Parents precede children, so one reverse sweep reaches every ancestor
        for i in (0..self.nodes.len()).rev() {
            if let (true, Some(parent)) = (changed[i], self.nodes[i].parent) {
                changed[parent.index()] = true;
            }
        }
        changed
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a DiffTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}

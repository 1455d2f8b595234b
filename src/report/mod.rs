pub mod format;

use serde::Serialize;

use self::format::{format_size, format_size_diff};
use crate::input::types::DiffType;
use crate::tree::arena::{DiffTree, NodeId};

/// Totals over the file leaves of a diff tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub files: usize,
    pub added: usize,
    pub removed: usize,
    pub increased: usize,
    pub decreased: usize,
    /// Sum of positive deltas
    pub growth: u64,
    /// Sum of negative deltas, as a magnitude
    pub shrink: u64,
    pub net: i64,
}

impl DiffSummary {
    /// Summarize the files under `root` (any subtree).
    pub fn from_subtree(tree: &DiffTree, root: NodeId) -> Self {
        let mut summary = DiffSummary::default();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let node = tree.get(id);
            if node.is_dir {
                stack.extend(tree.children(id));
                continue;
            }

            summary.files += 1;
            match node.diff_type {
                DiffType::Added => summary.added += 1,
                DiffType::Removed => summary.removed += 1,
                DiffType::Increased => summary.increased += 1,
                DiffType::Decreased => summary.decreased += 1,
            }
            if node.size_diff > 0 {
                summary.growth = summary.growth.saturating_add(node.size_diff.unsigned_abs());
            } else {
                summary.shrink = summary.shrink.saturating_add(node.size_diff.unsigned_abs());
            }
            summary.net = summary.net.saturating_add(node.size_diff);
        }

        summary
    }

    pub fn from_tree(tree: &DiffTree) -> Self {
        Self::from_subtree(tree, tree.root)
    }

    pub fn render(&self) -> String {
        format!(
            "{} files changed ({} added, {} removed, {} increased, {} decreased)\n\
             growth {}, shrink {}, net {}\n",
            self.files,
            self.added,
            self.removed,
            self.increased,
            self.decreased,
            format_size(self.growth),
            format_size(self.shrink),
            format_size_diff(self.net),
        )
    }
}

/// Options for the indented text rendering.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Deepest level printed, relative to the rendered root
    pub max_depth: u16,
    /// Leave out subtrees with no nonzero delta anywhere in them.
    /// A directory whose changes cancel out is still shown.
    pub hide_unchanged: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_depth: u16::MAX,
            hide_unchanged: false,
        }
    }
}

/// Render the subtree at `root` as an indented listing, one node per line.
pub fn render_text(tree: &DiffTree, root: NodeId, config: &ReportConfig) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0u16)];
    let changed = if config.hide_unchanged {
        tree.changed_subtrees()
    } else {
        Vec::new()
    };

    while let Some((id, level)) = stack.pop() {
        let node = tree.get(id);
        if level > 0 && config.hide_unchanged && !changed[id.index()] {
            continue;
        }

        let label = if id == tree.root {
            "/".to_string()
        } else if node.is_dir {
            format!("{}/", node.name)
        } else {
            node.name.to_string()
        };
        out.push_str(&format!(
            "{:indent$}{}  {}  {}  [{}]\n",
            "",
            label,
            format_size(node.size),
            format_size_diff(node.size_diff),
            node.diff_type.as_str(),
            indent = usize::from(level) * 2
        ));

        if node.is_dir && level < config.max_depth {
            let children: Vec<NodeId> = tree.children(id).collect();
            stack.extend(children.into_iter().rev().map(|c| (c, level + 1)));
        }
    }

    out
}

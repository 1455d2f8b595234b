pub mod aggregate;
pub mod arena;
pub mod element;
pub mod sizing;

use self::arena::{DiffNode, DiffTree};
use self::element::TreemapDiffElement;
use crate::input::types::DiffItem;

/// Build an aggregated diff tree from a flat list of changed files.
///
/// Returns `None` for empty input. Every item becomes one leaf, under
/// directories created (or reused) along its path.
pub fn build_diff_tree(items: &[DiffItem]) -> Option<DiffTree> {
    if items.is_empty() {
        return None;
    }

    tracing::debug!("Building diff tree from {} items", items.len());

    let mut tree = DiffTree::new();
    let mut skipped = 0usize;

    for item in items {
        let segments: Vec<&str> = item.segments().collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            tracing::warn!("Skipping diff item with empty path '{}'", item.path);
            skipped += 1;
            continue;
        };

        let mut parent = tree.root;
        for dir in dirs {
            parent = tree.ensure_dir(parent, dir);
        }

        let node = DiffNode::file(
            file_name,
            sizing::file_size(item),
            item.size_diff,
            item.diff_type,
            item.category(),
        );
        tree.add_child(parent, node);
    }

    aggregate::aggregate_diffs(&mut tree);

    let root = tree.get(tree.root);
    tracing::info!(
        "Diff tree built: {} nodes, {} top-level entries, net {} bytes ({} skipped)",
        tree.len(),
        tree.children(tree.root).count(),
        root.size_diff,
        skipped
    );

    Some(tree)
}

/// Build the nested treemap element for a list of changed files.
/// `None` only for empty input; an all-zero diff still yields a tree.
pub fn build_tree_from_diff_items(items: &[DiffItem]) -> Option<TreemapDiffElement> {
    let tree = build_diff_tree(items)?;
    Some(tree.to_element(tree.root))
}

/// Like [`build_tree_from_diff_items`], but `None` when nothing changed anywhere,
/// so callers can show an empty state instead of an all-zero treemap.
pub fn build_treemap_diff(items: &[DiffItem]) -> Option<TreemapDiffElement> {
    let root = build_tree_from_diff_items(items)?;
    if !root.has_changes() {
        tracing::debug!("Diff tree has no nonzero deltas; nothing to render");
        return None;
    }
    Some(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::DiffType;

    const MB: i64 = 1024 * 1024;

    fn check_sums(element: &TreemapDiffElement) {
        if !element.is_dir {
            return;
        }
        let children = element.children();
        assert_eq!(
            element.size,
            children.iter().map(|c| c.size).sum::<u64>(),
            "size of '{}'",
            element.path
        );
        assert_eq!(
            element.size_diff,
            children.iter().map(|c| c.size_diff).sum::<i64>(),
            "size_diff of '{}'",
            element.path
        );
        children.iter().for_each(check_sums);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(build_diff_tree(&[]).is_none());
        assert!(build_tree_from_diff_items(&[]).is_none());
        assert!(build_treemap_diff(&[]).is_none());
    }

    #[test]
    fn single_added_file() {
        let items = [DiffItem::new("src/app.js", 1000, DiffType::Added).with_head_size(2000)];
        let root = build_tree_from_diff_items(&items).unwrap();

        assert_eq!(root.name, "root");
        assert_eq!(root.path, "");
        assert!(root.is_dir);
        assert_eq!(root.children().len(), 1);

        let src = &root.children()[0];
        assert_eq!(src.name, "src");
        assert!(src.is_dir);
        assert_eq!(src.children().len(), 1);

        let app = &src.children()[0];
        assert_eq!(app.name, "app.js");
        assert_eq!(app.path, "src/app.js");
        assert!(!app.is_dir);
        assert_eq!(app.size, 2000);
        assert_eq!(app.size_diff, 1000);
        assert_eq!(app.diff_type, DiffType::Added);
    }

    #[test]
    fn siblings_share_directory() {
        let items = [
            DiffItem::new("src/file1.js", 500, DiffType::Added),
            DiffItem::new("src/file2.js", 300, DiffType::Added),
        ];
        let root = build_tree_from_diff_items(&items).unwrap();

        assert_eq!(root.children().len(), 1);
        let src = &root.children()[0];
        assert_eq!(src.size_diff, 800);
        assert_eq!(src.diff_type, DiffType::Increased);
        assert_eq!(src.children().len(), 2);
        check_sums(&root);
    }

    #[test]
    fn net_shrink_propagates_to_root() {
        let items = [
            DiffItem::new("A/B", -51 * MB, DiffType::Decreased),
            DiffItem::new("A/C", MB, DiffType::Increased),
        ];
        let root = build_tree_from_diff_items(&items).unwrap();

        let a = root.child("A").unwrap();
        assert_eq!(a.size_diff, -50 * MB);
        assert_eq!(a.diff_type, DiffType::Decreased);
        assert_eq!(root.diff_type, DiffType::Decreased);
        check_sums(&root);
    }

    #[test]
    fn all_zero_diff_is_not_a_treemap() {
        let items = [
            DiffItem::new("a/x", 0, DiffType::Increased).with_head_size(10),
            DiffItem::new("b/y", 0, DiffType::Decreased).with_head_size(20),
        ];
        assert!(build_treemap_diff(&items).is_none());

        let root = build_tree_from_diff_items(&items).unwrap();
        assert_eq!(root.size, 30);
        assert_eq!(root.size_diff, 0);
        assert_eq!(root.diff_type, DiffType::Increased);
    }

    #[test]
    fn removed_file_uses_base_size() {
        let items = [DiffItem::new("res/logo.png", -800, DiffType::Removed).with_base_size(800)];
        let root = build_treemap_diff(&items).unwrap();
        let logo = root.child("res").unwrap().child("logo.png").unwrap();
        assert_eq!(logo.size, 800);
        assert_eq!(logo.diff_type, DiffType::Removed);
    }

    #[test]
    fn same_named_file_and_directory_stay_distinct() {
        let items = [
            DiffItem::new("lib", 5, DiffType::Added),
            DiffItem::new("lib/inner.so", 7, DiffType::Added),
        ];
        let root = build_tree_from_diff_items(&items).unwrap();

        assert_eq!(root.children().len(), 2);
        assert!(!root.children()[0].is_dir);
        assert!(root.children()[1].is_dir);
        assert_eq!(root.size_diff, 12);
    }

    #[test]
    fn duplicate_paths_produce_separate_leaves() {
        let items = [
            DiffItem::new("a/x", 1, DiffType::Increased),
            DiffItem::new("a/x", 2, DiffType::Increased),
        ];
        let root = build_tree_from_diff_items(&items).unwrap();
        assert_eq!(root.child("a").unwrap().children().len(), 2);
        assert_eq!(root.size_diff, 3);
    }

    #[test]
    fn messy_slashes_and_empty_paths() {
        let items = [
            DiffItem::new("/src//deep/file.js/", 4, DiffType::Added),
            DiffItem::new("//", 9, DiffType::Added),
        ];
        let root = build_tree_from_diff_items(&items).unwrap();
        let file = root
            .child("src")
            .and_then(|s| s.child("deep"))
            .and_then(|d| d.child("file.js"))
            .unwrap();
        assert_eq!(file.path, "src/deep/file.js");
        assert_eq!(root.size_diff, 4);
    }

    #[test]
    fn item_type_carries_to_leaves_only() {
        let items = [DiffItem::new("dex/classes.dex", 10, DiffType::Increased).with_item_type("dex")];
        let root = build_tree_from_diff_items(&items).unwrap();
        let dir = root.child("dex").unwrap();
        assert_eq!(dir.element_type, "files");
        assert_eq!(dir.children()[0].element_type, "dex");
    }

    #[test]
    fn very_long_path_builds_arena() {
        let path = vec!["d"; 70_000].join("/");
        let items = [DiffItem::new(path.as_str(), 3, DiffType::Added)];
        let tree = build_diff_tree(&items).unwrap();

        assert_eq!(tree.len(), 70_001);
        let leaf = tree.find(&path).unwrap();
        assert_eq!(tree.depth(leaf), 70_000);
        assert_eq!(tree.get(tree.root).size_diff, 3);
    }

    #[test]
    fn deep_path_converts_without_recursion() {
        let depth = 5_000;
        let path = vec!["d"; depth].join("/");
        let items = [
            DiffItem::new(path.as_str(), 8, DiffType::Added).with_head_size(8),
            DiffItem::new("d/side.txt", -2, DiffType::Decreased).with_head_size(1),
        ];
        let root = build_treemap_diff(&items).unwrap();
        assert_eq!(root.size_diff, 6);
        assert_eq!(root.size, 9);

        let mut current = &root;
        let mut levels = 0;
        while let Some(next) = current.children().first() {
            current = next;
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert!(!current.is_dir);
        assert_eq!(current.path, path);
        assert_eq!(current.size_diff, 8);
    }

    #[test]
    fn input_is_not_mutated() {
        let items = vec![
            DiffItem::new("a/b", 3, DiffType::Increased),
            DiffItem::new("a/c", -1, DiffType::Decreased),
        ];
        let before = items.clone();
        let first = build_tree_from_diff_items(&items);
        let second = build_tree_from_diff_items(&items);
        assert_eq!(items, before);
        assert_eq!(first, second);
    }
}

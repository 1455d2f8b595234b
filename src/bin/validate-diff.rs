/// Validation tool for the diff pipeline
/// Checks: Input → Tree → Aggregation → Layout, without a renderer
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use treemap_diff::input;
use treemap_diff::layout::{compute_layout, LayoutConfig};
use treemap_diff::report::format::{format_size, format_size_diff};
use treemap_diff::tree::arena::{DiffTree, NodeId, ROOT_NAME};
use treemap_diff::tree::build_diff_tree;

/// Check a diff input against the tree and layout invariants.
#[derive(Debug, Parser)]
#[command(name = "validate-diff")]
struct Args {
    /// Diff items as JSON
    input: PathBuf,

    #[arg(long, default_value_t = 1920.0)]
    width: f32,

    #[arg(long, default_value_t = 1080.0)]
    height: f32,
}

const MAX_REPORTED: usize = 5;

/// Directory sums and path shape, for every node.
fn check_tree(tree: &DiffTree) -> Vec<String> {
    let mut errors = Vec::new();

    let root = tree.get(tree.root);
    if root.name != ROOT_NAME || !root.is_dir || !tree.path_of(tree.root).is_empty() {
        errors.push("root node is not a synthetic 'root' directory".to_string());
    }

    for i in 0..tree.len() {
        let id = NodeId(i as u32);
        let node = tree.get(id);

        if let Some(parent) = node.parent {
            let expected = match tree.path_of(parent) {
                p if p.is_empty() => node.name.to_string(),
                p => format!("{}/{}", p, node.name),
            };
            if tree.path_of(id) != expected {
                errors.push(format!("path of '{}' does not extend its parent", node.name));
            }
        }

        if !node.is_dir {
            continue;
        }
        // Aggregation saturates, so the check must too
        let size = tree
            .children(id)
            .fold(0u64, |acc, c| acc.saturating_add(tree.get(c).size));
        let size_diff = tree
            .children(id)
            .fold(0i64, |acc, c| acc.saturating_add(tree.get(c).size_diff));
        if size != node.size || size_diff != node.size_diff {
            errors.push(format!(
                "directory '{}' holds {} / {} but children sum to {} / {}",
                tree.path_of(id),
                node.size,
                node.size_diff,
                size,
                size_diff
            ));
        }
    }

    errors
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("treemap_diff=info".parse()?),
        )
        .init();

    let args = Args::parse();

    println!("Target: {}", args.input.display());
    println!();

    // === STAGE 1: INPUT ===
    println!("┌─ STAGE 1: INPUT ───────────────────────────────────────────┐");
    let start = std::time::Instant::now();
    let items = input::load_diff_items(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("  ✓ Loaded {} items in {:.2}ms", items.len(), start.elapsed().as_secs_f64() * 1000.0);
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 2: TREE ===
    println!("┌─ STAGE 2: TREE CONSTRUCTION ───────────────────────────────┐");
    let start = std::time::Instant::now();
    let Some(tree) = build_diff_tree(&items) else {
        println!("  ✓ Empty input, nothing to render");
        println!("└────────────────────────────────────────────────────────────┘");
        return Ok(ExitCode::SUCCESS);
    };
    let root = tree.get(tree.root);
    println!("  ✓ Tree built in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
    println!("  ✓ Nodes:    {} total", tree.len());
    println!(
        "  ✓ Root:     {} ({}), {}",
        format_size(root.size),
        format_size_diff(root.size_diff),
        root.diff_type.as_str()
    );
    if !tree.has_changes() {
        println!("  ⚠ No nonzero deltas; the treemap would be empty");
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 3: INVARIANTS ===
    println!("┌─ STAGE 3: AGGREGATION INVARIANTS ──────────────────────────┐");
    let errors = check_tree(&tree);
    for e in errors.iter().take(MAX_REPORTED) {
        println!("  ✗ {}", e);
    }
    if errors.len() > MAX_REPORTED {
        println!("  ... (truncated, {} errors)", errors.len());
    }
    if errors.is_empty() {
        println!("  ✓ Directory sums and paths consistent");
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 4: LAYOUT ===
    println!("┌─ STAGE 4: SQUARIFIED LAYOUT ───────────────────────────────┐");
    let start = std::time::Instant::now();
    let layout = compute_layout(&tree, tree.root, args.width, args.height, &LayoutConfig::default());
    println!(
        "  ✓ {} rectangles in {:.2}ms",
        layout.rects.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    let invalid = layout
        .rects
        .iter()
        .filter(|r| !r.w.is_finite() || !r.h.is_finite() || r.w <= 0.0 || r.h <= 0.0)
        .count();
    if invalid > 0 {
        println!("  ✗ {} rectangles with non-finite or empty dimensions", invalid);
    } else {
        println!("  ✓ All rectangles finite and positive");
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    if errors.is_empty() && invalid == 0 {
        println!("✓ ALL CHECKS PASSED");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("✗ VALIDATION FAILED");
        Ok(ExitCode::FAILURE)
    }
}

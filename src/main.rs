use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use treemap_diff::input;
use treemap_diff::layout::{compute_layout, LayoutConfig};
use treemap_diff::report::{self, DiffSummary, ReportConfig};
use treemap_diff::tree::{aggregate, build_diff_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Nested treemap element as JSON
    Json,
    /// Indented tree listing
    Text,
    /// Change counts and totals
    Summary,
}

/// Build a size-diff treemap from a list of changed files.
#[derive(Debug, Parser)]
#[command(name = "treemap-diff", version)]
struct Args {
    /// Diff items as JSON (array or object with `diff_items`); `-` or omitted reads stdin
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Only output the subtree at this slash path
    #[arg(long)]
    focus: Option<String>,

    /// Order children by largest change first instead of input order
    #[arg(long)]
    sort: bool,

    /// Deepest level printed by the text format
    #[arg(long)]
    depth: Option<u16>,

    /// Leave out subtrees with no changes at all (text format)
    #[arg(long)]
    hide_unchanged: bool,

    /// Print squarified layout rectangles for a WIDTHxHEIGHT viewport instead
    #[arg(long, value_parser = parse_viewport)]
    layout: Option<(f32, f32)>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct RectOut {
    path: String,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    depth: u16,
}

fn parse_viewport(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("viewport dimensions must be positive".to_string());
    }
    Ok((w, h))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("treemap_diff=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let items = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => input::load_diff_items(path)
            .with_context(|| format!("loading {}", path.display()))?,
        _ => input::read_diff_items(std::io::stdin().lock()).context("reading stdin")?,
    };

    // Same empty-state rule as build_treemap_diff, kept on the arena for focus/layout
    let mut tree = match build_diff_tree(&items) {
        Some(tree) if tree.has_changes() => tree,
        _ => {
            tracing::info!("No size changes in {} items", items.len());
            println!("No size changes.");
            return Ok(());
        }
    };

    if args.sort {
        aggregate::sort_children_by_magnitude(&mut tree);
    }

    let root = match args.focus.as_deref() {
        Some(path) => match tree.find(path) {
            Some(id) => id,
            None => bail!("no node at path '{}'", path),
        },
        None => tree.root,
    };

    let output = if let Some((w, h)) = args.layout {
        let layout = compute_layout(&tree, root, w, h, &LayoutConfig::default());
        let rects: Vec<RectOut> = layout
            .rects
            .iter()
            .map(|r| RectOut {
                path: tree.path_of(r.node),
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
                depth: r.depth,
            })
            .collect();
        to_json(&rects, args.pretty)?
    } else {
        match args.format {
            OutputFormat::Json => to_json(&tree.to_element(root), args.pretty)?,
            OutputFormat::Text => {
                let config = ReportConfig {
                    max_depth: args.depth.unwrap_or(u16::MAX),
                    hide_unchanged: args.hide_unchanged,
                };
                report::render_text(&tree, root, &config)
            }
            OutputFormat::Summary => DiffSummary::from_subtree(&tree, root).render(),
        }
    };

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", output)?;
    if !output.ends_with('\n') {
        writeln!(stdout)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("1920x1080"), Ok((1920.0, 1080.0)));
        assert_eq!(parse_viewport("800X600"), Ok((800.0, 600.0)));
        assert!(parse_viewport("800").is_err());
        assert!(parse_viewport("0x10").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "treemap-diff",
            "diff.json",
            "--format",
            "text",
            "--sort",
            "--depth",
            "2",
            "--focus",
            "src",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.sort);
        assert_eq!(args.depth, Some(2));
        assert_eq!(args.focus.as_deref(), Some("src"));
        assert_eq!(args.layout, None);
    }
}

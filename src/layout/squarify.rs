use std::cmp::Reverse;
use std::collections::HashMap;

use crate::tree::arena::{DiffTree, NodeId};

/// A positioned rectangle in the treemap layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRect {
    pub node: NodeId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub depth: u16,
}

/// The full layout result (rects + fast lookup).
#[derive(Debug)]
pub struct Layout {
    /// All visible rectangles, parents before children
    pub rects: Vec<LayoutRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn rect_for(&self, node: NodeId) -> Option<&LayoutRect> {
        self.node_to_rect.get(&node).map(|&i| &self.rects[i])
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Minimum area (px²) to emit a node
    pub min_area: f32,
    /// Base padding between a directory and its children (px)
    pub padding: f32,
    /// How much padding shrinks per nesting level
    pub padding_falloff: f32,
    /// Maximum recursion depth
    pub max_depth: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_area: 1.0,
            padding: 1.5,
            padding_falloff: 0.75,
            max_depth: 64,
        }
    }
}

/// Lay out any subtree of the diff tree, sized by absolute `size`.
pub fn compute_layout(
    tree: &DiffTree,
    root: NodeId,
    viewport_w: f32,
    viewport_h: f32,
    config: &LayoutConfig,
) -> Layout {
    let mut layout = Layout {
        rects: Vec::with_capacity(tree.len()),
        node_to_rect: HashMap::with_capacity(tree.len()),
    };

    layout.rects.push(LayoutRect {
        node: root,
        x: 0.0,
        y: 0.0,
        w: viewport_w,
        h: viewport_h,
        depth: 0,
    });
    layout.node_to_rect.insert(root, 0);

    if tree.get(root).is_dir {
        let frame = Frame {
            x: 0.0,
            y: 0.0,
            w: f64::from(viewport_w),
            h: f64::from(viewport_h),
        };
        layout_children(tree, root, frame, 0, config, &mut layout);
    }

    tracing::debug!(
        "Layout computed: {} rects for '{}' in {:.0}x{:.0}",
        layout.rects.len(),
        tree.get(root).name,
        viewport_w,
        viewport_h
    );

    layout
}

fn layout_children(
    tree: &DiffTree,
    parent: NodeId,
    frame: Frame,
    depth: u16,
    config: &LayoutConfig,
    layout: &mut Layout,
) {
    if depth >= config.max_depth {
        return;
    }

    let pad = if depth == 0 {
        0.0
    } else {
        f64::from(config.padding * config.padding_falloff.powi(i32::from(depth)))
    };
    let inner = Frame {
        x: frame.x + pad,
        y: frame.y + pad,
        w: (frame.w - 2.0 * pad).max(0.0),
        h: (frame.h - 2.0 * pad).max(0.0),
    };
    if (inner.w * inner.h) < f64::from(config.min_area) {
        return;
    }

    let parent_size = tree.get(parent).size as f64;
    if parent_size <= 0.0 {
        return;
    }

    let mut children: Vec<NodeId> = tree
        .children(parent)
        .filter(|&id| tree.get(id).size > 0)
        .collect();
    if children.is_empty() {
        return;
    }
    children.sort_by_key(|&id| Reverse(tree.get(id).size));

    let total_area = inner.w * inner.h;
    let areas: Vec<f64> = children
        .iter()
        .map(|&id| tree.get(id).size as f64 / parent_size * total_area)
        .collect();

    for (slot, child_frame) in squarify(&areas, inner) {
        let child = children[slot];
        if ((child_frame.w * child_frame.h) as f32) < config.min_area {
            continue;
        }

        let idx = layout.rects.len();
        layout.rects.push(LayoutRect {
            node: child,
            x: child_frame.x as f32,
            y: child_frame.y as f32,
            w: child_frame.w as f32,
            h: child_frame.h as f32,
            depth: depth + 1,
        });
        layout.node_to_rect.insert(child, idx);

        if tree.get(child).is_dir {
            layout_children(tree, child, child_frame, depth + 1, config, layout);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Squarified layout of `areas` (sorted descending) inside `frame`.
/// Returns (index into `areas`, placed frame) pairs.
fn squarify(areas: &[f64], frame: Frame) -> Vec<(usize, Frame)> {
    let Frame { mut x, mut y, mut w, mut h } = frame;
    let mut placed = Vec::with_capacity(areas.len());
    let mut start = 0;

    while start < areas.len() {
        if w <= 1e-6 || h <= 1e-6 {
            break;
        }

        // Rows run along the shorter side and eat into the longer one
        let wide = w >= h;
        let side = if wide { h } else { w };

        // Grow the row while the worst aspect ratio keeps improving
        let mut end = start + 1;
        let mut row_sum = areas[start];
        let mut best = worst_aspect_ratio(&areas[start..end], row_sum, side);
        while end < areas.len() {
            let sum = row_sum + areas[end];
            let score = worst_aspect_ratio(&areas[start..=end], sum, side);
            if score > best {
                break;
            }
            best = score;
            row_sum = sum;
            end += 1;
        }

        let thickness = row_sum / side.max(1e-8);

        let mut offset = 0.0;
        for (slot, &area) in areas.iter().enumerate().take(end).skip(start) {
            let length = area / thickness.max(1e-8);
            if !length.is_finite() || !thickness.is_finite() || length <= 0.0 || thickness <= 0.0 {
                tracing::warn!(
                    "Squarify: invalid dimensions (length={}, thickness={}, area={}), skipping",
                    length,
                    thickness,
                    area
                );
                continue;
            }

            let rect = if wide {
                Frame { x, y: y + offset, w: thickness, h: length }
            } else {
                Frame { x: x + offset, y, w: length, h: thickness }
            };
            placed.push((slot, rect));
            offset += length;
        }

        if wide {
            x += thickness;
            w = (w - thickness).max(0.0);
        } else {
            y += thickness;
            h = (h - thickness).max(0.0);
        }

        start = end;
    }

    placed
}

fn worst_aspect_ratio(row: &[f64], sum: f64, side: f64) -> f64 {
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().copied().fold(0.0, f64::max);
    let min_r = row.iter().copied().fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}

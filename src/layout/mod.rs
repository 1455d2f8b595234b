pub mod squarify;

pub use squarify::{compute_layout, Layout, LayoutConfig, LayoutRect};

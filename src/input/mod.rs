pub mod types;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use self::types::{DiffItem, DiffType};
use crate::error::Result;

/// Accepted input shapes: a bare item list, or a comparison object carrying one.
#[derive(Deserialize)]
#[serde(untagged)]
enum DiffInput {
    Items(Vec<DiffItem>),
    Comparison { diff_items: Vec<DiffItem> },
}

/// Decode diff items from a JSON string.
pub fn parse_diff_items(json: &str) -> Result<Vec<DiffItem>> {
    let items = match serde_json::from_str::<DiffInput>(json)? {
        DiffInput::Items(items) => items,
        DiffInput::Comparison { diff_items } => diff_items,
    };
    log_loaded(&items);
    Ok(items)
}

/// Read and decode diff items from any reader (file, stdin).
pub fn read_diff_items<R: Read>(mut reader: R) -> Result<Vec<DiffItem>> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_diff_items(&buf)
}

/// Load diff items from a JSON file on disk.
pub fn load_diff_items(path: &Path) -> Result<Vec<DiffItem>> {
    tracing::debug!("Loading diff items from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_diff_items(std::io::BufReader::new(file))
}

fn log_loaded(items: &[DiffItem]) {
    tracing::info!("Loaded {} diff items", items.len());

    let mut by_type: HashMap<DiffType, usize> = HashMap::new();
    for item in items {
        *by_type.entry(item.diff_type).or_default() += 1;
    }
    for diff_type in [
        DiffType::Added,
        DiffType::Removed,
        DiffType::Increased,
        DiffType::Decreased,
    ] {
        tracing::debug!(
            "  {}: {}",
            diff_type.as_str(),
            by_type.get(&diff_type).copied().unwrap_or(0)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    #[test]
    fn parses_bare_item_list() {
        let items = parse_diff_items(
            r#"[{"path": "src/a.js", "size_diff": 10, "type": "added", "head_size": 10}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "src/a.js");
    }

    #[test]
    fn parses_comparison_envelope() {
        let items = parse_diff_items(
            r#"{
                "diff_items": [
                    {"path": "a", "size_diff": 1, "type": "increased"},
                    {"path": "b", "size_diff": -1, "type": "decreased", "item_type": "dex"}
                ],
                "size_metric_diff_item": {"head_install_size": 10}
            }"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].category(), "dex");
    }

    #[test]
    fn rejects_unknown_diff_type() {
        let err = parse_diff_items(r#"[{"path": "a", "size_diff": 1, "type": "renamed"}]"#)
            .unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }

    #[test]
    fn reads_from_reader() {
        let data = br#"[]"#;
        let items = read_diff_items(&data[..]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_diff_items(Path::new("/nonexistent/diff.json")).unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }
}

use serde::{Deserialize, Serialize};

/// Category label used when an item carries no `item_type`, and for every directory.
pub const DEFAULT_ITEM_TYPE: &str = "files";

/// Per-file change classification, supplied by the comparison producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    Added,
    Removed,
    Increased,
    Decreased,
}

impl DiffType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffType::Added => "added",
            DiffType::Removed => "removed",
            DiffType::Increased => "increased",
            DiffType::Decreased => "decreased",
        }
    }
}

/// One changed file between a base and a head build, before tree construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffItem {
    /// Slash-separated location of the file
    pub path: String,
    /// Signed byte delta (head - base)
    pub size_diff: i64,
    /// Change classification
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    /// Size after the change (absent for removed files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_size: Option<u64>,
    /// Size before the change (absent for added files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<u64>,
    /// Free-form category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl DiffItem {
    pub fn new(path: impl Into<String>, size_diff: i64, diff_type: DiffType) -> Self {
        Self {
            path: path.into(),
            size_diff,
            diff_type,
            head_size: None,
            base_size: None,
            item_type: None,
        }
    }

    pub fn with_head_size(mut self, head_size: u64) -> Self {
        self.head_size = Some(head_size);
        self
    }

    pub fn with_base_size(mut self, base_size: u64) -> Self {
        self.base_size = Some(base_size);
        self
    }

    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Category label, falling back to [`DEFAULT_ITEM_TYPE`].
    pub fn category(&self) -> &str {
        self.item_type.as_deref().unwrap_or(DEFAULT_ITEM_TYPE)
    }
}

use crate::input::types::{DiffItem, DiffType};

/// Absolute size to draw for a changed file.
///
/// Prefers the size field that is authoritative for the change type, then
/// reconstructs from `base_size + size_diff`, and finally falls back to the
/// magnitude of the delta. The last step can misreport files whose size
/// metadata is missing; rule order must stay as is.
pub fn file_size(item: &DiffItem) -> u64 {
    match (item.diff_type, item.head_size, item.base_size) {
        (DiffType::Added, Some(head), _) => head,
        (DiffType::Removed, _, Some(base)) => base,
        (DiffType::Increased | DiffType::Decreased, Some(head), _) => head,
        (_, _, Some(base)) => {
            let reconstructed = i128::from(base) + i128::from(item.size_diff);
            u64::try_from(reconstructed.max(0)).unwrap_or(u64::MAX)
        }
        _ => item.size_diff.unsigned_abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_uses_head_size() {
        let item = DiffItem::new("a", 1000, DiffType::Added).with_head_size(2000);
        assert_eq!(file_size(&item), 2000);
    }

    #[test]
    fn removed_uses_base_size() {
        let item = DiffItem::new("a", -800, DiffType::Removed).with_base_size(800);
        assert_eq!(file_size(&item), 800);
    }

    #[test]
    fn changed_prefers_head_over_base() {
        let item = DiffItem::new("a", 50, DiffType::Increased)
            .with_head_size(150)
            .with_base_size(10);
        assert_eq!(file_size(&item), 150);

        let item = DiffItem::new("a", -50, DiffType::Decreased).with_head_size(70);
        assert_eq!(file_size(&item), 70);
    }

    #[test]
    fn reconstructs_from_base_when_head_missing() {
        let item = DiffItem::new("a", 30, DiffType::Increased).with_base_size(100);
        assert_eq!(file_size(&item), 130);

        // added without head size still goes through the base rule
        let item = DiffItem::new("a", 30, DiffType::Added).with_base_size(5);
        assert_eq!(file_size(&item), 35);
    }

    #[test]
    fn reconstruction_saturates_at_zero() {
        let item = DiffItem::new("a", -500, DiffType::Decreased).with_base_size(100);
        assert_eq!(file_size(&item), 0);
    }

    #[test]
    fn falls_back_to_delta_magnitude() {
        let item = DiffItem::new("a", -640, DiffType::Removed);
        assert_eq!(file_size(&item), 640);
        let item = DiffItem::new("a", 0, DiffType::Increased);
        assert_eq!(file_size(&item), 0);
    }
}

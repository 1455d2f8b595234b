/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Signed variant of [`format_size`]: "+1.5 KB", "-3 B", "0 B".
pub fn format_size_diff(delta: i64) -> String {
    let magnitude = format_size(delta.unsigned_abs());
    match delta.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_binary_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(50 * 1024 * 1024), "50.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn signs_deltas() {
        assert_eq!(format_size_diff(1536), "+1.5 KB");
        assert_eq!(format_size_diff(-51 * 1024 * 1024), "-51.00 MB");
        assert_eq!(format_size_diff(0), "0 B");
        assert_eq!(format_size_diff(-1), "-1 B");
    }
}

//! Channel filter combined with every rule's match mask.

use insight_core::Table;

/// Per-record channel filter.
///
/// Passes every record when the rule has no channel or the table has no
/// channel column. Otherwise compares case-insensitively; the rule side is
/// trimmed, the record side is not.
pub fn channel_mask(table: &Table, channel: Option<&str>, channel_column: &str) -> Vec<bool> {
    let (Some(channel), Some(cells)) = (channel, table.column(channel_column)) else {
        return vec![true; table.len()];
    };
    let wanted = channel.trim().to_lowercase();
    cells
        .iter()
        .map(|v| v.render().to_lowercase() == wanted)
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_columns([(
            "Channel",
            vec!["Twitter".into(), "facebook".into(), " twitter".into()],
        )])
    }

    #[test]
    fn no_channel_passes_everything() {
        assert_eq!(channel_mask(&table(), None, "Channel"), vec![true; 3]);
    }

    #[test]
    fn missing_channel_column_passes_everything() {
        assert_eq!(
            channel_mask(&table(), Some("Twitter"), "Source"),
            vec![true; 3]
        );
    }

    #[test]
    fn case_insensitive_match() {
        assert_eq!(
            channel_mask(&table(), Some(" TWITTER "), "Channel"),
            vec![true, false, false]
        );
    }
}

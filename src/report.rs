use crate::partition::PartitionEntry;
use crate::PartitionTable;

/// Width of the bar-chart area in report output.
const BAR_WIDTH: usize = 50;

/// Per-partition flash utilization, in offset order.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow {
    pub name: String,
    pub kind: &'static str,
    pub subtype: String,
    pub offset: u32,
    pub size: u32,
    /// Percentage of the total addressed flash range.
    pub percent: f64,
}

/// Flash utilization summary computed from a partition table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashUsage {
    /// The addressed flash range: maximum `offset + size` over all entries.
    pub total: u64,
    /// Rows sorted by offset ascending.
    pub rows: Vec<UsageRow>,
}

/// Compute per-partition utilization of the addressed flash range.
///
/// The table itself keeps file order; only the report rows are sorted by
/// offset. Total flash is the maximum `offset + size`, so percentages sum
/// to 100 exactly when the entries tile the range without gaps and to less
/// when gaps exist.
pub fn flash_usage(table: &PartitionTable) -> FlashUsage {
    let mut entries: Vec<&PartitionEntry> = table.entries.iter().collect();
    entries.sort_by_key(|e| e.offset);

    let total = entries.iter().map(|e| e.end()).max().unwrap_or(0);

    let rows = entries
        .iter()
        .map(|e| UsageRow {
            name: e.name.clone(),
            kind: e.kind.label(),
            subtype: e.subtype_label(),
            offset: e.offset,
            size: e.size,
            percent: if total == 0 {
                0.0
            } else {
                f64::from(e.size) * 100.0 / total as f64
            },
        })
        .collect();

    FlashUsage { total, rows }
}

/// Render the utilization table and the proportional flash-layout chart.
pub fn render(usage: &FlashUsage) -> String {
    let mut out = String::new();

    out.push_str("Partition Table\n");
    out.push_str("===============\n");
    out.push_str(&format!(
        "Total flash size: {} ({} bytes)\n\n",
        format_size(usage.total),
        usage.total
    ));

    if usage.rows.is_empty() {
        out.push_str("(no partitions)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:<12} {:<20} {:<12} {:<12} {:<8}\n",
        "Name", "Type", "Subtype", "Offset", "Size", "% of Flash"
    ));
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for row in &usage.rows {
        out.push_str(&format!(
            "{:<10} {:<12} {:<20} {:<12} {:<12} {:<8}\n",
            row.name,
            row.kind,
            row.subtype,
            format!("0x{:X}", row.offset),
            format_size(u64::from(row.size)),
            format!("{:.1}%", row.percent)
        ));
    }

    out.push_str("\nFlash layout:\n");
    out.push_str("=============\n");
    for row in &usage.rows {
        let width = bar_width(row.percent);
        out.push_str(&format!(
            "{:<10} [{:<BAR_WIDTH$}] {:.1}%\n",
            row.name,
            "\u{2588}".repeat(width),
            row.percent
        ));
    }

    out
}

/// Bar length for a percentage; every partition gets at least one cell.
fn bar_width(percent: f64) -> usize {
    ((BAR_WIDTH as f64 * percent / 100.0) as usize).max(1)
}

/// Format a byte count for humans.
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{PartitionKind, SUBTYPE_APP_FACTORY, SUBTYPE_DATA_NVS, SUBTYPE_DATA_SPIFFS};

    fn entry(name: &str, kind: PartitionKind, subtype: u8, offset: u32, size: u32) -> PartitionEntry {
        PartitionEntry {
            name: name.to_string(),
            kind,
            subtype,
            offset,
            size,
        }
    }

    #[test]
    fn test_percentages_sum_to_100_when_entries_tile_the_range() {
        let table = PartitionTable {
            entries: vec![
                entry("a", PartitionKind::Data, SUBTYPE_DATA_NVS, 0, 0x1000),
                entry("b", PartitionKind::App, SUBTYPE_APP_FACTORY, 0x1000, 0x3000),
                entry("c", PartitionKind::Data, SUBTYPE_DATA_SPIFFS, 0x4000, 0x4000),
            ],
        };
        let usage = flash_usage(&table);
        assert_eq!(usage.total, 0x8000);
        let sum: f64 = usage.rows.iter().map(|r| r.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_below_100_with_gaps() {
        let table = PartitionTable {
            entries: vec![
                entry("a", PartitionKind::Data, SUBTYPE_DATA_NVS, 0, 0x1000),
                // gap 0x1000..0x4000
                entry("b", PartitionKind::Data, SUBTYPE_DATA_SPIFFS, 0x4000, 0x4000),
            ],
        };
        let usage = flash_usage(&table);
        assert_eq!(usage.total, 0x8000);
        let sum: f64 = usage.rows.iter().map(|r| r.percent).sum();
        assert!(sum < 100.0 - 1e-9);
    }

    #[test]
    fn test_rows_are_sorted_by_offset_not_file_order() {
        let table = PartitionTable {
            entries: vec![
                entry("high", PartitionKind::Data, SUBTYPE_DATA_SPIFFS, 0x4000, 0x1000),
                entry("low", PartitionKind::Data, SUBTYPE_DATA_NVS, 0x1000, 0x1000),
            ],
        };
        let usage = flash_usage(&table);
        assert_eq!(usage.rows[0].name, "low");
        assert_eq!(usage.rows[1].name, "high");
        // the table itself keeps file order
        assert_eq!(table.entries[0].name, "high");
    }

    #[test]
    fn test_empty_table_renders_without_dividing_by_zero() {
        let usage = flash_usage(&PartitionTable { entries: vec![] });
        assert_eq!(usage.total, 0);
        assert!(render(&usage).contains("(no partitions)"));
    }

    #[test]
    fn test_render_contains_labels_and_bars() {
        let table = PartitionTable {
            entries: vec![entry("nvs", PartitionKind::Data, SUBTYPE_DATA_NVS, 0x9000, 0x5000)],
        };
        let rendered = render(&flash_usage(&table));
        assert!(rendered.contains("Non-volatile Storage"));
        assert!(rendered.contains("0x9000"));
        assert!(rendered.contains('\u{2588}'));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(20 * 1024), "20.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}

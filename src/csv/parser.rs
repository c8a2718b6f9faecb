use csv::StringRecord;
use log::warn;

use crate::partition::{
    resolve_subtype,
    truncate_name,
    PartitionEntry,
    PartitionKind,
    MAX_NAME_LENGTH,
};
use crate::error::Error;
use crate::PartitionTable;

/// Parse partition CSV content into a [`PartitionTable`].
///
/// The format is deliberately lenient, matching the tables the build has
/// always consumed: blank lines and `#` comments are skipped, rows with
/// fewer than five fields are skipped, fields beyond the fifth are
/// ignored, and a row whose numeric fields fail to parse is skipped with a
/// diagnostic instead of failing the run. Unrecognized type or subtype
/// names resolve to 0x00 so an existing table stays flashable; every such
/// default is logged.
pub(crate) fn parse_csv(content: &str) -> Result<PartitionTable, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;

        // The comment handling above only catches lines whose first byte
        // is `#`; also drop rows whose first field begins with one.
        if record.get(0).is_some_and(|f| f.starts_with('#')) {
            continue;
        }
        if record.len() < 5 {
            warn!(
                "skipping partition row with {} fields (5 required): {:?}",
                record.len(),
                record
            );
            continue;
        }

        if let Some(entry) = parse_row(&record) {
            entries.push(entry);
        }
    }

    Ok(PartitionTable { entries })
}

/// Parse one 5-field row. `None` means the row was skipped; the diagnostic
/// has already been logged.
fn parse_row(record: &StringRecord) -> Option<PartitionEntry> {
    let raw_name = &record[0];
    let name = if raw_name.len() > MAX_NAME_LENGTH {
        let cut = truncate_name(raw_name);
        warn!("partition name '{raw_name}' exceeds {MAX_NAME_LENGTH} bytes, truncated to '{cut}'");
        cut
    } else {
        raw_name
    }
    .to_string();

    let kind = match PartitionKind::resolve(&record[1]) {
        Some(kind) => kind,
        None => {
            warn!(
                "unknown partition type '{}' in row '{name}', defaulting to app (0x00)",
                &record[1]
            );
            PartitionKind::App
        }
    };

    let subtype_text = &record[2];
    let subtype = if let Some(value) = parse_number(subtype_text) {
        match u8::try_from(value) {
            Ok(byte) => byte,
            Err(_) => {
                warn!("subtype value {value:#x} in row '{name}' doesn't fit in one byte, skipping row");
                return None;
            }
        }
    } else {
        match resolve_subtype(kind, subtype_text) {
            Some(byte) => byte,
            None => {
                warn!("unknown subtype '{subtype_text}' in row '{name}', defaulting to 0x00");
                0
            }
        }
    };

    let offset = match parse_number(&record[3]) {
        Some(value) => value,
        None => {
            warn!("bad offset '{}' in row '{name}', skipping row", &record[3]);
            return None;
        }
    };
    let size = match parse_number(&record[4]) {
        Some(value) => value,
        None => {
            warn!("bad size '{}' in row '{name}', skipping row", &record[4]);
            return None;
        }
    };

    Some(PartitionEntry {
        name,
        kind,
        subtype,
        offset,
        size,
    })
}

/// Parse a decimal or `0x`-prefixed hexadecimal number.
pub(crate) fn parse_number(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

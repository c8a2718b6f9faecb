use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::partition::consts::*;
use crate::partition::{PartitionEntry, PartitionKind};
use crate::PartitionTable;

/// Parse a partition table binary file at `path`.
pub(crate) fn parse_bin<P: AsRef<Path>>(path: P) -> Result<PartitionTable, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let data = fs::read(path)?;
    parse_bin_data(&data)
}

/// Decode a partition table binary from an in-memory byte slice.
///
/// The binary is a machine-generated artifact, so structural violations
/// (bad magic, a trailing partial record, an unknown type byte) are hard
/// errors rather than per-record skips.
pub(crate) fn parse_bin_data(data: &[u8]) -> Result<PartitionTable, Error> {
    if data.len() < 4 {
        return Err(Error::TruncatedTable(data.len()));
    }

    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic != PARTITION_TABLE_MAGIC {
        return Err(Error::BadMagic(magic));
    }

    let body = &data[4..];
    if !body.len().is_multiple_of(RECORD_SIZE) {
        return Err(Error::TruncatedTable(data.len()));
    }

    let mut entries = Vec::with_capacity(body.len() / RECORD_SIZE);
    for record in body.chunks_exact(RECORD_SIZE) {
        entries.push(parse_record(record)?);
    }

    Ok(PartitionTable { entries })
}

fn parse_record(record: &[u8]) -> Result<PartitionEntry, Error> {
    let name_field = &record[..NAME_FIELD_SIZE];
    let name_len = name_field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(NAME_FIELD_SIZE);
    let name = std::str::from_utf8(&name_field[..name_len])?.to_string();

    let kind = PartitionKind::from_code(record[16]).ok_or(Error::UnknownTypeCode(record[16]))?;
    let subtype = record[17];
    // record[18..20] are the reserved flag bytes; ignored on read
    let offset = u32::from_le_bytes([record[20], record[21], record[22], record[23]]);
    let size = u32::from_le_bytes([record[24], record[25], record[26], record[27]]);

    Ok(PartitionEntry {
        name,
        kind,
        subtype,
        offset,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_trims_name_padding() {
        let mut record = [0u8; RECORD_SIZE];
        record[..3].copy_from_slice(b"nvs");
        record[16] = TYPE_DATA;
        record[17] = SUBTYPE_DATA_NVS;
        record[20..24].copy_from_slice(&0x9000u32.to_le_bytes());
        record[24..28].copy_from_slice(&0x5000u32.to_le_bytes());

        let entry = parse_record(&record).unwrap();
        assert_eq!(entry.name, "nvs");
        assert_eq!(entry.kind, PartitionKind::Data);
        assert_eq!(entry.subtype, SUBTYPE_DATA_NVS);
        assert_eq!(entry.offset, 0x9000);
        assert_eq!(entry.size, 0x5000);
    }

    #[test]
    fn test_unknown_type_byte_is_an_error() {
        let mut record = [0u8; RECORD_SIZE];
        record[..4].copy_from_slice(b"oops");
        record[16] = 0x7F;
        assert!(matches!(
            parse_record(&record),
            Err(Error::UnknownTypeCode(0x7F))
        ));
    }
}

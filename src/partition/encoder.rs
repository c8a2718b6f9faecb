use crate::partition::consts::*;
use crate::partition::truncate_name;
use crate::PartitionTable;

/// Encode a partition table into the binary image the bootloader reads.
///
/// Layout: 4-byte little-endian magic, then one 28-byte record per entry
/// in table order. There is no checksum, entry count, or terminator; the
/// image length alone determines the number of records.
pub(crate) fn encode_table(table: &PartitionTable) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + table.entries.len() * RECORD_SIZE);
    data.extend_from_slice(&PARTITION_TABLE_MAGIC.to_le_bytes());

    for entry in &table.entries {
        let name = truncate_name(&entry.name);
        let mut name_field = [0u8; NAME_FIELD_SIZE];
        name_field[..name.len()].copy_from_slice(name.as_bytes());

        data.extend_from_slice(&name_field);
        data.push(entry.kind.code());
        data.push(entry.subtype);
        // two reserved flag bytes, always zero
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&entry.offset.to_le_bytes());
        data.extend_from_slice(&entry.size.to_le_bytes());
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{PartitionEntry, PartitionKind};

    #[test]
    fn test_empty_table_is_just_the_magic() {
        let table = PartitionTable { entries: vec![] };
        assert_eq!(encode_table(&table), vec![0x32, 0x54, 0xCD, 0xAB]);
    }

    #[test]
    fn test_record_is_28_bytes() {
        let table = PartitionTable {
            entries: vec![PartitionEntry {
                name: "factory".to_string(),
                kind: PartitionKind::App,
                subtype: SUBTYPE_APP_FACTORY,
                offset: 0x10000,
                size: 0x300000,
            }],
        };
        assert_eq!(encode_table(&table).len(), 4 + RECORD_SIZE);
    }
}

use esp_build_tools::{
    Error,
    PartitionTable,
    PARTITION_TABLE_MAGIC,
    RECORD_SIZE,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

#[test]
fn test_bin_roundtrip_preserves_entries() {
    let table = PartitionTable::from_csv_file("tests/assets/partitions_basic.csv").unwrap();
    let decoded = PartitionTable::from_bin(&table.to_bin()).unwrap();
    assert_eq!(decoded, table);
}

#[test]
fn test_bin_file_roundtrip() {
    let table = PartitionTable::from_csv_file("tests/assets/partitions_basic.csv").unwrap();

    let bin_file = NamedTempFile::new().unwrap();
    table.to_bin_file(bin_file.path()).unwrap();
    let decoded = PartitionTable::from_bin_file(bin_file.path()).unwrap();

    assert_eq!(decoded, table);
}

#[test]
fn test_csv_roundtrip_preserves_entries() {
    let table = PartitionTable::from_csv_file("tests/assets/partitions_basic.csv").unwrap();
    let reparsed = PartitionTable::from_csv(&table.to_csv().unwrap()).unwrap();
    assert_eq!(reparsed, table);
}

#[test]
fn test_csv_roundtrip_keeps_unnamed_subtype_bytes() {
    // 0x99 has no name under data; the writer must fall back to hex and
    // the parser must take it back verbatim
    let table = PartitionTable::from_csv("rawsub,data,0x99,0x20000,0x1000\n").unwrap();
    let reparsed = PartitionTable::from_csv(&table.to_csv().unwrap()).unwrap();
    assert_eq!(reparsed, table);
}

#[test]
fn test_lenient_table_roundtrips_after_normalization() {
    // After the lenient parse resolved defaults and truncation, encode and
    // decode must agree exactly
    let table = PartitionTable::from_csv_file("tests/assets/partitions_messy.csv").unwrap();
    let decoded = PartitionTable::from_bin(&table.to_bin()).unwrap();
    assert_eq!(decoded, table);
}

#[test]
fn test_empty_table_roundtrips() {
    let table = PartitionTable { entries: vec![] };
    let bin = table.to_bin();
    assert_eq!(bin.len(), 4);
    assert_eq!(PartitionTable::from_bin(&bin).unwrap(), table);
}

#[test]
fn test_bad_magic_is_rejected() {
    let mut bin = PartitionTable::from_csv("nvs,data,nvs,0x9000,0x5000\n")
        .unwrap()
        .to_bin();
    bin[0] ^= 0xFF;
    assert!(matches!(
        PartitionTable::from_bin(&bin),
        Err(Error::BadMagic(_))
    ));
}

#[test]
fn test_trailing_partial_record_is_rejected() {
    let mut bin = PARTITION_TABLE_MAGIC.to_le_bytes().to_vec();
    bin.extend_from_slice(&[0u8; RECORD_SIZE - 1]);
    assert!(matches!(
        PartitionTable::from_bin(&bin),
        Err(Error::TruncatedTable(_))
    ));
}

#[test]
fn test_short_input_is_rejected() {
    assert!(matches!(
        PartitionTable::from_bin(&[0x32, 0x54]),
        Err(Error::TruncatedTable(2))
    ));
}

use std::path::Path;

use csv::Writer;

use crate::error::Error;
use crate::PartitionTable;

/// Serialize a partition table to a CSV file at `output_path`.
///
/// Entries are written in their original order. Offsets and sizes render
/// as hex; subtypes render by their per-type name where one is defined and
/// as hex otherwise.
pub(crate) fn write_csv<P: AsRef<Path>>(
    table: &PartitionTable,
    output_path: P,
) -> Result<(), Error> {
    let mut wtr = Writer::from_path(output_path)?;
    write_records(&mut wtr, table)
}

/// Serialize a partition table to CSV and return the content as a `String`.
pub(crate) fn write_csv_content(table: &PartitionTable) -> Result<String, Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    write_records(&mut wtr, table)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_records<W: std::io::Write>(
    wtr: &mut Writer<W>,
    table: &PartitionTable,
) -> Result<(), Error> {
    wtr.write_record(["# Name", "Type", "SubType", "Offset", "Size"])?;

    for entry in &table.entries {
        let subtype = match entry.subtype_name() {
            Some(name) => name.to_string(),
            None => format!("0x{:02x}", entry.subtype),
        };
        let offset = format!("0x{:x}", entry.offset);
        let size = format!("0x{:x}", entry.size);

        wtr.write_record([
            entry.name.as_str(),
            entry.kind.as_str(),
            subtype.as_str(),
            offset.as_str(),
            size.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

//! Build-time helpers for ESP32 firmware projects: partition table
//! generation and inspection, firmware and filesystem size reporting,
//! serial upload-port auto-detection, and web asset staging.
//!
//! Each step is a short, synchronous transform invoked once per build by
//! an external orchestrator. The library holds no state between
//! invocations beyond the on-disk content hash used to skip redundant
//! partition table regeneration.

pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod partition;
pub mod ports;
pub mod report;
pub mod size;

mod csv;

use std::fs;
use std::path::Path;

pub use config::BuildConfig;
pub use error::Error;
pub use partition::{PartitionEntry, PartitionKind, MAX_NAME_LENGTH, PARTITION_TABLE_MAGIC, RECORD_SIZE};

/// An in-memory partition table: the ordered list of entries parsed from
/// the CSV source of truth or decoded from the on-flash binary format.
///
/// Entries keep their file order; the reporting path sorts a copy by
/// offset for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    /// The ordered list of partition entries.
    pub entries: Vec<PartitionEntry>,
}

impl PartitionTable {
    /// Parse partition CSV content from a string.
    ///
    /// Malformed rows are skipped with a logged diagnostic; see the module
    /// documentation for the full leniency rules.
    pub fn from_csv(content: &str) -> Result<Self, Error> {
        csv::parser::parse_csv(content)
    }

    /// Parse a partition CSV file at the given `path`.
    ///
    /// A missing file is a hard error ([`Error::MissingInput`]); malformed
    /// rows inside an existing file are skipped with a logged diagnostic.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        csv::parser::parse_csv(&content)
    }

    /// Serialize this table to CSV and return the content as a `String`.
    pub fn to_csv(&self) -> Result<String, Error> {
        csv::writer::write_csv_content(self)
    }

    /// Serialize this table to a CSV file at the given `path`.
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        csv::writer::write_csv(self, path)
    }

    /// Encode this table into the binary image the bootloader expects.
    pub fn to_bin(&self) -> Vec<u8> {
        partition::encoder::encode_table(self)
    }

    /// Encode this table and write the binary image to `path`.
    ///
    /// The image is fully built in memory before the file is created, so a
    /// failed run never leaves partial output behind.
    pub fn to_bin_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let data = self.to_bin();
        fs::write(path, data)?;
        Ok(())
    }

    /// Decode a partition table binary from an in-memory byte slice.
    pub fn from_bin(data: &[u8]) -> Result<Self, Error> {
        partition::parser::parse_bin_data(data)
    }

    /// Decode a partition table binary file at the given `path`.
    pub fn from_bin_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        partition::parser::parse_bin(path)
    }
}

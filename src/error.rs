use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while parsing partition CSVs, encoding or decoding
/// the partition table binary, or running the auxiliary build steps.
///
/// Per-row CSV problems are not represented here: malformed rows are
/// skipped with a logged diagnostic so a build keeps going. These variants
/// cover the structural failures that stop a build step.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("input file {} doesn't exist", .0.display())]
    MissingInput(PathBuf),

    #[error("bad partition table magic 0x{0:08X} (expected 0xABCD5432)")]
    BadMagic(u32),

    #[error("partition table binary is truncated ({0} bytes is not a whole number of records)")]
    TruncatedTable(usize),

    #[error("unknown partition type byte 0x{0:02X}")]
    UnknownTypeCode(u8),

    #[error("partition name is not valid UTF-8: {0}")]
    InvalidName(#[from] std::str::Utf8Error),

    #[error("failed to run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed { tool: String, status: ExitStatus },
}

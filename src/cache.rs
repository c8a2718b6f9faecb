use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use sha2::{Digest, Sha256};

use crate::error::Error;

/// Content-hash change detection for generated build artifacts.
///
/// The digest of the source file is recorded next to it
/// (`<source>.sha256`); [`ChangeDetector::is_stale`] compares the current
/// source digest against the recorded one so unchanged sources skip
/// regeneration. Record the digest only after the artifact was generated
/// successfully, so a failed run regenerates on the next attempt.
#[derive(Debug)]
pub struct ChangeDetector {
    source: PathBuf,
    stamp: PathBuf,
}

impl ChangeDetector {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        let source = source.into();
        let mut stamp = source.clone().into_os_string();
        stamp.push(".sha256");
        Self {
            source,
            stamp: PathBuf::from(stamp),
        }
    }

    /// Path of the recorded digest file.
    pub fn stamp_path(&self) -> &Path {
        &self.stamp
    }

    /// Whether `artifact` must be regenerated from the source.
    ///
    /// True when the artifact is missing, no digest has been recorded yet,
    /// or the source content changed since the last [`ChangeDetector::record`].
    /// A missing source is a hard error.
    pub fn is_stale<P: AsRef<Path>>(&self, artifact: P) -> Result<bool, Error> {
        if !self.source.exists() {
            return Err(Error::MissingInput(self.source.clone()));
        }
        if !artifact.as_ref().exists() {
            return Ok(true);
        }

        let current = self.digest()?;
        match fs::read_to_string(&self.stamp) {
            Ok(recorded) => Ok(recorded.trim() != current),
            Err(_) => Ok(true),
        }
    }

    /// Record the current source digest.
    pub fn record(&self) -> Result<(), Error> {
        let digest = self.digest()?;
        debug!("recording {} = {digest}", self.stamp.display());
        fs::write(&self.stamp, digest)?;
        Ok(())
    }

    fn digest(&self) -> Result<String, Error> {
        let content = fs::read(&self.source)?;
        Ok(hex::encode(Sha256::digest(&content)))
    }
}

//! Web asset staging for the filesystem image.
//!
//! The device serves its web interface from a LittleFS image built out of
//! the `data/` directory. Human-authored assets live in `static/`; this
//! step copies them into `data/static/` (so URLs like `/static/js/app.js`
//! resolve on the device) and fabricates placeholder source maps for
//! scripts that ship without one, keeping browser dev tools quiet.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::json;

use crate::config::BuildConfig;
use crate::error::Error;

/// Icons the web interface expects at the filesystem root.
const REQUIRED_ICONS: &[&str] = &[
    "favicon.ico",
    "apple-touch-icon.png",
    "apple-touch-icon-precomposed.png",
];

/// Outcome of one asset-staging run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub files_copied: usize,
    pub maps_created: usize,
    /// Required icons absent from the data directory after staging.
    pub missing_icons: Vec<String>,
}

/// Stage web assets from `static/` into the filesystem source tree.
///
/// A missing `static/` directory is a hard error; individual files that
/// can't be copied are skipped with a diagnostic and the run continues.
pub fn stage_static_assets(config: &BuildConfig) -> Result<StageSummary, Error> {
    let static_dir = config.static_dir();
    let data_dir = config.data_dir();

    if !static_dir.is_dir() {
        return Err(Error::MissingInput(static_dir));
    }
    fs::create_dir_all(&data_dir)?;

    let mut summary = StageSummary::default();
    copy_tree(&static_dir, &data_dir.join("static"), &mut summary)?;
    create_missing_source_maps(&data_dir, &mut summary)?;

    for icon in REQUIRED_ICONS {
        if !data_dir.join(icon).exists() {
            warn!("required icon {icon} is missing from {}", data_dir.display());
            summary.missing_icons.push((*icon).to_string());
        }
    }

    Ok(summary)
}

fn copy_tree(source: &Path, target: &Path, summary: &mut StageSummary) -> Result<(), Error> {
    fs::create_dir_all(target)?;

    for entry in fs::read_dir(source)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", source.display());
                continue;
            }
        };

        let path = entry.path();
        let dest = target.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &dest, summary)?;
        } else {
            match fs::copy(&path, &dest) {
                Ok(_) => {
                    debug!("copied {} -> {}", path.display(), dest.display());
                    summary.files_copied += 1;
                }
                Err(err) => warn!("failed to copy {}: {err}", path.display()),
            }
        }
    }

    Ok(())
}

/// Walk `dir` and write a minimal source map next to every `.js` file that
/// lacks one.
fn create_missing_source_maps(dir: &Path, summary: &mut StageSummary) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", dir.display());
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            create_missing_source_maps(&path, summary)?;
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "js") {
            continue;
        }

        let map_path = sibling_map_path(&path);
        if map_path.exists() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let map = json!({
            "version": 3,
            "file": file_name,
            "sources": [],
            "names": [],
            "mappings": "",
        });

        match fs::write(&map_path, map.to_string()) {
            Ok(()) => {
                debug!("created source map placeholder {}", map_path.display());
                summary.maps_created += 1;
            }
            Err(err) => warn!("failed to write {}: {err}", map_path.display()),
        }
    }

    Ok(())
}

/// `app.js` -> `app.js.map`, in the same directory.
fn sibling_map_path(script: &Path) -> PathBuf {
    let mut name = OsString::from(script.as_os_str());
    name.push(".map");
    PathBuf::from(name)
}

//! Firmware and filesystem size reporting.
//!
//! Section sizes come from the toolchain's objdump; the report classifies
//! them into flash and RAM by name prefix, compares flash usage against
//! the factory partition declared in `partitions.csv`, and renders
//! proportional bar charts for quick reading in a build log.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use log::warn;

use crate::config::BuildConfig;
use crate::error::Error;
use crate::partition::{PartitionKind, SUBTYPE_APP_FACTORY, SUBTYPE_DATA_SPIFFS};
use crate::report::format_size;
use crate::PartitionTable;

/// Sections that end up in the flash image.
const FLASH_SECTION_PREFIXES: &[&str] =
    &[".flash", ".iram0.text", ".iram0.vectors", ".dram0.data"];

/// Sections that occupy RAM at runtime.
const RAM_SECTION_PREFIXES: &[&str] = &[".dram0.bss", ".dram0.data", ".iram0.bss"];

/// Linker placeholder sections excluded from the flash total.
const EXCLUDED_SECTIONS: &[&str] = &[".flash_rodata_dummy", ".dram0.dummy"];

const BAR_WIDTH: usize = 50;

/// Sections below this size are noise in the visualization.
const MIN_VIZ_SECTION: u64 = 1000;
const MAX_VIZ_SECTIONS: usize = 15;

/// One ELF section and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub size: u64,
}

/// Firmware size totals classified from the section list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBreakdown {
    pub sections: Vec<Section>,
    /// Sum over all non-debug sections.
    pub total: u64,
    /// Sum over flash sections, excluding linker placeholders.
    pub flash: u64,
    /// Sum over RAM sections.
    pub ram: u64,
}

/// Render the firmware size report for the configured environment.
///
/// A missing firmware ELF is a hard error (build the project first). When
/// objdump can't be run, falls back to the toolchain's `size -A` output;
/// if that also fails the step fails.
pub fn firmware_size_report(config: &BuildConfig) -> Result<String, Error> {
    let elf = config.firmware_elf();
    if !elf.exists() {
        return Err(Error::MissingInput(elf));
    }

    let output = match run_tool(&config.objdump, &["-h"], &elf) {
        Ok(output) => output,
        Err(err) => {
            warn!(
                "{} failed ({err}), falling back to {}",
                config.objdump, config.size_tool
            );
            let raw = run_tool(&config.size_tool, &["-A"], &elf)?;
            return Ok(format!(
                "Firmware size information:\n==========================\n{raw}"
            ));
        }
    };

    let breakdown = classify_sections(parse_objdump_sections(&output));

    let mut out = String::new();
    render_section_table(&mut out, &breakdown);
    render_section_bars(&mut out, &breakdown);
    if let Some(capacity) = factory_capacity(config) {
        render_partition_bars(&mut out, breakdown.flash, capacity);
    }

    Ok(out)
}

/// Summarize the filesystem image source tree and, when available, the
/// built image's utilization of the spiffs partition.
pub fn fs_usage_report(config: &BuildConfig) -> Result<String, Error> {
    let data_dir = config.data_dir();
    if !data_dir.is_dir() {
        return Err(Error::MissingInput(data_dir));
    }

    let mut stats = FsStats::default();
    scan_data_dir(&data_dir, &mut stats);

    let mut out = String::new();
    out.push_str("Filesystem data summary:\n");
    out.push_str("========================\n");
    out.push_str(&format!(
        "Files: {} ({}, {} bytes)\n",
        stats.files,
        format_size(stats.bytes),
        stats.bytes
    ));
    for (ext, (count, bytes)) in &stats.by_extension {
        out.push_str(&format!(
            "  {:<16} {:>4} files  {:>12}\n",
            ext,
            count,
            format_size(*bytes)
        ));
    }

    let image = config.fs_image();
    if image.exists() {
        let image_size = std::fs::metadata(&image)?.len();
        out.push_str(&format!(
            "\nFilesystem image: {} ({} bytes)\n",
            format_size(image_size),
            image_size
        ));
        if let Some(capacity) = spiffs_capacity(config) {
            let percent = image_size as f64 * 100.0 / capacity as f64;
            out.push_str(&format!(
                "SPIFFS partition: {}, image uses {:.1}%\n",
                format_size(capacity),
                percent
            ));
        }
    } else {
        out.push_str("\nFilesystem image not built yet; run the filesystem build first\n");
    }

    Ok(out)
}

/// Parse `objdump -h` output into named section sizes.
///
/// Only lines shaped like a section row (index, name, hex size, addresses)
/// are taken; flag continuation lines and headers fall out of the field
/// count and radix checks. Debug sections are dropped.
pub(crate) fn parse_objdump_sections(output: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 7 {
            continue;
        }
        let name = parts[1];
        if name.starts_with(".debug") {
            continue;
        }
        if let Ok(size) = u64::from_str_radix(parts[2], 16) {
            sections.push(Section {
                name: name.to_string(),
                size,
            });
        }
    }
    sections
}

pub(crate) fn classify_sections(sections: Vec<Section>) -> SizeBreakdown {
    let total = sections.iter().map(|s| s.size).sum();
    let flash = sections
        .iter()
        .filter(|s| is_flash_section(&s.name))
        .map(|s| s.size)
        .sum();
    let ram = sections
        .iter()
        .filter(|s| is_ram_section(&s.name))
        .map(|s| s.size)
        .sum();

    SizeBreakdown {
        sections,
        total,
        flash,
        ram,
    }
}

fn is_flash_section(name: &str) -> bool {
    !EXCLUDED_SECTIONS.contains(&name)
        && FLASH_SECTION_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn is_ram_section(name: &str) -> bool {
    RAM_SECTION_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn run_tool(tool: &str, args: &[&str], elf: &Path) -> Result<String, Error> {
    let output = Command::new(tool)
        .args(args)
        .arg(elf)
        .output()
        .map_err(|source| Error::ToolSpawn {
            tool: tool.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Size of the app/factory partition from the project's CSV, if declared.
fn factory_capacity(config: &BuildConfig) -> Option<u64> {
    partition_capacity(config, PartitionKind::App, SUBTYPE_APP_FACTORY)
}

/// Size of the data/spiffs partition from the project's CSV, if declared.
fn spiffs_capacity(config: &BuildConfig) -> Option<u64> {
    partition_capacity(config, PartitionKind::Data, SUBTYPE_DATA_SPIFFS)
}

fn partition_capacity(config: &BuildConfig, kind: PartitionKind, subtype: u8) -> Option<u64> {
    let table = match PartitionTable::from_csv_file(config.partition_csv()) {
        Ok(table) => table,
        Err(err) => {
            warn!("couldn't read partition info: {err}");
            return None;
        }
    };
    table
        .entries
        .iter()
        .find(|e| e.kind == kind && e.subtype == subtype)
        .map(|e| u64::from(e.size))
}

fn render_section_table(out: &mut String, breakdown: &SizeBreakdown) {
    out.push_str("Firmware section sizes (excluding debug info):\n");
    out.push_str("==============================================\n");
    for section in &breakdown.sections {
        let note = if EXCLUDED_SECTIONS.contains(&section.name.as_str()) {
            " (excluded from flash calculation)"
        } else if is_flash_section(&section.name) {
            " (included in flash calculation)"
        } else if is_ram_section(&section.name) {
            " (included in RAM calculation)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<18}: {:<12} ({} bytes){note}\n",
            section.name,
            format_size(section.size),
            section.size
        ));
    }

    out.push_str(&format!(
        "\nTotal firmware size (all sections): {} ({} bytes)\n",
        format_size(breakdown.total),
        breakdown.total
    ));
    out.push_str(&format!(
        "Flash usage: {} ({} bytes)\n",
        format_size(breakdown.flash),
        breakdown.flash
    ));
    out.push_str(&format!(
        "RAM usage: {} ({} bytes)\n",
        format_size(breakdown.ram),
        breakdown.ram
    ));
}

fn render_section_bars(out: &mut String, breakdown: &SizeBreakdown) {
    let mut viz: Vec<&Section> = breakdown
        .sections
        .iter()
        .filter(|s| s.size >= MIN_VIZ_SECTION && !s.name.starts_with(".xt."))
        .collect();
    if viz.is_empty() || breakdown.total == 0 {
        return;
    }
    viz.sort_by(|a, b| b.size.cmp(&a.size));
    viz.truncate(MAX_VIZ_SECTIONS);

    let name_width = viz.iter().map(|s| s.name.len()).max().unwrap_or(10);

    out.push_str("\nFirmware section visualization:\n");
    out.push_str("===============================\n");
    for section in &viz {
        let percent = section.size as f64 * 100.0 / breakdown.total as f64;
        let width = bar_width(percent);
        out.push_str(&format!(
            "{:<name_width$} [{:<BAR_WIDTH$}] {percent:.1}%\n",
            section.name,
            "\u{2588}".repeat(width)
        ));
    }
}

fn render_partition_bars(out: &mut String, flash: u64, capacity: u64) {
    if capacity == 0 {
        return;
    }
    let used_percent = (flash as f64 * 100.0 / capacity as f64).min(100.0);
    let free = capacity.saturating_sub(flash);
    let free_percent = 100.0 - used_percent;

    out.push_str("\nFirmware vs factory partition:\n");
    out.push_str("==============================\n");
    out.push_str(&format!(
        "{:<10} [{:<BAR_WIDTH$}] {used_percent:.1}% ({})\n",
        "Used",
        "\u{2588}".repeat(bar_width(used_percent)),
        format_size(flash)
    ));
    if free > 0 {
        out.push_str(&format!(
            "{:<10} [{:<BAR_WIDTH$}] {free_percent:.1}% ({})\n",
            "Available",
            "\u{2591}".repeat(bar_width(free_percent)),
            format_size(free)
        ));
    }
}

/// Bar length for a percentage; anything present gets at least one cell.
fn bar_width(percent: f64) -> usize {
    ((BAR_WIDTH as f64 * percent / 100.0) as usize).max(1)
}

#[derive(Debug, Default)]
struct FsStats {
    files: usize,
    bytes: u64,
    /// Extension (with leading dot, lowercase) -> (file count, total bytes).
    by_extension: BTreeMap<String, (usize, u64)>,
}

/// Tally the data directory, skipping hidden files. Unreadable entries are
/// logged and skipped; the summary stays partial-but-valid.
fn scan_data_dir(dir: &Path, stats: &mut FsStats) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("couldn't read {}: {err}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            scan_data_dir(&path, stats);
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                warn!("couldn't stat {}: {err}", path.display());
                continue;
            }
        };

        let ext = match path.extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
            None => "(no extension)".to_string(),
        };

        stats.files += 1;
        stats.bytes += size;
        let slot = stats.by_extension.entry(ext).or_insert((0, 0));
        slot.0 += 1;
        slot.1 += size;
    }
}

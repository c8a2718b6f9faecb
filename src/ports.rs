//! Serial upload-port auto-detection.
//!
//! Best effort only: scans OS-specific device patterns and picks the most
//! likely candidate. Finding nothing is not an error; the operator is told
//! and chooses a port manually.

use log::{debug, info};

/// Device patterns that usually belong to an ESP32-class board, ordered by
/// likelihood. The first pattern with a match wins.
#[cfg(target_os = "macos")]
const PORT_PATTERNS: &[&str] = &[
    "/dev/cu.usbmodem*",
    "/dev/cu.wchusbserial*",
    "/dev/cu.usbserial-*",
    "/dev/cu.SLAB_USBtoUART*",
];

#[cfg(target_os = "linux")]
const PORT_PATTERNS: &[&str] = &["/dev/ttyACM*", "/dev/ttyUSB*"];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const PORT_PATTERNS: &[&str] = &[];

/// Find the serial port a connected device is most likely attached to.
///
/// Returns the highest-priority candidate, or `None` when nothing matches.
/// When several candidates exist the full list is logged and the first one
/// is returned.
pub fn detect_upload_port() -> Option<String> {
    let candidates = candidate_ports();
    match candidates.as_slice() {
        [] => {
            debug!("no serial port candidates found");
            None
        }
        [port] => Some(port.clone()),
        ports => {
            info!("multiple serial ports found: {}", ports.join(", "));
            Some(ports[0].clone())
        }
    }
}

/// List every serial device present, for operator diagnostics. Broader
/// than [`detect_upload_port`]: includes devices that don't look like an
/// ESP32 board.
pub fn list_serial_ports() -> Vec<String> {
    #[cfg(target_os = "macos")]
    {
        glob_all(&["/dev/cu.*"])
    }
    #[cfg(target_os = "linux")]
    {
        glob_all(&["/dev/ttyUSB*", "/dev/ttyACM*"])
    }
    #[cfg(target_os = "windows")]
    {
        candidate_ports()
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Vec::new()
    }
}

#[cfg(not(target_os = "windows"))]
fn candidate_ports() -> Vec<String> {
    glob_all(PORT_PATTERNS)
}

/// Probe `COM1..=COM256` through the device namespace; only ports that
/// actually exist are returned.
#[cfg(target_os = "windows")]
fn candidate_ports() -> Vec<String> {
    (1..=256u16)
        .map(|i| format!("COM{i}"))
        .filter(|port| std::fs::metadata(format!(r"\\.\{port}")).is_ok())
        .collect()
}

#[cfg(not(target_os = "windows"))]
fn glob_all(patterns: &[&str]) -> Vec<String> {
    let mut ports = Vec::new();
    for pattern in patterns {
        if let Ok(paths) = glob::glob(pattern) {
            ports.extend(paths.flatten().map(|p| p.to_string_lossy().to_string()));
        }
    }
    ports
}

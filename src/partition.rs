pub(crate) mod consts;
pub(crate) mod encoder;
pub(crate) mod parser;

pub use consts::{
    MAX_NAME_LENGTH,
    NAME_FIELD_SIZE,
    PARTITION_TABLE_MAGIC,
    RECORD_SIZE,
    SUBTYPE_APP_FACTORY,
    SUBTYPE_APP_OTA_0,
    SUBTYPE_APP_OTA_1,
    SUBTYPE_DATA_NVS,
    SUBTYPE_DATA_OTA,
    SUBTYPE_DATA_PHY,
    SUBTYPE_DATA_SPIFFS,
    TYPE_APP,
    TYPE_DATA,
};

/// The partition type category, the first of the two enumerated bytes in a
/// binary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// Application image (factory or OTA slot).
    App,
    /// Data region (NVS, PHY init, OTA state, filesystem).
    Data,
}

impl PartitionKind {
    /// The type byte written to the binary table.
    pub fn code(self) -> u8 {
        match self {
            Self::App => TYPE_APP,
            Self::Data => TYPE_DATA,
        }
    }

    /// Decode a type byte read from a binary table.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            TYPE_APP => Some(Self::App),
            TYPE_DATA => Some(Self::Data),
            _ => None,
        }
    }

    /// The CSV column spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Data => "data",
        }
    }

    /// Human-readable name for reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::App => "Application",
            Self::Data => "Data",
        }
    }

    /// Resolve CSV type text, case-insensitively. `None` for unrecognized
    /// text; the caller decides whether to default or skip.
    pub(crate) fn resolve(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "app" => Some(Self::App),
            "data" => Some(Self::Data),
            _ => None,
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the partition table.
///
/// Entries are immutable once constructed; the whole table is rebuilt from
/// the CSV source whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    /// Region label, at most 15 bytes when UTF-8 encoded.
    pub name: String,
    /// Type category.
    pub kind: PartitionKind,
    /// Resolved subtype byte. Meaning depends on `kind`; see the
    /// `SUBTYPE_*` constants.
    pub subtype: u8,
    /// Byte offset into the flash address space.
    pub offset: u32,
    /// Region length in bytes.
    pub size: u32,
}

impl PartitionEntry {
    /// End of the region, `offset + size`, without overflow.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// The CSV spelling of this entry's subtype, when one is defined for
    /// its type category.
    pub fn subtype_name(&self) -> Option<&'static str> {
        subtype_name(self.kind, self.subtype)
    }

    /// Human-readable subtype for reports, falling back to hex for bytes
    /// without a defined name.
    pub fn subtype_label(&self) -> String {
        match subtype_description(self.kind, self.subtype) {
            Some(label) => label.to_string(),
            None => format!("0x{:02x}", self.subtype),
        }
    }
}

/// Resolve a subtype name to its byte value, namespaced by partition type.
///
/// Subtype names only have meaning within their type category, so `ota`
/// under `data` and a hypothetical `ota` under `app` are distinct lookups.
pub(crate) fn resolve_subtype(kind: PartitionKind, text: &str) -> Option<u8> {
    match (kind, text.to_ascii_lowercase().as_str()) {
        (PartitionKind::App, "factory") => Some(SUBTYPE_APP_FACTORY),
        (PartitionKind::App, "ota_0") => Some(SUBTYPE_APP_OTA_0),
        (PartitionKind::App, "ota_1") => Some(SUBTYPE_APP_OTA_1),
        (PartitionKind::Data, "nvs") => Some(SUBTYPE_DATA_NVS),
        (PartitionKind::Data, "phy") => Some(SUBTYPE_DATA_PHY),
        (PartitionKind::Data, "ota") => Some(SUBTYPE_DATA_OTA),
        (PartitionKind::Data, "spiffs") => Some(SUBTYPE_DATA_SPIFFS),
        _ => None,
    }
}

/// Reverse of [`resolve_subtype`]: the CSV spelling for a subtype byte.
pub(crate) fn subtype_name(kind: PartitionKind, code: u8) -> Option<&'static str> {
    match (kind, code) {
        (PartitionKind::App, SUBTYPE_APP_FACTORY) => Some("factory"),
        (PartitionKind::App, SUBTYPE_APP_OTA_0) => Some("ota_0"),
        (PartitionKind::App, SUBTYPE_APP_OTA_1) => Some("ota_1"),
        (PartitionKind::Data, SUBTYPE_DATA_NVS) => Some("nvs"),
        (PartitionKind::Data, SUBTYPE_DATA_PHY) => Some("phy"),
        (PartitionKind::Data, SUBTYPE_DATA_OTA) => Some("ota"),
        (PartitionKind::Data, SUBTYPE_DATA_SPIFFS) => Some("spiffs"),
        _ => None,
    }
}

/// Human-readable subtype description for report output.
pub(crate) fn subtype_description(kind: PartitionKind, code: u8) -> Option<&'static str> {
    match (kind, code) {
        (PartitionKind::App, SUBTYPE_APP_FACTORY) => Some("Factory App"),
        (PartitionKind::App, SUBTYPE_APP_OTA_0) => Some("OTA Slot 0"),
        (PartitionKind::App, SUBTYPE_APP_OTA_1) => Some("OTA Slot 1"),
        (PartitionKind::Data, SUBTYPE_DATA_NVS) => Some("Non-volatile Storage"),
        (PartitionKind::Data, SUBTYPE_DATA_PHY) => Some("PHY Init Data"),
        (PartitionKind::Data, SUBTYPE_DATA_OTA) => Some("OTA Data"),
        (PartitionKind::Data, SUBTYPE_DATA_SPIFFS) => Some("SPIFFS/LittleFS"),
        _ => None,
    }
}

/// Truncate a name to [`MAX_NAME_LENGTH`] bytes on a character boundary, so
/// the encoded 16-byte field always keeps a terminating NUL.
pub(crate) fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LENGTH {
        return name;
    }
    let mut end = MAX_NAME_LENGTH;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("nvs"), "nvs");
        assert_eq!(truncate_name("exactly15bytes!"), "exactly15bytes!");
        assert_eq!(truncate_name("sixteen_bytes_xx"), "sixteen_bytes_x");
        // 7 × 'é' is 14 bytes; truncation must not split the 8th character
        assert_eq!(truncate_name("éééééééé"), "ééééééé");
    }

    #[test]
    fn test_subtype_tables_are_inverses() {
        for kind in [PartitionKind::App, PartitionKind::Data] {
            for code in 0..=u8::MAX {
                if let Some(name) = subtype_name(kind, code) {
                    assert_eq!(resolve_subtype(kind, name), Some(code));
                }
            }
        }
    }

    #[test]
    fn test_subtype_is_namespaced_by_kind() {
        assert_eq!(resolve_subtype(PartitionKind::Data, "ota"), Some(SUBTYPE_DATA_OTA));
        assert_eq!(resolve_subtype(PartitionKind::App, "ota"), None);
        assert_eq!(resolve_subtype(PartitionKind::App, "nvs"), None);
    }
}

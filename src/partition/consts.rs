// On-flash partition table layout
pub const PARTITION_TABLE_MAGIC: u32 = 0xABCD_5432;
pub const NAME_FIELD_SIZE: usize = 16;
pub const RECORD_SIZE: usize = 28;

/// Maximum name length is 15 bytes: the 16-byte field keeps at least one
/// terminating NUL.
pub const MAX_NAME_LENGTH: usize = 15;

// Partition type bytes
pub const TYPE_APP: u8 = 0x00;
pub const TYPE_DATA: u8 = 0x01;

// Application subtypes
pub const SUBTYPE_APP_FACTORY: u8 = 0x00;
pub const SUBTYPE_APP_OTA_0: u8 = 0x10;
pub const SUBTYPE_APP_OTA_1: u8 = 0x11;

// Data subtypes. The values match the tables already flashed to devices
// in the field, so they must not be renumbered.
pub const SUBTYPE_DATA_NVS: u8 = 0x01;
pub const SUBTYPE_DATA_PHY: u8 = 0x02;
pub const SUBTYPE_DATA_OTA: u8 = 0x20;
pub const SUBTYPE_DATA_SPIFFS: u8 = 0x82;

//! ZTEX protocol constants
//!
//! Request codes and record layouts of the ZTEX EZ-USB/FX3 default firmware.
//! All requests used here are vendor-type, device-recipient control-IN
//! transfers. Multi-byte fields are little-endian.

/// ZTEX USB vendor ID
pub const ZTEX_USB_VENDOR: u16 = 0x221A;
/// Product ID shared by all ZTEX firmware-driven modules
pub const ZTEX_USB_PRODUCT: u16 = 0x0100;

/// Interface claimed for vendor requests
pub const ZTEX_INTERFACE: u8 = 0;

/// Control transfer timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

// Vendor requests
/// Read the ZTEX descriptor
pub const VR_DESCRIPTOR: u8 = 0x22;
/// Read the FPGA configuration state
pub const VR_FPGA_STATUS: u8 = 0x30;
/// Read the MAC EEPROM (`wValue` = start address)
pub const VR_MAC_EEPROM_READ: u8 = 0x3B;
/// Read the flash state
pub const VR_FLASH_STATUS: u8 = 0x40;

// ZTEX descriptor
/// Size of a version 1 ZTEX descriptor
pub const DESCRIPTOR_LEN: usize = 40;
/// Number of bytes requested when reading the descriptor
///
/// The size byte can declare up to 255 bytes, so that is what is asked for.
pub const DESCRIPTOR_REQUEST_LEN: usize = u8::MAX as usize;
/// Descriptor magic
pub const DESCRIPTOR_MAGIC: [u8; 4] = *b"ZTEX";

/// Descriptor field offsets
pub mod descriptor_offset {
    /// Descriptor size
    pub const SIZE: usize = 0;
    /// Descriptor version
    pub const VERSION: usize = 1;
    /// Magic (4 bytes)
    pub const MAGIC: usize = 2;
    /// Product ID (4 bytes)
    pub const PRODUCT: usize = 6;
    /// Firmware version
    pub const FIRMWARE: usize = 10;
    /// Interface version
    pub const INTERFACE: usize = 11;
    /// Interface capabilities (6 bytes)
    pub const CAPABILITIES: usize = 12;
    /// Module reserved (12 bytes)
    pub const MODULE: usize = 18;
    /// Serial number string (10 bytes)
    pub const SERIAL: usize = 30;
}

/// Length of the capability field in bytes
pub const CAPABILITIES_LEN: usize = 6;
/// Length of the module-reserved field in bytes
pub const MODULE_LEN: usize = 12;
/// Length of the serial number fields in bytes
pub const SERIAL_LEN: usize = 10;

// Board configuration block (start of the MAC EEPROM)
/// EEPROM address of the configuration block
pub const CONFIG_ADDRESS: u16 = 0;
/// Size of the configuration block
pub const CONFIG_LEN: usize = 32;
/// Configuration block signature
pub const CONFIG_SIGNATURE: [u8; 3] = *b"CD0";
/// Bitstream parameters are counted in sectors of this size
pub const BITSTREAM_SECTOR_SIZE: u32 = 4096;

// Status records
/// Size of the FPGA status response
pub const FPGA_STATUS_LEN: usize = 9;
/// Size of the flash status response
pub const FLASH_STATUS_LEN: usize = 8;

/// Read a little-endian u16 at `offset`
#[inline]
pub(crate) fn le_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Read a little-endian u32 at `offset`
#[inline]
pub(crate) fn le_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Decode a NUL padded ASCII field
pub(crate) fn ascii_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).to_string()
}

//! ZTEX descriptor decoding
//!
//! The descriptor is returned by vendor request `0x22`. Its first byte is
//! the record size, so the decoder can tell a short read from a complete
//! record before touching any other field.
//!
//! Layout (version 1, 40 bytes, little-endian):
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0  | 1  | size |
//! | 1  | 1  | version |
//! | 2  | 4  | magic `"ZTEX"` |
//! | 6  | 4  | product ID |
//! | 10 | 1  | firmware version |
//! | 11 | 1  | interface version |
//! | 12 | 6  | capabilities |
//! | 18 | 12 | module reserved |
//! | 30 | 10 | serial number |

use std::fmt;

use crate::capability::Capabilities;
use crate::error::{Error, Result};
use crate::protocol::{
    ascii_field, descriptor_offset as off, CAPABILITIES_LEN, DESCRIPTOR_LEN, DESCRIPTOR_MAGIC,
    MODULE_LEN, SERIAL_LEN,
};

/// Descriptor version this decoder was written against
const DESCRIPTOR_VERSION: u8 = 1;

/// ZTEX product ID
///
/// Four bytes: vendor/product line, product, and two firmware specific bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProductId(pub [u8; 4]);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Decoded ZTEX descriptor
///
/// Read once when the device is opened. Describes hardware identity and
/// capability, never runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Declared descriptor size in bytes
    pub size: u8,
    /// Descriptor format version
    pub version: u8,
    /// Magic bytes, always `"ZTEX"` for a decoded descriptor
    pub magic: [u8; 4],
    /// Product ID
    pub product: ProductId,
    /// Firmware version
    pub firmware_version: u8,
    /// Interface version
    pub interface_version: u8,
    /// Capability bitmask
    pub capabilities: Capabilities,
    /// Module reserved bytes
    pub module: [u8; MODULE_LEN],
    /// Serial number string
    pub serial: String,
}

impl Descriptor {
    /// Decode a descriptor from the raw control transfer response
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let Some(&size) = buf.first() else {
            return Err(Error::TruncatedDescriptor {
                expected: DESCRIPTOR_LEN,
                received: 0,
            });
        };

        let declared = size as usize;
        let expected = declared.max(DESCRIPTOR_LEN);
        if buf.len() < expected {
            return Err(Error::TruncatedDescriptor {
                expected,
                received: buf.len(),
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[off::MAGIC..off::MAGIC + 4]);
        if magic != DESCRIPTOR_MAGIC {
            return Err(Error::UnrecognizedDevice { magic });
        }

        let version = buf[off::VERSION];
        if version != DESCRIPTOR_VERSION {
            log::warn!(
                "ZTEX descriptor version {} (expected {}), decoding version {} fields only",
                version,
                DESCRIPTOR_VERSION,
                DESCRIPTOR_VERSION
            );
        }
        if declared != DESCRIPTOR_LEN {
            log::debug!("ZTEX descriptor declares {} bytes", declared);
        }

        let mut product = [0u8; 4];
        product.copy_from_slice(&buf[off::PRODUCT..off::PRODUCT + 4]);

        let mut caps = [0u8; CAPABILITIES_LEN];
        caps.copy_from_slice(&buf[off::CAPABILITIES..off::CAPABILITIES + CAPABILITIES_LEN]);

        let mut module = [0u8; MODULE_LEN];
        module.copy_from_slice(&buf[off::MODULE..off::MODULE + MODULE_LEN]);

        Ok(Self {
            size,
            version,
            magic,
            product: ProductId(product),
            firmware_version: buf[off::FIRMWARE],
            interface_version: buf[off::INTERFACE],
            capabilities: Capabilities::from_bytes(&caps),
            module,
            serial: ascii_field(&buf[off::SERIAL..off::SERIAL + SERIAL_LEN]),
        })
    }

    /// Magic as text
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic).to_string()
    }

    /// Encode into the version 1 wire layout
    ///
    /// Serial numbers longer than the field are cut off.
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_LEN] {
        let mut buf = [0u8; DESCRIPTOR_LEN];
        buf[off::SIZE] = self.size;
        buf[off::VERSION] = self.version;
        buf[off::MAGIC..off::MAGIC + 4].copy_from_slice(&self.magic);
        buf[off::PRODUCT..off::PRODUCT + 4].copy_from_slice(&self.product.0);
        buf[off::FIRMWARE] = self.firmware_version;
        buf[off::INTERFACE] = self.interface_version;
        buf[off::CAPABILITIES..off::CAPABILITIES + CAPABILITIES_LEN]
            .copy_from_slice(&self.capabilities.to_bytes());
        buf[off::MODULE..off::MODULE + MODULE_LEN].copy_from_slice(&self.module);
        let serial = self.serial.as_bytes();
        let len = serial.len().min(SERIAL_LEN);
        buf[off::SERIAL..off::SERIAL + len].copy_from_slice(&serial[..len]);
        buf
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            size: DESCRIPTOR_LEN as u8,
            version: DESCRIPTOR_VERSION,
            magic: DESCRIPTOR_MAGIC,
            product: ProductId::default(),
            firmware_version: 0,
            interface_version: 0,
            capabilities: Capabilities::empty(),
            module: [0; MODULE_LEN],
            serial: String::new(),
        }
    }
}

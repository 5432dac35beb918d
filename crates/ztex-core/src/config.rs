//! Board configuration block
//!
//! Boards with a MAC EEPROM keep a 32-byte configuration block at EEPROM
//! address 0 describing the board, its FPGA, RAM, and where the bitstream is
//! stored in flash. The block starts with the signature `"CD0"`; EEPROMs
//! without it carry no configuration data.

use crate::error::{Error, Result};
use crate::protocol::{
    ascii_field, le_u16, BITSTREAM_SECTOR_SIZE, CONFIG_LEN, CONFIG_SIGNATURE, SERIAL_LEN,
};

mod offset {
    pub const SIGNATURE: usize = 0;
    pub const BOARD_TYPE: usize = 3;
    pub const BOARD_SERIES: usize = 4;
    pub const BOARD_NUMBER: usize = 5;
    pub const BOARD_VARIANT: usize = 6;
    pub const FPGA_TYPE: usize = 7;
    pub const FPGA_PACKAGE: usize = 9;
    pub const FPGA_GRADE: usize = 10;
    pub const RAM_SIZE: usize = 14;
    pub const RAM_TYPE: usize = 15;
    pub const SERIAL: usize = 16;
    pub const BITSTREAM_SIZE: usize = 26;
    pub const BITSTREAM_CAPACITY: usize = 28;
    pub const BITSTREAM_START: usize = 30;
}

/// Length of the FPGA speed grade field
const FPGA_GRADE_LEN: usize = 3;

/// Board type code of ZTEX FPGA modules
pub const BOARD_TYPE_FPGA_MODULE: u8 = 1;

/// Decoded board configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigData {
    /// Board type code
    pub board_type: u8,
    /// Board series (major version)
    pub board_series: u8,
    /// Board number (minor version)
    pub board_number: u8,
    /// Board variant letter, if any
    pub board_variant: Option<char>,
    /// FPGA type code
    pub fpga_type: u16,
    /// FPGA package code
    pub fpga_package: u8,
    /// FPGA speed grade
    pub fpga_grade: String,
    /// Raw RAM size byte (mantissa in the high nibble, exponent in the low nibble)
    pub ram_size_code: u8,
    /// RAM type code
    pub ram_type: u8,
    /// Serial number stored with the configuration
    pub serial: String,
    /// Bitstream size in 4 KiB sectors
    pub bitstream_size: u16,
    /// Bitstream capacity in 4 KiB sectors
    pub bitstream_capacity: u16,
    /// Bitstream start in 4 KiB sectors
    pub bitstream_start: u16,
}

impl ConfigData {
    /// Decode the configuration block
    ///
    /// Returns `Ok(None)` when the signature is absent.
    pub fn parse(buf: &[u8]) -> Result<Option<Self>> {
        if buf.len() < CONFIG_LEN {
            return Err(Error::TruncatedConfig {
                expected: CONFIG_LEN,
                received: buf.len(),
            });
        }

        if buf[offset::SIGNATURE..offset::SIGNATURE + 3] != CONFIG_SIGNATURE {
            log::debug!(
                "No configuration data signature (found {:02X?})",
                &buf[offset::SIGNATURE..offset::SIGNATURE + 3]
            );
            return Ok(None);
        }

        let variant = buf[offset::BOARD_VARIANT];

        Ok(Some(Self {
            board_type: buf[offset::BOARD_TYPE],
            board_series: buf[offset::BOARD_SERIES],
            board_number: buf[offset::BOARD_NUMBER],
            board_variant: variant.is_ascii_alphabetic().then_some(variant as char),
            fpga_type: le_u16(buf, offset::FPGA_TYPE),
            fpga_package: buf[offset::FPGA_PACKAGE],
            fpga_grade: ascii_field(&buf[offset::FPGA_GRADE..offset::FPGA_GRADE + FPGA_GRADE_LEN]),
            ram_size_code: buf[offset::RAM_SIZE],
            ram_type: buf[offset::RAM_TYPE],
            serial: ascii_field(&buf[offset::SERIAL..offset::SERIAL + SERIAL_LEN]),
            bitstream_size: le_u16(buf, offset::BITSTREAM_SIZE),
            bitstream_capacity: le_u16(buf, offset::BITSTREAM_CAPACITY),
            bitstream_start: le_u16(buf, offset::BITSTREAM_START),
        }))
    }

    /// Encode into the EEPROM layout
    pub fn to_bytes(&self) -> [u8; CONFIG_LEN] {
        let mut buf = [0u8; CONFIG_LEN];
        buf[offset::SIGNATURE..offset::SIGNATURE + 3].copy_from_slice(&CONFIG_SIGNATURE);
        buf[offset::BOARD_TYPE] = self.board_type;
        buf[offset::BOARD_SERIES] = self.board_series;
        buf[offset::BOARD_NUMBER] = self.board_number;
        buf[offset::BOARD_VARIANT] = self.board_variant.map_or(0, |c| c as u8);
        buf[offset::FPGA_TYPE..offset::FPGA_TYPE + 2].copy_from_slice(&self.fpga_type.to_le_bytes());
        buf[offset::FPGA_PACKAGE] = self.fpga_package;
        put_ascii(&mut buf[offset::FPGA_GRADE..offset::FPGA_GRADE + FPGA_GRADE_LEN], &self.fpga_grade);
        buf[offset::RAM_SIZE] = self.ram_size_code;
        buf[offset::RAM_TYPE] = self.ram_type;
        put_ascii(&mut buf[offset::SERIAL..offset::SERIAL + SERIAL_LEN], &self.serial);
        buf[offset::BITSTREAM_SIZE..offset::BITSTREAM_SIZE + 2]
            .copy_from_slice(&self.bitstream_size.to_le_bytes());
        buf[offset::BITSTREAM_CAPACITY..offset::BITSTREAM_CAPACITY + 2]
            .copy_from_slice(&self.bitstream_capacity.to_le_bytes());
        buf[offset::BITSTREAM_START..offset::BITSTREAM_START + 2]
            .copy_from_slice(&self.bitstream_start.to_le_bytes());
        buf
    }

    /// Board type name, if the code is known
    pub fn board_type_name(&self) -> Option<&'static str> {
        match self.board_type {
            BOARD_TYPE_FPGA_MODULE => Some("ZTEX FPGA Module"),
            _ => None,
        }
    }

    /// Board version, e.g. `2.14b`
    pub fn board_version(&self) -> String {
        match self.board_variant {
            Some(v) => format!("{}.{:02}{}", self.board_series, self.board_number, v),
            None => format!("{}.{:02}", self.board_series, self.board_number),
        }
    }

    /// RAM size in bytes
    pub fn ram_size(&self) -> u64 {
        let mantissa = (self.ram_size_code >> 4) as u64;
        let exponent = (self.ram_size_code & 0x0F) as u32;
        mantissa << (exponent + 16)
    }

    /// RAM type name, if the code is known
    pub fn ram_type_name(&self) -> Option<&'static str> {
        match self.ram_type {
            0 => Some("none"),
            1 => Some("DDR-200 SDRAM"),
            2 => Some("DDR-266 SDRAM"),
            3 => Some("DDR-333 SDRAM"),
            4 => Some("DDR-400 SDRAM"),
            5 => Some("DDR2-400 SDRAM"),
            6 => Some("DDR2-533 SDRAM"),
            7 => Some("DDR2-667 SDRAM"),
            8 => Some("DDR2-800 SDRAM"),
            9 => Some("DDR2-1066 SDRAM"),
            _ => None,
        }
    }

    /// Bitstream start offset in bytes
    pub fn bitstream_start_bytes(&self) -> u32 {
        self.bitstream_start as u32 * BITSTREAM_SECTOR_SIZE
    }

    /// Bitstream capacity in bytes
    pub fn bitstream_capacity_bytes(&self) -> u32 {
        self.bitstream_capacity as u32 * BITSTREAM_SECTOR_SIZE
    }

    /// Stored bitstream size in bytes
    pub fn bitstream_size_bytes(&self) -> u32 {
        self.bitstream_size as u32 * BITSTREAM_SECTOR_SIZE
    }
}

fn put_ascii(field: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    let len = bytes.len().min(field.len());
    field[..len].copy_from_slice(&bytes[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigData {
        ConfigData {
            board_type: BOARD_TYPE_FPGA_MODULE,
            board_series: 2,
            board_number: 14,
            board_variant: Some('b'),
            fpga_type: 0x0124,
            fpga_package: 3,
            fpga_grade: "2C".to_string(),
            ram_size_code: 0x42,
            ram_type: 8,
            serial: "04A32F17BC".to_string(),
            bitstream_size: 0x00A0,
            bitstream_capacity: 0x0100,
            bitstream_start: 0x0000,
        }
    }

    #[test]
    fn test_parse_encoded_block() {
        let config = sample();
        let parsed = ConfigData::parse(&config.to_bytes()).unwrap().unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.board_type_name(), Some("ZTEX FPGA Module"));
        assert_eq!(parsed.board_version(), "2.14b");
        assert_eq!(parsed.ram_type_name(), Some("DDR2-800 SDRAM"));
    }

    #[test]
    fn test_ram_size() {
        let mut config = sample();
        // 4 << (2 + 16) = 1 MiB
        assert_eq!(config.ram_size(), 1024 * 1024);
        config.ram_size_code = 0x1F;
        assert_eq!(config.ram_size(), 1u64 << 31);
        config.ram_size_code = 0;
        assert_eq!(config.ram_size(), 0);
    }

    #[test]
    fn test_bitstream_bytes() {
        let config = sample();
        assert_eq!(config.bitstream_size_bytes(), 0xA0 * 4096);
        assert_eq!(config.bitstream_capacity_bytes(), 1024 * 1024);
        assert_eq!(config.bitstream_start_bytes(), 0);
    }

    #[test]
    fn test_missing_signature() {
        assert_eq!(ConfigData::parse(&[0xFF; CONFIG_LEN]).unwrap(), None);
        assert_eq!(ConfigData::parse(&[0x00; CONFIG_LEN]).unwrap(), None);
    }

    #[test]
    fn test_short_block() {
        let bytes = sample().to_bytes();
        assert!(matches!(
            ConfigData::parse(&bytes[..CONFIG_LEN - 1]),
            Err(Error::TruncatedConfig { expected: CONFIG_LEN, received }) if received == CONFIG_LEN - 1
        ));
    }

    #[test]
    fn test_no_variant() {
        let mut config = sample();
        config.board_variant = None;
        let parsed = ConfigData::parse(&config.to_bytes()).unwrap().unwrap();
        assert_eq!(parsed.board_variant, None);
        assert_eq!(parsed.board_version(), "2.14");
    }
}

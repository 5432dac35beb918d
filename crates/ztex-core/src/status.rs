//! FPGA and flash status records
//!
//! Both records are fixed-layout responses to a single vendor request and
//! describe runtime state, so they are fetched fresh on every query.

use crate::error::{Error, Result, StatusQuery};
use crate::protocol::{le_u16, le_u32, FLASH_STATUS_LEN, FPGA_STATUS_LEN};

/// FPGA configuration status (vendor request `0x30`)
///
/// | offset | size | field |
/// |--------|------|-------|
/// | 0 | 1 | 0 = configured |
/// | 1 | 1 | checksum |
/// | 2 | 4 | bytes transferred |
/// | 6 | 1 | INIT_B state |
/// | 7 | 1 | result code |
/// | 8 | 1 | bit order swapped |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FpgaStatus {
    /// A bitstream is loaded
    pub configured: bool,
    /// Checksum of the transferred bitstream, only meaningful when configured
    pub checksum: u8,
    /// Bytes transferred during the last configuration attempt
    pub transferred: u32,
    /// INIT_B pin state
    pub init: u8,
    /// Result code of the last configuration attempt
    pub result: u8,
    /// Bitstream bit order was swapped
    pub swapped: bool,
}

impl FpgaStatus {
    /// Decode the status response
    pub fn parse(buf: &[u8]) -> Result<Self> {
        check_len(StatusQuery::Fpga, buf, FPGA_STATUS_LEN)?;

        Ok(Self {
            configured: buf[0] == 0,
            checksum: buf[1],
            transferred: le_u32(buf, 2),
            init: buf[6],
            result: buf[7],
            swapped: buf[8] != 0,
        })
    }

    /// Encode into the response layout
    pub fn to_bytes(&self) -> [u8; FPGA_STATUS_LEN] {
        let mut buf = [0u8; FPGA_STATUS_LEN];
        buf[0] = if self.configured { 0 } else { 1 };
        buf[1] = self.checksum;
        buf[2..6].copy_from_slice(&self.transferred.to_le_bytes());
        buf[6] = self.init;
        buf[7] = self.result;
        buf[8] = self.swapped as u8;
        buf
    }
}

/// Flash status (vendor request `0x40`)
///
/// | offset | size | field |
/// |--------|------|-------|
/// | 0 | 1 | enabled |
/// | 1 | 2 | sector size field |
/// | 3 | 4 | sector count |
/// | 7 | 1 | error code |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlashStatus {
    /// Flash memory present and accessible
    pub enabled: bool,
    /// Raw sector size field
    ///
    /// With bit 15 set the size is `1 << (sector & 0x7fff)` bytes,
    /// otherwise the value is the size in bytes.
    pub sector: u16,
    /// Number of sectors
    pub count: u32,
    /// Error code of the last flash operation, 0 on success
    pub error: u8,
}

impl FlashStatus {
    /// Decode the status response
    pub fn parse(buf: &[u8]) -> Result<Self> {
        check_len(StatusQuery::Flash, buf, FLASH_STATUS_LEN)?;

        Ok(Self {
            enabled: buf[0] != 0,
            sector: le_u16(buf, 1),
            count: le_u32(buf, 3),
            error: buf[7],
        })
    }

    /// Encode into the response layout
    pub fn to_bytes(&self) -> [u8; FLASH_STATUS_LEN] {
        let mut buf = [0u8; FLASH_STATUS_LEN];
        buf[0] = self.enabled as u8;
        buf[1..3].copy_from_slice(&self.sector.to_le_bytes());
        buf[3..7].copy_from_slice(&self.count.to_le_bytes());
        buf[7] = self.error;
        buf
    }

    /// Sector size in bytes, `None` if the encoded exponent does not fit
    pub fn sector_size(&self) -> Option<u32> {
        if self.sector & 0x8000 != 0 {
            1u32.checked_shl((self.sector & 0x7FFF) as u32)
        } else {
            Some(self.sector as u32)
        }
    }

    /// Total flash size in bytes
    pub fn size(&self) -> Option<u64> {
        self.sector_size()
            .map(|sector| sector as u64 * self.count as u64)
    }

    /// The last flash operation reported an error
    pub fn has_error(&self) -> bool {
        self.error != 0
    }
}

fn check_len(query: StatusQuery, buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(Error::TruncatedStatus {
            query,
            expected,
            received: buf.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fpga_configured() {
        let buf = [0x00, 0x5A, 0x5C, 0x3A, 0x15, 0x00, 0x01, 0x00, 0x01];
        let status = FpgaStatus::parse(&buf).unwrap();
        assert!(status.configured);
        assert_eq!(status.checksum, 0x5A);
        assert_eq!(status.transferred, 0x0015_3A5C);
        assert_eq!(status.init, 1);
        assert_eq!(status.result, 0);
        assert!(status.swapped);
    }

    #[test]
    fn test_fpga_unconfigured_keeps_fields() {
        let buf = [0x01, 0x33, 0x10, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00];
        let status = FpgaStatus::parse(&buf).unwrap();
        assert!(!status.configured);
        assert_eq!(status.checksum, 0x33);
        assert_eq!(status.transferred, 16);
        assert_eq!(status.result, 4);
        assert!(!status.swapped);
        assert_eq!(status.to_bytes(), buf);
    }

    #[test]
    fn test_fpga_short_response() {
        let err = FpgaStatus::parse(&[0; 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStatus {
                query: StatusQuery::Fpga,
                expected: 9,
                received: 8
            }
        ));
        assert!(err.is_status_query_failure());
    }

    #[test]
    fn test_fpga_longer_response_accepted() {
        let mut buf = FpgaStatus::default().to_bytes().to_vec();
        buf.push(0xEE);
        assert_eq!(FpgaStatus::parse(&buf).unwrap(), FpgaStatus::default());
    }

    #[test]
    fn test_flash_status() {
        // 64 KiB sectors given as exponent, 256 sectors
        let buf = [0x01, 0x10, 0x80, 0x00, 0x01, 0x00, 0x00, 0x00];
        let status = FlashStatus::parse(&buf).unwrap();
        assert!(status.enabled);
        assert_eq!(status.sector, 0x8010);
        assert_eq!(status.sector_size(), Some(65536));
        assert_eq!(status.count, 256);
        assert_eq!(status.size(), Some(16 * 1024 * 1024));
        assert!(!status.has_error());
    }

    #[test]
    fn test_flash_plain_sector_size() {
        let status = FlashStatus {
            enabled: true,
            sector: 512,
            count: 8192,
            error: 3,
        };
        let parsed = FlashStatus::parse(&status.to_bytes()).unwrap();
        assert_eq!(parsed, status);
        assert_eq!(parsed.sector_size(), Some(512));
        assert!(parsed.has_error());
    }

    #[test]
    fn test_flash_oversized_exponent() {
        let status = FlashStatus {
            sector: 0x8000 | 40,
            ..FlashStatus::default()
        };
        assert_eq!(status.sector_size(), None);
        assert_eq!(status.size(), None);
    }

    #[test]
    fn test_flash_short_response() {
        assert!(matches!(
            FlashStatus::parse(&[]),
            Err(Error::TruncatedStatus {
                query: StatusQuery::Flash,
                expected: 8,
                received: 0
            })
        ));
    }
}

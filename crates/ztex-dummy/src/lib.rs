//! ztex-dummy - In-memory ZTEX board emulator for testing
//!
//! [`DummyZtex`] answers the same vendor requests as the ZTEX default
//! firmware from records held in memory, so identification, status queries
//! and report rendering can be exercised without hardware.

use std::collections::{HashMap, HashSet};
use std::io;

use ztex_core::error::{Error, Result, StringDescriptor};
use ztex_core::protocol::{
    VR_DESCRIPTOR, VR_FLASH_STATUS, VR_FPGA_STATUS, VR_MAC_EEPROM_READ, ZTEX_USB_PRODUCT,
    ZTEX_USB_VENDOR,
};
use ztex_core::{
    BcdVersion, Capabilities, ConfigData, Descriptor, FlashStatus, FpgaStatus, ProductId,
    Transport, UsbIdentity, UsbSpeed,
};

/// Size of the emulated MAC EEPROM
const MAC_EEPROM_SIZE: usize = 256;

/// Records served by the emulated board
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// USB identity reported by the host stack
    pub usb: UsbIdentity,
    /// ZTEX descriptor
    pub descriptor: Descriptor,
    /// Configuration block written to the MAC EEPROM, if any
    pub config: Option<ConfigData>,
    /// FPGA status
    pub fpga: FpgaStatus,
    /// Flash status
    pub flash: FlashStatus,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            usb: UsbIdentity {
                bus: "1".to_string(),
                address: 7,
                speed: Some(UsbSpeed::High),
                port_chain: vec![2, 1],
                usb_version: BcdVersion(0x0200),
                device_version: BcdVersion(0x0000),
                class: 0xFF,
                subclass: 0xFF,
                protocol: 0xFF,
                max_packet_size_0: 64,
                vendor_id: ZTEX_USB_VENDOR,
                product_id: ZTEX_USB_PRODUCT,
                manufacturer: "ZTEX".to_string(),
                product: "USB-FPGA Module 2.14b (default)".to_string(),
                serial_number: "04A32F17BC".to_string(),
            },
            descriptor: Descriptor {
                product: ProductId([10, 14, 0, 0]),
                firmware_version: 3,
                interface_version: 1,
                capabilities: Capabilities::EEPROM
                    | Capabilities::FPGA_CONFIGURATION
                    | Capabilities::FLASH_MEMORY
                    | Capabilities::HS_FPGA_CONFIGURATION
                    | Capabilities::MAC_EEPROM
                    | Capabilities::DEFAULT_FIRMWARE,
                serial: "04A32F17BC".to_string(),
                ..Descriptor::default()
            },
            config: Some(ConfigData {
                board_type: 1,
                board_series: 2,
                board_number: 14,
                board_variant: Some('b'),
                fpga_type: 0x0124,
                fpga_package: 3,
                fpga_grade: "2C".to_string(),
                ram_size_code: 0x1A,
                ram_type: 8,
                serial: "04A32F17BC".to_string(),
                bitstream_size: 0,
                bitstream_capacity: 0x0180,
                bitstream_start: 0,
            }),
            fpga: FpgaStatus::default(),
            flash: FlashStatus {
                enabled: true,
                sector: 0x8010,
                count: 256,
                error: 0,
            },
        }
    }
}

/// Emulated ZTEX board
pub struct DummyZtex {
    config: DummyConfig,
    eeprom: [u8; MAC_EEPROM_SIZE],
    failing: HashSet<u8>,
    truncated: HashMap<u8, usize>,
    missing_string: Option<StringDescriptor>,
    requests: Vec<u8>,
}

impl DummyZtex {
    /// Create an emulated board serving `config`
    pub fn new(config: DummyConfig) -> Self {
        let mut eeprom = [0xFF; MAC_EEPROM_SIZE];
        if let Some(data) = &config.config {
            let bytes = data.to_bytes();
            eeprom[..bytes.len()].copy_from_slice(&bytes);
        }

        Self {
            config,
            eeprom,
            failing: HashSet::new(),
            truncated: HashMap::new(),
            missing_string: None,
            requests: Vec::new(),
        }
    }

    /// Make every transfer with this request code fail
    pub fn fail_request(mut self, request: u8) -> Self {
        self.failing.insert(request);
        self
    }

    /// Cut responses to this request code after `len` bytes
    pub fn truncate_request(mut self, request: u8, len: usize) -> Self {
        self.truncated.insert(request, len);
        self
    }

    /// Report this string descriptor as unreadable
    pub fn without_string(mut self, which: StringDescriptor) -> Self {
        self.missing_string = Some(which);
        self
    }

    /// Change the FPGA state served from now on
    pub fn set_fpga_status(&mut self, status: FpgaStatus) {
        self.config.fpga = status;
    }

    /// Request codes received so far, in order
    pub fn requests(&self) -> &[u8] {
        &self.requests
    }

    fn response(&self, request: u8, value: u16) -> Option<Vec<u8>> {
        match request {
            VR_DESCRIPTOR => Some(self.config.descriptor.to_bytes().to_vec()),
            VR_FPGA_STATUS => Some(self.config.fpga.to_bytes().to_vec()),
            VR_FLASH_STATUS => Some(self.config.flash.to_bytes().to_vec()),
            VR_MAC_EEPROM_READ => {
                let start = (value as usize).min(MAC_EEPROM_SIZE);
                Some(self.eeprom[start..].to_vec())
            }
            _ => None,
        }
    }
}

impl Default for DummyZtex {
    fn default() -> Self {
        Self::new(DummyConfig::default())
    }
}

impl Transport for DummyZtex {
    fn vendor_in(&mut self, request: u8, value: u16, _index: u16, buf: &mut [u8]) -> Result<usize> {
        self.requests.push(request);

        let stall = || Error::TransferFailed {
            request,
            source: Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "endpoint stalled")),
        };

        if self.failing.contains(&request) {
            return Err(stall());
        }
        let mut data = self.response(request, value).ok_or_else(stall)?;
        if let Some(&len) = self.truncated.get(&request) {
            data.truncate(len);
        }

        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        log::trace!("dummy: request 0x{:02X} -> {} bytes", request, len);
        Ok(len)
    }

    fn usb_identity(&self) -> Result<UsbIdentity> {
        match self.missing_string {
            Some(which) => Err(Error::StringDescriptorUnavailable(which)),
            None => Ok(self.config.usb.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ztex_core::ZtexDevice;

    #[test]
    fn test_default_board_identifies() {
        let device = ZtexDevice::open(DummyZtex::default()).unwrap();
        assert_eq!(device.descriptor().product.to_string(), "10.14.0.0");
        assert_eq!(device.config().unwrap().board_version(), "2.14b");
        assert_eq!(
            device.transport().requests(),
            &[VR_DESCRIPTOR, VR_MAC_EEPROM_READ]
        );
    }

    #[test]
    fn test_status_changes_are_observed() {
        let mut device = ZtexDevice::open(DummyZtex::default()).unwrap();
        assert!(!device.query_fpga_status().unwrap().configured);

        let mut dummy = device.into_transport();
        dummy.set_fpga_status(FpgaStatus {
            configured: true,
            checksum: 0x9C,
            transferred: 340_604,
            init: 1,
            result: 0,
            swapped: false,
        });
        let mut device = ZtexDevice::open(dummy).unwrap();
        let status = device.query_fpga_status().unwrap();
        assert!(status.configured);
        assert_eq!(status.transferred, 340_604);
    }

    #[test]
    fn test_injected_failures() {
        let dummy = DummyZtex::default().fail_request(VR_DESCRIPTOR);
        assert!(matches!(
            ZtexDevice::open(dummy),
            Err(Error::TransferFailed {
                request: VR_DESCRIPTOR,
                ..
            })
        ));

        let dummy = DummyZtex::default().truncate_request(VR_FLASH_STATUS, 5);
        let mut device = ZtexDevice::open(dummy).unwrap();
        assert!(matches!(
            device.query_flash_status(),
            Err(Error::TruncatedStatus { received: 5, .. })
        ));

        let dummy = DummyZtex::default().without_string(StringDescriptor::SerialNumber);
        let device = ZtexDevice::open(dummy).unwrap();
        assert!(matches!(
            device.usb_identity(),
            Err(Error::StringDescriptorUnavailable(
                StringDescriptor::SerialNumber
            ))
        ));
    }
}

//! ZTEX device handle
//!
//! [`ZtexDevice`] owns the transport for as long as the device is in use.
//! Opening it reads and validates the ZTEX descriptor once; the status
//! queries are single round trips issued on demand.

use crate::config::ConfigData;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::protocol::*;
use crate::status::{FlashStatus, FpgaStatus};
use crate::transport::Transport;
use crate::usb::UsbIdentity;

/// An identified ZTEX device
pub struct ZtexDevice<T: Transport> {
    transport: T,
    descriptor: Descriptor,
    config: Option<ConfigData>,
}

impl<T: Transport> ZtexDevice<T> {
    /// Identify the device behind `transport`
    ///
    /// Reads the ZTEX descriptor and rejects devices whose magic does not
    /// match. Boards advertising a MAC EEPROM also have their configuration
    /// block read here.
    pub fn open(mut transport: T) -> Result<Self> {
        let descriptor = read_descriptor(&mut transport)?;

        log::info!(
            "ZTEX device: product {}, firmware {}, interface {}, serial {}",
            descriptor.product,
            descriptor.firmware_version,
            descriptor.interface_version,
            descriptor.serial
        );
        log::debug!("Capabilities: {:?}", descriptor.capabilities);

        let config = if descriptor.capabilities.mac_eeprom() {
            read_config(&mut transport)?
        } else {
            log::debug!("No MAC EEPROM, skipping configuration data");
            None
        };

        Ok(Self {
            transport,
            descriptor,
            config,
        })
    }

    /// The ZTEX descriptor read at open time
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Board configuration read at open time, if the board has one
    pub fn config(&self) -> Option<&ConfigData> {
        self.config.as_ref()
    }

    /// USB identity of the device
    pub fn usb_identity(&self) -> Result<UsbIdentity> {
        self.transport.usb_identity()
    }

    /// Query the FPGA configuration status
    pub fn query_fpga_status(&mut self) -> Result<FpgaStatus> {
        if !self.descriptor.capabilities.fpga_configuration() {
            log::debug!("Device does not advertise FPGA configuration support");
        }
        let mut buf = [0u8; FPGA_STATUS_LEN];
        let len = self.transport.vendor_in(VR_FPGA_STATUS, 0, 0, &mut buf)?;
        log::debug!("FPGA status: {:02X?}", &buf[..len]);
        FpgaStatus::parse(&buf[..len])
    }

    /// Query the flash subsystem status
    pub fn query_flash_status(&mut self) -> Result<FlashStatus> {
        if !self.descriptor.capabilities.flash_memory() {
            log::debug!("Device does not advertise flash memory support");
        }
        let mut buf = [0u8; FLASH_STATUS_LEN];
        let len = self.transport.vendor_in(VR_FLASH_STATUS, 0, 0, &mut buf)?;
        log::debug!("Flash status: {:02X?}", &buf[..len]);
        FlashStatus::parse(&buf[..len])
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the device handle and return the transport
    pub fn into_transport(self) -> T {
        self.transport
    }
}

fn read_descriptor<T: Transport>(transport: &mut T) -> Result<Descriptor> {
    let mut buf = [0u8; DESCRIPTOR_REQUEST_LEN];
    let len = transport.vendor_in(VR_DESCRIPTOR, 0, 0, &mut buf)?;
    log::debug!("ZTEX descriptor ({} bytes): {:02X?}", len, &buf[..len]);
    Descriptor::parse(&buf[..len])
}

fn read_config<T: Transport>(transport: &mut T) -> Result<Option<ConfigData>> {
    let mut buf = [0u8; CONFIG_LEN];
    let len = transport.vendor_in(VR_MAC_EEPROM_READ, CONFIG_ADDRESS, 0, &mut buf)?;
    ConfigData::parse(&buf[..len])
}

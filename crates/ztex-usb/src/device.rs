//! nusb transport implementation
//!
//! Enumerates ZTEX boards, opens one, claims interface 0 and performs the
//! vendor control requests the core decoders need.

use std::time::Duration;

use nusb::transfer::{ControlIn, ControlType, Recipient};
use nusb::{Device, DeviceInfo, Interface, MaybeFuture, Speed};
use ztex_core::error::{Error, Result, StringDescriptor};
use ztex_core::protocol::{DEFAULT_TIMEOUT_MS, ZTEX_INTERFACE, ZTEX_USB_PRODUCT, ZTEX_USB_VENDOR};
use ztex_core::{BcdVersion, Transport, UsbIdentity, UsbSpeed, ZtexDevice};

/// Options for selecting a ZTEX board
#[derive(Debug, Clone, Default)]
pub struct ZtexUsbConfig {
    /// Index among the matching boards (0 = first)
    pub device_index: usize,
    /// Only consider boards with this USB serial number
    pub serial: Option<String>,
}

/// Open and identify the board selected by `config`
pub fn open(config: &ZtexUsbConfig) -> Result<ZtexDevice<NusbTransport>> {
    let device_info = find_devices(config)?
        .into_iter()
        .nth(config.device_index)
        .ok_or(Error::DeviceNotFound {
            vendor_id: ZTEX_USB_VENDOR,
            product_id: ZTEX_USB_PRODUCT,
            index: config.device_index,
        })?;

    let transport = NusbTransport::open(device_info)?;
    ZtexDevice::open(transport)
}

fn find_devices(config: &ZtexUsbConfig) -> Result<Vec<DeviceInfo>> {
    let devices: Vec<_> = nusb::list_devices()
        .wait()
        .map_err(|e| Error::OpenFailed(e.to_string().into()))?
        .filter(|d| d.vendor_id() == ZTEX_USB_VENDOR && d.product_id() == ZTEX_USB_PRODUCT)
        .filter(|d| match config.serial.as_deref() {
            Some(serial) => d.serial_number() == Some(serial),
            None => true,
        })
        .collect();

    log::debug!("Found {} ZTEX device(s)", devices.len());
    Ok(devices)
}

/// Claimed ZTEX board
///
/// Holds the open device and its claimed interface; both are released on drop.
pub struct NusbTransport {
    info: DeviceInfo,
    device: Device,
    interface: Interface,
}

impl NusbTransport {
    /// Open the device and claim the vendor interface
    pub fn open(info: DeviceInfo) -> Result<Self> {
        log::info!(
            "Opening ZTEX device at bus {} address {}",
            info.bus_id(),
            info.device_address()
        );

        let device = info
            .open()
            .wait()
            .map_err(|e| Error::OpenFailed(e.to_string().into()))?;

        let interface = device
            .claim_interface(ZTEX_INTERFACE)
            .wait()
            .map_err(|e| Error::ClaimFailed {
                interface: ZTEX_INTERFACE,
                source: e.to_string().into(),
            })?;

        Ok(Self {
            info,
            device,
            interface,
        })
    }
}

impl Transport for NusbTransport {
    fn vendor_in(&mut self, request: u8, value: u16, index: u16, buf: &mut [u8]) -> Result<usize> {
        log::trace!(
            "control in: request 0x{:02X} value 0x{:04X} index 0x{:04X} length {}",
            request,
            value,
            index,
            buf.len()
        );

        let data = self
            .interface
            .control_in(
                ControlIn {
                    control_type: ControlType::Vendor,
                    recipient: Recipient::Device,
                    request,
                    value,
                    index,
                    length: buf.len() as u16,
                },
                Duration::from_millis(DEFAULT_TIMEOUT_MS),
            )
            .wait()
            .map_err(|e| Error::TransferFailed {
                request,
                source: e.to_string().into(),
            })?;

        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    fn usb_identity(&self) -> Result<UsbIdentity> {
        let info = &self.info;
        let manufacturer = info
            .manufacturer_string()
            .ok_or(Error::StringDescriptorUnavailable(
                StringDescriptor::Manufacturer,
            ))?;
        let product = info
            .product_string()
            .ok_or(Error::StringDescriptorUnavailable(StringDescriptor::Product))?;
        let serial_number = info
            .serial_number()
            .ok_or(Error::StringDescriptorUnavailable(
                StringDescriptor::SerialNumber,
            ))?;

        Ok(UsbIdentity {
            bus: info.bus_id().to_string(),
            address: info.device_address(),
            speed: info.speed().and_then(usb_speed),
            port_chain: info.port_chain().to_vec(),
            usb_version: BcdVersion(info.usb_version()),
            device_version: BcdVersion(info.device_version()),
            class: info.class(),
            subclass: info.subclass(),
            protocol: info.protocol(),
            max_packet_size_0: self.device.device_descriptor().max_packet_size_0(),
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            manufacturer: manufacturer.to_string(),
            product: product.to_string(),
            serial_number: serial_number.to_string(),
        })
    }
}

impl Drop for NusbTransport {
    fn drop(&mut self) {
        log::debug!(
            "Releasing ZTEX device at bus {} address {}",
            self.info.bus_id(),
            self.info.device_address()
        );
    }
}

fn usb_speed(speed: Speed) -> Option<UsbSpeed> {
    match speed {
        Speed::Low => Some(UsbSpeed::Low),
        Speed::Full => Some(UsbSpeed::Full),
        Speed::High => Some(UsbSpeed::High),
        Speed::Super => Some(UsbSpeed::Super),
        Speed::SuperPlus => Some(UsbSpeed::SuperPlus),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

//! USB identity of an opened device

use std::fmt;

/// Negotiated bus speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbSpeed {
    /// 1.5 Mbit/s
    Low,
    /// 12 Mbit/s
    Full,
    /// 480 Mbit/s
    High,
    /// 5 Gbit/s
    Super,
    /// 10 Gbit/s
    SuperPlus,
}

impl fmt::Display for UsbSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsbSpeed::Low => write!(f, "low (1.5 Mbit/s)"),
            UsbSpeed::Full => write!(f, "full (12 Mbit/s)"),
            UsbSpeed::High => write!(f, "high (480 Mbit/s)"),
            UsbSpeed::Super => write!(f, "super (5 Gbit/s)"),
            UsbSpeed::SuperPlus => write!(f, "super+ (10 Gbit/s)"),
        }
    }
}

/// Binary coded decimal version number, as found in `bcdUSB` and `bcdDevice`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BcdVersion(pub u16);

impl fmt::Display for BcdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        let major = ((v >> 12) & 0xF) * 10 + ((v >> 8) & 0xF);
        write!(f, "{}.{}{}", major, (v >> 4) & 0xF, v & 0xF)
    }
}

/// Identity of the opened USB device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsbIdentity {
    /// Bus identifier
    pub bus: String,
    /// Device address on the bus
    pub address: u8,
    /// Negotiated speed, if the OS reports it
    pub speed: Option<UsbSpeed>,
    /// Hub port chain from the root hub
    pub port_chain: Vec<u8>,
    /// USB specification release (`bcdUSB`)
    pub usb_version: BcdVersion,
    /// Device release number (`bcdDevice`)
    pub device_version: BcdVersion,
    /// Device class code
    pub class: u8,
    /// Device subclass code
    pub subclass: u8,
    /// Device protocol code
    pub protocol: u8,
    /// Maximum packet size of endpoint 0
    pub max_packet_size_0: u8,
    /// Vendor ID
    pub vendor_id: u16,
    /// Product ID
    pub product_id: u16,
    /// Manufacturer string
    pub manufacturer: String,
    /// Product string
    pub product: String,
    /// Serial number string
    pub serial_number: String,
}

impl UsbIdentity {
    /// Port chain formatted like sysfs paths, e.g. `1.4.2`
    pub fn port_path(&self) -> String {
        self.port_chain
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

//! Error types for ztex-core

use std::fmt;

use thiserror::Error;

/// Boxed cause reported by a transport implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Status query that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusQuery {
    /// FPGA configuration status
    Fpga,
    /// Flash subsystem status
    Flash,
}

impl fmt::Display for StatusQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusQuery::Fpga => write!(f, "FPGA status"),
            StatusQuery::Flash => write!(f, "flash status"),
        }
    }
}

/// USB string descriptor that could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringDescriptor {
    /// iManufacturer
    Manufacturer,
    /// iProduct
    Product,
    /// iSerialNumber
    SerialNumber,
}

impl fmt::Display for StringDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringDescriptor::Manufacturer => write!(f, "manufacturer"),
            StringDescriptor::Product => write!(f, "product"),
            StringDescriptor::SerialNumber => write!(f, "serial number"),
        }
    }
}

/// Errors that can occur while identifying or querying a ZTEX device
#[derive(Debug, Error)]
pub enum Error {
    /// No device with the ZTEX vendor/product ID was enumerated
    #[error("ZTEX device not found (VID:{vendor_id:04X} PID:{product_id:04X}, index {index})")]
    DeviceNotFound {
        /// Vendor ID searched for
        vendor_id: u16,
        /// Product ID searched for
        product_id: u16,
        /// Requested device index
        index: usize,
    },

    /// Failed to open the USB device
    #[error("failed to open device")]
    OpenFailed(#[source] BoxError),

    /// Failed to claim the vendor interface
    #[error("failed to claim interface {interface}")]
    ClaimFailed {
        /// Interface number
        interface: u8,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// Descriptor magic does not identify a ZTEX device
    #[error("unrecognized device: descriptor magic {magic:02X?} is not \"ZTEX\"")]
    UnrecognizedDevice {
        /// Magic bytes as received
        magic: [u8; 4],
    },

    /// Descriptor response shorter than required
    #[error("truncated ZTEX descriptor: expected {expected} bytes, received {received}")]
    TruncatedDescriptor {
        /// Declared size, but never less than the version 1 layout
        expected: usize,
        /// Bytes actually received
        received: usize,
    },

    /// Board configuration block shorter than its fixed layout
    #[error("truncated configuration data: expected {expected} bytes, received {received}")]
    TruncatedConfig {
        /// Fixed layout size
        expected: usize,
        /// Bytes actually received
        received: usize,
    },

    /// Status response shorter than its fixed layout
    #[error("truncated {query} response: expected {expected} bytes, received {received}")]
    TruncatedStatus {
        /// Query that returned the short response
        query: StatusQuery,
        /// Fixed layout size
        expected: usize,
        /// Bytes actually received
        received: usize,
    },

    /// USB control transfer failed
    #[error("USB control request 0x{request:02X} failed")]
    TransferFailed {
        /// Vendor request code
        request: u8,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// A USB string descriptor could not be read
    #[error("{0} string descriptor unavailable")]
    StringDescriptorUnavailable(StringDescriptor),
}

impl Error {
    /// Whether this error ended a status query (transfer failure or short response)
    pub fn is_status_query_failure(&self) -> bool {
        match self {
            Error::TruncatedStatus { .. } => true,
            Error::TransferFailed { request, .. } => matches!(
                *request,
                crate::protocol::VR_FPGA_STATUS | crate::protocol::VR_FLASH_STATUS
            ),
            _ => false,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

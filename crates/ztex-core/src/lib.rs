//! ztex-core - Device information model for ZTEX FPGA boards
//!
//! This crate decodes the records a ZTEX board exposes over USB vendor
//! control requests:
//!
//! - the self-describing ZTEX descriptor, including the capability bitmask
//! - the board configuration block stored in the MAC EEPROM
//! - the FPGA configuration status
//! - the flash subsystem status
//!
//! The USB side is abstracted by the [`Transport`] trait so that the same
//! identification and query logic runs against real hardware (`ztex-usb`)
//! and against an emulated board (`ztex-dummy`).
//!
//! # Example
//!
//! ```ignore
//! use ztex_core::{Transport, ZtexDevice};
//!
//! fn show<T: Transport>(transport: T) -> ztex_core::Result<()> {
//!     let mut device = ZtexDevice::open(transport)?;
//!     println!("Product: {}", device.descriptor().product);
//!     println!("FPGA configured: {}", device.query_fpga_status()?.configured);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod capability;
pub mod config;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod protocol;
pub mod status;
pub mod transport;
pub mod usb;

pub use capability::Capabilities;
pub use config::ConfigData;
pub use descriptor::{Descriptor, ProductId};
pub use device::ZtexDevice;
pub use error::{Error, Result, StatusQuery, StringDescriptor};
pub use status::{FlashStatus, FpgaStatus};
pub use transport::Transport;
pub use usb::{BcdVersion, UsbIdentity, UsbSpeed};

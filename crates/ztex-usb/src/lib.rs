//! ztex-usb - USB access to ZTEX FPGA boards
//!
//! This crate finds ZTEX boards (VID:221A PID:0100) with `nusb`, claims the
//! vendor interface and implements [`ztex_core::Transport`] on top of
//! blocking control transfers.
//!
//! # Example
//!
//! ```no_run
//! use ztex_usb::{open, ZtexUsbConfig};
//!
//! let mut device = open(&ZtexUsbConfig::default())?;
//! println!("Serial: {}", device.descriptor().serial);
//! println!("FPGA configured: {}", device.query_fpga_status()?.configured);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The interface is released when the returned device is dropped.

mod device;

pub use device::{open, NusbTransport, ZtexUsbConfig};

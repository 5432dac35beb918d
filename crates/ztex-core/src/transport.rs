//! Transport abstraction
//!
//! A ZTEX board is only ever talked to through vendor control-IN requests
//! plus the standard USB identity the host stack already knows. Anything
//! providing those two can back a [`ZtexDevice`](crate::ZtexDevice).

use crate::error::Result;
use crate::usb::UsbIdentity;

/// USB access needed to identify and query a ZTEX board
pub trait Transport {
    /// Issue a vendor, device-recipient control-IN request
    ///
    /// Fills `buf` with the response and returns the number of bytes the
    /// device sent, which may be fewer than `buf.len()`. Transport errors
    /// are reported as [`Error::TransferFailed`](crate::Error::TransferFailed).
    fn vendor_in(&mut self, request: u8, value: u16, index: u16, buf: &mut [u8]) -> Result<usize>;

    /// USB identity of the device, including its string descriptors
    fn usb_identity(&self) -> Result<UsbIdentity>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn vendor_in(&mut self, request: u8, value: u16, index: u16, buf: &mut [u8]) -> Result<usize> {
        (**self).vendor_in(request, value, index, buf)
    }

    fn usb_identity(&self) -> Result<UsbIdentity> {
        (**self).usb_identity()
    }
}

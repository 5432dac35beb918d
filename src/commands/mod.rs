//! Command implementation
//!
//! [`run`] opens and identifies a board, then [`report`] gathers and prints
//! the selected sections in a fixed order: USB identity, ZTEX information,
//! FPGA status, flash status. The first failure ends the command and is
//! reported together with the operation that failed.

pub mod report;

use std::error::Error as StdError;
use std::io::Write;

use clap::CommandFactory;
use thiserror::Error;
use ztex_core::error::BoxError;
use ztex_core::{Transport, ZtexDevice};

use crate::cli::{Cli, Sections};

/// A failed step of the command
#[derive(Debug, Error)]
#[error("{operation}")]
pub struct CommandError {
    /// What was being done when the failure happened
    pub operation: &'static str,
    /// Underlying cause
    pub source: BoxError,
}

impl CommandError {
    /// The operation followed by every cause in the chain, `: ` separated
    pub fn chain(&self) -> String {
        let mut message = self.operation.to_string();
        let mut cause: Option<&(dyn StdError + 'static)> = Some(&*self.source);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

trait Context<T> {
    fn context(self, operation: &'static str) -> Result<T, CommandError>;
}

impl<T, E: Into<BoxError>> Context<T> for Result<T, E> {
    fn context(self, operation: &'static str) -> Result<T, CommandError> {
        self.map_err(|e| CommandError {
            operation,
            source: e.into(),
        })
    }
}

/// Open a board with `open` and report the selected sections to `out`
///
/// The board is opened even when no section is selected, so an absent or
/// unrecognized device is always an error.
pub fn run<T, F, W>(sections: Sections, open: F, out: &mut W) -> Result<(), CommandError>
where
    T: Transport,
    F: FnOnce() -> ztex_core::Result<ZtexDevice<T>>,
    W: Write + ?Sized,
{
    let mut device = open().context("open device")?;
    report(&mut device, sections, out)
}

/// Write the ztex-info(1) manual page to `out`
pub fn man_page<W: Write>(out: &mut W) -> Result<(), CommandError> {
    clap_mangen::Man::new(Cli::command())
        .render(out)
        .context("write output")?;
    out.flush().context("write output")
}

/// Report the selected sections of an opened board
pub fn report<T, W>(
    device: &mut ZtexDevice<T>,
    sections: Sections,
    out: &mut W,
) -> Result<(), CommandError>
where
    T: Transport,
    W: Write + ?Sized,
{
    if sections.contains(Sections::USB) {
        let usb = device.usb_identity().context("read USB identity")?;
        report::write_usb(out, &usb).context("write output")?;
    }

    if sections.contains(Sections::ZTEX) {
        report::write_ztex(out, device.descriptor(), device.config()).context("write output")?;
    }

    if sections.contains(Sections::FPGA) {
        let status = device.query_fpga_status().context("query FPGA status")?;
        report::write_fpga_status(out, &status).context("write output")?;
    }

    if sections.contains(Sections::FLASH) {
        let status = device.query_flash_status().context("query flash status")?;
        report::write_flash_status(out, &status).context("write output")?;
    }

    out.flush().context("write output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ztex_core::error::{Error, StringDescriptor};
    use ztex_core::protocol::{
        VR_DESCRIPTOR, VR_FLASH_STATUS, VR_FPGA_STATUS, VR_MAC_EEPROM_READ,
    };
    use ztex_dummy::DummyZtex;

    fn run_dummy(sections: Sections, dummy: DummyZtex) -> (Result<(), CommandError>, String) {
        let mut out = Vec::new();
        let result = run(sections, || ZtexDevice::open(dummy), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn headings(text: &str) -> Vec<&str> {
        text.lines().filter(|l| !l.starts_with(' ')).collect()
    }

    #[test]
    fn test_no_sections_still_opens() {
        let mut opened = false;
        let mut out = Vec::new();
        let result = run(
            Sections::empty(),
            || {
                opened = true;
                ZtexDevice::open(DummyZtex::default())
            },
            &mut out,
        );
        assert!(result.is_ok());
        assert!(opened);
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_sections_sends_only_identification() {
        let mut device = ZtexDevice::open(DummyZtex::default()).unwrap();
        let mut out = Vec::new();
        report(&mut device, Sections::empty(), &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            device.transport().requests(),
            &[VR_DESCRIPTOR, VR_MAC_EEPROM_READ]
        );
    }

    #[test]
    fn test_man_page() {
        let mut out = Vec::new();
        man_page(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text
            .lines()
            .any(|l| l.starts_with(".TH ") && l.contains("ztex")));
        assert!(text.contains(".SH NAME"));
        assert!(text.contains(".SH OPTIONS"));
        for flag in ["all", "usb", "ztex", "fpga", "flash", "device", "serial"] {
            assert!(text.contains(&format!("\\-\\-{flag}")), "--{flag} missing");
        }
    }

    #[test]
    fn test_open_failure() {
        let dummy = DummyZtex::default().fail_request(VR_DESCRIPTOR);
        let (result, text) = run_dummy(Sections::all(), dummy);
        let err = result.unwrap_err();
        assert_eq!(err.operation, "open device");
        assert_eq!(err.to_string(), "open device");
        assert_eq!(
            err.chain(),
            "open device: USB control request 0x22 failed: endpoint stalled"
        );
        assert!(text.is_empty());
    }

    #[test]
    fn test_all_sections_in_order() {
        let (result, text) = run_dummy(Sections::all(), DummyZtex::default());
        result.unwrap();
        assert_eq!(
            headings(&text),
            ["USB Device:", "ZTEX Device:", "FPGA Status:", "Flash Status:"]
        );
        assert!(text.contains("  Serial Number: 04A32F17BC\n"));
        assert!(text.contains("    Version: 2.14b\n"));
        assert!(text.contains("  Configured: false\n"));
        assert!(text.contains("  Sector: 65536\n"));
    }

    #[test]
    fn test_single_section() {
        let (result, text) = run_dummy(Sections::FLASH, DummyZtex::default());
        result.unwrap();
        assert_eq!(headings(&text), ["Flash Status:"]);

        let (result, text) = run_dummy(Sections::USB | Sections::FPGA, DummyZtex::default());
        result.unwrap();
        assert_eq!(headings(&text), ["USB Device:", "FPGA Status:"]);
    }

    #[test]
    fn test_fpga_status_failure() {
        let dummy = DummyZtex::default().fail_request(VR_FPGA_STATUS);
        let (result, text) = run_dummy(Sections::all(), dummy);
        let err = result.unwrap_err();
        assert_eq!(err.operation, "query FPGA status");
        assert_eq!(
            err.chain(),
            "query FPGA status: USB control request 0x30 failed: endpoint stalled"
        );
        // sections before the failure were already written
        assert_eq!(headings(&text), ["USB Device:", "ZTEX Device:"]);
    }

    #[test]
    fn test_flash_status_truncated() {
        let dummy = DummyZtex::default().truncate_request(VR_FLASH_STATUS, 4);
        let (result, _) = run_dummy(Sections::FLASH, dummy);
        let err = result.unwrap_err();
        assert_eq!(err.operation, "query flash status");
        let cause = err.source.downcast_ref::<Error>().unwrap();
        assert!(cause.is_status_query_failure());
    }

    #[test]
    fn test_missing_string_descriptor() {
        let dummy = DummyZtex::default().without_string(StringDescriptor::Product);
        let (result, _) = run_dummy(Sections::USB, dummy);
        let err = result.unwrap_err();
        assert_eq!(err.operation, "read USB identity");
        assert_eq!(
            err.chain(),
            format!(
                "read USB identity: {}",
                Error::StringDescriptorUnavailable(StringDescriptor::Product)
            )
        );
    }
}

//! Report rendering
//!
//! Each record is rendered as one section: a heading followed by its fields,
//! nested with two spaces per level. Rendering does no I/O beyond writing to
//! the given sink.

use std::io::{self, Write};

use ztex_core::capability::CAPABILITY_LABELS;
use ztex_core::{ConfigData, Descriptor, FlashStatus, FpgaStatus, UsbIdentity};

/// Write the USB identity section
pub fn write_usb<W: Write + ?Sized>(out: &mut W, usb: &UsbIdentity) -> io::Result<()> {
    let speed = usb
        .speed
        .map_or_else(|| "unknown".to_string(), |s| s.to_string());

    writeln!(out, "USB Device:")?;
    writeln!(out, "  Descriptor:")?;
    writeln!(out, "    Bus: {}", usb.bus)?;
    writeln!(out, "    Address: {}", usb.address)?;
    writeln!(out, "    Speed: {}", speed)?;
    writeln!(out, "    Port: {}", usb.port_path())?;
    writeln!(out, "    Spec: {}", usb.usb_version)?;
    writeln!(out, "    Device: {}", usb.device_version)?;
    writeln!(out, "    Vendor ID: 0x{:04x}", usb.vendor_id)?;
    writeln!(out, "    Product ID: 0x{:04x}", usb.product_id)?;
    writeln!(out, "    Class: 0x{:02x}", usb.class)?;
    writeln!(out, "    Subclass: 0x{:02x}", usb.subclass)?;
    writeln!(out, "    Protocol: 0x{:02x}", usb.protocol)?;
    writeln!(
        out,
        "    Maximum Control Packet Size: {}",
        usb.max_packet_size_0
    )?;
    writeln!(out, "  Manufacturer: {}", usb.manufacturer)?;
    writeln!(out, "  Product: {}", usb.product)?;
    writeln!(out, "  Serial Number: {}", usb.serial_number)?;
    Ok(())
}

/// Write the ZTEX device section
pub fn write_ztex<W: Write + ?Sized>(
    out: &mut W,
    desc: &Descriptor,
    config: Option<&ConfigData>,
) -> io::Result<()> {
    writeln!(out, "ZTEX Device:")?;
    writeln!(out, "  Descriptor:")?;
    writeln!(out, "    Size: {}", desc.size)?;
    writeln!(out, "    Version: {}", desc.version)?;
    writeln!(out, "    Magic: {}", desc.magic_str())?;
    writeln!(out, "    Product ID: {}", desc.product)?;
    writeln!(out, "    Firmware Version: {}", desc.firmware_version)?;
    writeln!(out, "    Interface Version: {}", desc.interface_version)?;
    writeln!(out, "    Capability:")?;
    writeln!(out, "      Raw: 0x{:012x}", desc.capabilities.raw())?;
    for (flag, label) in CAPABILITY_LABELS {
        writeln!(out, "      {}: {}", label, desc.capabilities.contains(flag))?;
    }
    writeln!(out, "    Module: {}", hex_bytes(&desc.module))?;
    writeln!(out, "    Serial Number: {}", desc.serial)?;

    let Some(config) = config else {
        writeln!(out, "  Configuration Data: not available")?;
        return Ok(());
    };

    writeln!(out, "  Board:")?;
    writeln!(
        out,
        "    Type: {}",
        named(config.board_type_name(), config.board_type)
    )?;
    writeln!(out, "    Version: {}", config.board_version())?;
    writeln!(out, "    Serial Number: {}", config.serial)?;
    writeln!(out, "  FPGA:")?;
    writeln!(out, "    Type: 0x{:04x}", config.fpga_type)?;
    writeln!(out, "    Package: {}", config.fpga_package)?;
    writeln!(out, "    Grade: {}", config.fpga_grade)?;
    writeln!(out, "  RAM:")?;
    writeln!(
        out,
        "    Type: {}",
        named(config.ram_type_name(), config.ram_type)
    )?;
    writeln!(out, "    Size: {}", format_size(config.ram_size()))?;
    writeln!(out, "  Bitstream:")?;
    writeln!(out, "    Start: 0x{:08x}", config.bitstream_start_bytes())?;
    writeln!(
        out,
        "    Capacity: {}",
        format_size(config.bitstream_capacity_bytes() as u64)
    )?;
    writeln!(
        out,
        "    Size: {}",
        format_size(config.bitstream_size_bytes() as u64)
    )?;
    Ok(())
}

/// Write the FPGA status section
///
/// Fields are shown as received; the checksum is printed even when the FPGA
/// is not configured.
pub fn write_fpga_status<W: Write + ?Sized>(out: &mut W, status: &FpgaStatus) -> io::Result<()> {
    writeln!(out, "FPGA Status:")?;
    writeln!(out, "  Configured: {}", status.configured)?;
    writeln!(out, "  Checksum: 0x{:02x}", status.checksum)?;
    writeln!(out, "  Transferred: {}", status.transferred)?;
    writeln!(out, "  Init: {}", status.init)?;
    writeln!(out, "  Result: {}", status.result)?;
    writeln!(out, "  Swapped: {}", status.swapped)?;
    Ok(())
}

/// Write the flash status section
pub fn write_flash_status<W: Write + ?Sized>(out: &mut W, status: &FlashStatus) -> io::Result<()> {
    let sector = match status.sector_size() {
        Some(size) => size.to_string(),
        None => format!("invalid (0x{:04x})", status.sector),
    };
    let size = status
        .size()
        .map_or_else(|| "unknown".to_string(), format_size);
    let error = if status.has_error() {
        format!("{} (last operation failed)", status.error)
    } else {
        "none".to_string()
    };

    writeln!(out, "Flash Status:")?;
    writeln!(out, "  Enabled: {}", status.enabled)?;
    writeln!(out, "  Sector: {}", sector)?;
    writeln!(out, "  Count: {}", status.count)?;
    writeln!(out, "  Size: {}", size)?;
    writeln!(out, "  Error: {}", error)?;
    Ok(())
}

fn named(name: Option<&str>, code: impl std::fmt::Display) -> String {
    match name {
        Some(name) => format!("{} ({})", name, code),
        None => format!("unknown ({})", code),
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes % (1024 * 1024) == 0 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

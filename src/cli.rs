//! CLI argument parsing

use bitflags::bitflags;
use clap::Parser;

bitflags! {
    /// Report sections selected on the command line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Sections: u8 {
        /// USB identity
        const USB   = 1 << 0;
        /// ZTEX descriptor and board configuration
        const ZTEX  = 1 << 1;
        /// FPGA status
        const FPGA  = 1 << 2;
        /// Flash status
        const FLASH = 1 << 3;
    }
}

#[derive(Parser, Debug)]
#[command(name = "ztex-info")]
#[command(
    author,
    version,
    about = "Report identity, capabilities and status of a ZTEX FPGA board",
    long_about = "Report identity, capabilities and status of a ZTEX FPGA board.\n\n\
        The device is always opened and identified, even when no section is \
        selected, so hardware problems are reported immediately."
)]
pub struct Cli {
    /// Output all information
    #[arg(short, long)]
    pub all: bool,

    /// Output USB device information
    #[arg(short, long)]
    pub usb: bool,

    /// Output ZTEX device information
    #[arg(short, long)]
    pub ztex: bool,

    /// Output FPGA status information
    #[arg(short, long)]
    pub fpga: bool,

    /// Output flash status information
    #[arg(short = 's', long)]
    pub flash: bool,

    /// Use the N-th ZTEX device found (0 = first)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub device: usize,

    /// Only consider devices with this USB serial number
    #[arg(long, value_name = "SERIAL")]
    pub serial: Option<String>,

    /// Print the manual page in roff format and exit without opening a device
    #[arg(long)]
    pub man: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Sections to emit, in report order
    pub fn sections(&self) -> Sections {
        if self.all {
            return Sections::all();
        }

        let mut sections = Sections::empty();
        sections.set(Sections::USB, self.usb);
        sections.set(Sections::ZTEX, self.ztex);
        sections.set(Sections::FPGA, self.fpga);
        sections.set(Sections::FLASH, self.flash);
        sections
    }

    /// Log filter matching the verbosity level
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

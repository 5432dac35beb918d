//! ztex-info - Report identity, capabilities and status of a ZTEX FPGA board
//!
//! Opens the first ZTEX board on the bus (or the one selected with
//! `--device`/`--serial`), identifies it through its ZTEX descriptor and
//! prints the sections requested on the command line.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use ztex_usb::ZtexUsbConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the -v level
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if cli.man {
        commands::man_page(&mut out)
    } else {
        let config = ZtexUsbConfig {
            device_index: cli.device,
            serial: cli.serial.clone(),
        };
        commands::run(cli.sections(), || ztex_usb::open(&config), &mut out)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ztex-info: {}", e.chain());
            ExitCode::FAILURE
        }
    }
}

use std::{path::*, process::ExitCode};
use clap::Parser;
use fits_to_tiff::*;

mod cmd_convert;

/// Converts FITS images into normalized 8-bit TIFF files
/// placed into `converted` subfolder of every given folder
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opt {
    #[command(flatten)]
    cmd: cmd_convert::CmdOptions,

    /// Path for saving log file
    #[arg(long)]
    log_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let _logger = match log_utils::start_logger(opt.log_path.as_deref()) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Error: can't start logger: {:#}", err);
            return ExitCode::from(1);
        }
    };
    log_utils::set_panic_logger();
    log::info!(
        "{} {} started. Options = {:#?}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        opt.cmd
    );

    match cmd_convert::execute(opt.cmd) {
        Ok(status) => {
            log::info!("Finished with {:?}", status);
            ExitCode::from(status.exit_code())
        }
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

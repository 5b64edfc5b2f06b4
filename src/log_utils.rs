use std::path::*;
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle};

/// Starts logging. With `log_path` messages go into file inside that
/// directory and warnings are duplicated to stderr. Without it only
/// warnings are written to stderr. `RUST_LOG` overrides level.
///
/// Returned handle must be kept alive while program works.
pub fn start_logger(log_path: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let handle = match log_path {
        Some(log_path) => {
            std::fs::create_dir_all(log_path)?;
            Logger::try_with_env_or_str("info")?
                .log_to_file(
                    FileSpec::default()
                        .directory(log_path)
                        .basename(env!("CARGO_PKG_NAME"))
                )
                .duplicate_to_stderr(Duplicate::Warn)
                .start()?
        }
        None =>
            Logger::try_with_env_or_str("warn")?
                .log_to_stderr()
                .start()?,
    };
    Ok(handle)
}

/// Writes panics into log instead of stderr
pub fn set_panic_logger() {
    std::panic::set_hook(Box::new(panic_handler));
}

#[allow(deprecated)]
fn panic_handler(panic_info: &std::panic::PanicInfo) {
    let payload = panic_info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        log::error!("panic occurred: {}", s);
    } else if let Some(s) = payload.downcast_ref::<String>() {
        log::error!("panic occurred: {}", s);
    } else {
        log::error!("panic occurred");
    }

    if let Some(loc) = panic_info.location() {
        log::error!("at location: {}", loc);
    }
}

pub struct TimeLogger {
    start_time: std::time::Instant,
}

impl TimeLogger {
    pub fn start() -> TimeLogger {
        TimeLogger { start_time: std::time::Instant::now() }
    }

    pub fn log(self, text: &str) {
        let time = self.start_time.elapsed().as_secs_f64();
        log::info!("BENCH {} time = {:.6} s", text, time);
    }
}

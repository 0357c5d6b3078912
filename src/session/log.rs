//! Session log
//!
//! Every log record is appended to the session log file as
//! `[<seconds since start>] <message>`. When the file cannot be opened the
//! session simply runs without a log.

use env_logger::{Builder, Env, Target};
use once_cell::sync::Lazy;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Environment variable holding the log filter (`info` when unset)
pub const LOG_ENV: &str = "MPSA_LOG";

static START: Lazy<Instant> = Lazy::new(Instant::now);

pub fn format_line(elapsed_secs: f64, message: &str) -> String {
    format!("[{:.2}] {}", elapsed_secs, message)
}

/// Route the `log` facade into `path`; returns false when logging is off
pub fn init(path: &Path) -> bool {
    Lazy::force(&START);

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, "info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{}",
            format_line(START.elapsed().as_secs_f64(), &record.args().to_string())
        )
    });
    builder.target(Target::Pipe(Box::new(file)));
    builder.try_init().is_ok()
}

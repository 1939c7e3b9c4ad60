//! `env_logger` setup with plain and JSON line formats.

use std::io::{self, Write};

use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies that are chatty at debug level; capped at info.
const QUIET_MODULES: &[&str] = &["reqwest", "hyper", "hyper_util", "axum"];

/// Installs the global logger.
///
/// `RUST_LOG` is applied first and `level` then overrides it for this crate
/// and as the default, so `--log-level` always wins. Fails with
/// [`InitializationError::LoggerError`] when a logger is already installed.
///
/// ```bash
/// RUST_LOG=reqwest=debug ip_country --dataset ./GeoLite2-Country-CSV.zip --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Info.min(level));
    }
    builder.filter_module("ip_country", level);

    match format {
        LogFormat::Json => builder.format(write_json),
        LogFormat::Plain => builder.format(write_plain),
    };

    builder.try_init()?;
    Ok(())
}

// {"ts":<millis>,"level":"WARN","target":"ip_country::index","msg":"..."}
fn write_json(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let msg = serde_json::to_string(&record.args().to_string()).unwrap_or_else(|_| "\"\"".into());
    writeln!(
        buf,
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        chrono::Utc::now().timestamp_millis(),
        record.level(),
        record.target(),
        msg
    )
}

fn write_plain(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let level = record.level().to_string();
    let level = match record.level() {
        Level::Error => level.red(),
        Level::Warn => level.yellow(),
        Level::Info => level.green(),
        Level::Debug => level.blue(),
        Level::Trace => level.purple(),
    };
    writeln!(
        buf,
        "{} {} [{}] {}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        record.target().cyan(),
        level,
        record.args()
    )
}

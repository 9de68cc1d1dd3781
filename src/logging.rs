//! Logging initialization for binaries.
//!
//! Library code logs through the `log` facade; binaries call [`init`] once at
//! startup. Tests install their own capture logger via
//! `env_logger::builder().is_test(true)`.

use env_logger::Env;

/// Initialize the process-wide logger.
///
/// Honors `RUST_LOG`, defaulting to `info`. Returns an error if a logger has
/// already been installed, which callers may ignore with `.ok()`.
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init()
}

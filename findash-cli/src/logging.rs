// findash-cli/src/logging.rs
//! Tracing setup. The dashboard owns the terminal, so log lines go to
//! `findash.log` next to the persisted layout instead of stderr.

use findash_core::LogSettings;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "FINDASH_LOG";
pub const LOG_FILE: &str = "findash.log";

/// `FINDASH_LOG` wins over the settings file; unparsable directives fall back to `info`
pub fn filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(settings: &LogSettings, dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    fmt()
        .with_env_filter(filter(settings))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_directives_parse() {
        for directive in ["info", "findash_core=debug,warn", "trace"] {
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }
}

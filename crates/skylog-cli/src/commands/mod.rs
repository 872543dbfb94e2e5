//! Command implementations for the CLI.

mod configure;
mod delete;
mod edit;
mod export;
mod fetch;
mod info;
mod records;
mod shell;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use skylog_store::Store;
use time::{Date, OffsetDateTime};

use crate::config::{Config, resolve_timeout};
use crate::format::FormatOptions;
use crate::provider::WeatherClient;
use crate::util::open_store;

pub use configure::cmd_config;
pub use delete::{cmd_clear, cmd_delete};
pub use edit::{cmd_edit, record_edit};
pub use export::cmd_export;
pub use fetch::{FetchArgs, cmd_fetch};
pub use info::cmd_info;
pub use records::{cmd_list, cmd_search, cmd_show};
pub use shell::cmd_shell;

/// Settings every command runs with, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub database: PathBuf,
    pub api_key: Option<String>,
    pub opts: FormatOptions,
    pub quiet: bool,
}

impl AppContext {
    /// Open the journal this invocation works on.
    pub fn open_store(&self) -> Result<Store> {
        open_store(&self.database)
    }

    /// Build a weather client, failing early when no API key is set.
    pub fn weather_client(&self, timeout: Option<u64>) -> Result<WeatherClient> {
        let Some(ref api_key) = self.api_key else {
            bail!(
                "No OpenWeather API key configured.\n\
                 Set OPENWEATHER_API_KEY or run 'skylog config set api-key <KEY>'."
            );
        };
        let timeout = Duration::from_secs(resolve_timeout(timeout, &self.config));
        WeatherClient::new(api_key.clone(), timeout, self.config.icon_style)
    }

    /// Print a status line to stderr unless quiet.
    pub fn notify(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

/// Today's date, used for default date ranges and export names.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_client_requires_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context(&dir);
        let err = ctx.weather_client(None).err().unwrap();
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn test_open_store_creates_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context(&dir);
        let store = ctx.open_store().unwrap();
        assert_eq!(store.record_count().unwrap(), 0);
        assert!(ctx.database.exists());
    }
}

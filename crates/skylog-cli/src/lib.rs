//! Command-line weather lookups and a local weather journal.
//!
//! The binary fetches current conditions and a five-day forecast from
//! OpenWeather, and keeps saved lookups in a journal backed by
//! [`skylog_store`].
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Look up the weather for a city or coordinates |
//! | `list` | List saved records, newest first |
//! | `show` | Show one saved record |
//! | `search` | Find records by location, description or date |
//! | `edit` | Change fields of a saved record |
//! | `delete` | Delete one record |
//! | `clear` | Delete every record |
//! | `export` | Export records as JSON, CSV, XML or Markdown |
//! | `info` | Show where the journal lives and how big it is |
//! | `config` | Manage CLI configuration |
//! | `shell` | Interactive session with fetch, save and edit |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! Settings live in `~/.config/skylog/config.toml` (or the platform
//! equivalent): `api_key`, `database`, `icon_style`, `timeout`,
//! `range_days` and `no_color`.
//!
//! # Environment Variables
//!
//! - `OPENWEATHER_API_KEY`: API key, takes precedence over the config file
//! - `SKYLOG_DATABASE`: journal snapshot file (overridden by `--database`)
//! - `NO_COLOR`: disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! skylog fetch "Paris, FR" --save
//! skylog fetch 48.85,2.35 --start 2024-06-01 --end 2024-06-05
//! skylog search paris
//! skylog export csv -o journal.csv
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod provider;
pub mod style;
pub mod util;

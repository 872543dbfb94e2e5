//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use skylog_store::ExportFormat;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Date range given on the command line
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First day of the range (defaults to today)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the range (defaults to today plus the configured range length)
    #[arg(long)]
    pub end: Option<String>,

    /// Do not attach a date range
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub no_range: bool,
}

/// Field changes for a stored record
#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// New temperature in degrees Celsius
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// New condition description
    #[arg(long)]
    pub description: Option<String>,

    /// New humidity percentage (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub humidity: Option<u8>,

    /// New wind speed
    #[arg(long)]
    pub wind_speed: Option<f64>,

    /// New pressure in hPa
    #[arg(long)]
    pub pressure: Option<f64>,

    /// New range start (requires --end)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// New range end (requires --start)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Remove the date range
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub clear_range: bool,
}

#[derive(Parser)]
#[command(name = "skylog")]
#[command(author, version, about = "Weather lookups and a local weather journal", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Journal snapshot file
    #[arg(long, global = true, env = "SKYLOG_DATABASE")]
    pub database: Option<PathBuf>,

    /// Print JSON on one line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up current weather and a five-day forecast
    Fetch {
        /// City name (e.g. "Paris, FR") or "lat,lon"
        location: String,

        #[command(flatten)]
        range: RangeArgs,

        /// Save the lookup to the journal
        #[arg(short, long)]
        save: bool,

        /// Request timeout in seconds (defaults to config)
        #[arg(short = 'T', long)]
        timeout: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List saved records, newest first
    #[command(alias = "ls")]
    List {
        /// Show at most this many records
        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Oldest records first
        #[arg(long)]
        oldest_first: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one saved record
    Show {
        /// Record id
        id: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Find records by location, description or date
    Search {
        /// Text to look for (case-insensitive)
        term: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Change fields of a saved record
    Edit {
        /// Record id
        id: i64,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete one saved record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every saved record
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export all records (json, csv, xml, markdown)
    Export {
        /// Export format
        format: ExportFormat,

        /// Output file (defaults to weather_data_<date>.<ext>; "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show journal location and size
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Start an interactive session
    Shell,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// OpenWeather API key
    ApiKey,
    /// Journal snapshot file
    Database,
    /// Icon style (glyph, provider-code)
    IconStyle,
    /// Request timeout in seconds
    Timeout,
    /// Default date range length in days
    RangeDays,
    /// Disable colored output
    NoColor,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value (empty to unset)
        value: String,
    },
}

/// One line typed into the interactive shell
#[derive(Parser)]
#[command(
    name = "skylog",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands available inside the interactive shell
#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Look up the weather for a location
    Fetch {
        /// City name or "lat,lon"
        #[arg(required = true, num_args = 1..)]
        location: Vec<String>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Save the last lookup (updates the record under edit, if any)
    Save,

    /// Start editing a saved record
    Edit {
        /// Record id
        id: i64,
    },

    /// Apply field changes to the record under edit
    Update {
        #[command(flatten)]
        fields: EditArgs,
    },

    /// Discard the last lookup and stop editing
    Cancel,

    /// List saved records
    #[command(alias = "ls")]
    List {
        /// Show at most this many records
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },

    /// Show one saved record
    Show {
        /// Record id
        id: i64,
    },

    /// Find records (blank shows all)
    Search {
        /// Text to look for
        #[arg(num_args = 0..)]
        term: Vec<String>,
    },

    /// Delete one saved record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every saved record
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export all records
    Export {
        /// Export format
        format: ExportFormat,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what the session holds
    Status,

    /// List shell commands
    Help,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

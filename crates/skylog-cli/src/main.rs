use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use skylog_cli::cli::{Cli, Commands, OutputArgs};
use skylog_cli::commands::{self, AppContext, FetchArgs, today};
use skylog_cli::config::{Config, resolve_api_key, resolve_database};
use skylog_cli::format::FormatOptions;
use skylog_cli::util::resolve_range;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "skylog", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let ctx = AppContext {
        database: resolve_database(cli.database, &config),
        api_key: resolve_api_key(std::env::var("OPENWEATHER_API_KEY").ok(), &config),
        opts: FormatOptions::new(no_color).with_compact(cli.compact),
        quiet: cli.quiet,
        config,
    };
    tracing::debug!("Using journal at {}", ctx.database.display());

    match cli.command {
        Commands::Fetch {
            location,
            range,
            save,
            timeout,
            output: OutputArgs { format },
        } => {
            let range = resolve_range(&range, today(), ctx.config.range_days)?;
            commands::cmd_fetch(
                &ctx,
                FetchArgs {
                    location,
                    range,
                    save,
                    timeout,
                    format,
                },
            )
            .await
        }
        Commands::List {
            limit,
            oldest_first,
            output,
        } => commands::cmd_list(&ctx, limit, oldest_first, output.format),
        Commands::Show { id, output } => commands::cmd_show(&ctx, id, output.format),
        Commands::Search { term, output } => commands::cmd_search(&ctx, &term, output.format),
        Commands::Edit { id, fields } => commands::cmd_edit(&ctx, id, &fields),
        Commands::Delete { id, yes } => commands::cmd_delete(&ctx, id, yes),
        Commands::Clear { yes } => commands::cmd_clear(&ctx, yes),
        Commands::Export { format, output } => commands::cmd_export(&ctx, format, output),
        Commands::Info => commands::cmd_info(&ctx),
        Commands::Config { action } => commands::cmd_config(action, no_color),
        Commands::Shell => commands::cmd_shell(&ctx).await,
        Commands::Completions { .. } => Ok(()),
    }
}

//! Interactive journal shell.
//!
//! Keeps one [`Session`] alive across lines so a lookup can be saved later,
//! and a saved record can be opened, changed and committed in steps.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use skylog_store::{Session, Store};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::edit::record_edit;
use super::export::export_records;
use super::fetch::{lookup, saved_message};
use super::records::{render_list, render_search, render_show};
use super::{AppContext, today};
use crate::cli::{OutputFormat, ShellCommand, ShellLine};
use crate::format::{format_record_text, format_snapshot_text};
use crate::style;
use crate::util::{confirm, resolve_range};

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Print(String),
    Quit,
}

struct Shell<'a> {
    ctx: &'a AppContext,
    store: Store,
    session: Session,
}

pub async fn cmd_shell(ctx: &AppContext) -> Result<()> {
    let mut shell = Shell {
        ctx,
        store: ctx.open_store()?,
        session: Session::new(),
    };

    let interactive = io::stdin().is_terminal();
    if interactive {
        eprintln!(
            "{}",
            style::format_info("Weather journal shell. Type 'help' for commands.", ctx.opts.no_color)
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            eprint!("{}> ", shell.prompt());
            io::stderr().flush()?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match shell.run_line(&line).await {
            Ok(Step::Print(text)) => {
                print!("{}", text);
                io::stdout().flush()?;
            }
            Ok(Step::Quit) => break,
            Err(e) => eprintln!("{}", style::format_warning(&format!("{:#}", e), ctx.opts.no_color)),
        }
    }
    Ok(())
}

impl Shell<'_> {
    fn prompt(&self) -> String {
        match self.session.editing() {
            Some(id) => format!("skylog [edit #{}]", id),
            None => "skylog".to_string(),
        }
    }

    async fn run_line(&mut self, line: &str) -> Result<Step> {
        let words = split_line(line)?;
        if words.is_empty() {
            return Ok(Step::Print(String::new()));
        }
        debug!("shell command: {:?}", words);

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => bail!("{}", e.render().to_string().trim_end()),
        };
        self.execute(parsed.command).await
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<Step> {
        let ctx = self.ctx;
        let no_color = ctx.opts.no_color;
        let opts = &ctx.opts;

        let text = match command {
            ShellCommand::Fetch { location, range } => {
                let location = location.join(" ");
                let range = resolve_range(&range, today(), ctx.config.range_days)?;
                let snapshot = lookup(ctx, &location, range, None).await?;
                let text = format_snapshot_text(&snapshot, opts);
                self.session.set_fetched(snapshot);
                text
            }
            ShellCommand::Save => {
                let outcome = self.session.save(&self.store)?;
                format!("{}\n", saved_message(outcome, no_color))
            }
            ShellCommand::Edit { id } => {
                let record = self.session.begin_edit(&self.store, id)?;
                format!(
                    "{}\n{}",
                    style::format_info(
                        &format!("Editing record {}. Use 'update' to change fields, 'cancel' to discard.", id),
                        no_color
                    ),
                    format_record_text(&record, opts)
                )
            }
            ShellCommand::Update { fields } => {
                let edit = record_edit(&fields)?;
                let record = self.session.commit_edit(&self.store, &edit)?;
                format!(
                    "{}\n{}",
                    style::format_success(&format!("Updated record {}", record.id), no_color),
                    format_record_text(&record, opts)
                )
            }
            ShellCommand::Cancel => match self.session.cancel() {
                Some(id) => format!(
                    "{}\n",
                    style::format_info(&format!("Discarded lookup and stopped editing record {}", id), no_color)
                ),
                None => format!("{}\n", style::format_info("Discarded the last lookup.", no_color)),
            },
            ShellCommand::List { limit } => render_list(&self.store, limit, false, OutputFormat::Text, opts)?,
            ShellCommand::Show { id } => render_show(&self.store, id, OutputFormat::Text, opts)?,
            ShellCommand::Search { term } => {
                render_search(&self.store, &term.join(" "), OutputFormat::Text, opts)?
            }
            ShellCommand::Delete { id, yes } => {
                let Some(record) = self.store.get_record(id)? else {
                    bail!("Record {} not found", id);
                };
                if !confirm(&format!("Delete record {} ({})?", id, record.location), yes)? {
                    return Ok(Step::Print("Cancelled.\n".to_string()));
                }
                self.store.delete_record(id)?;
                if self.session.editing() == Some(id) {
                    self.session.stop_edit();
                }
                format!("{}\n", style::format_success(&format!("Deleted record {}", id), no_color))
            }
            ShellCommand::Clear { yes } => {
                let count = self.store.record_count()?;
                if count == 0 {
                    return Ok(Step::Print(format!(
                        "{}\n",
                        style::format_info("The journal is already empty.", no_color)
                    )));
                }
                if !confirm(&format!("Delete ALL {} saved records?", count), yes)? {
                    return Ok(Step::Print("Cancelled.\n".to_string()));
                }
                let removed = self.store.delete_all_records()?;
                self.session.stop_edit();
                format!("{}\n", style::format_success(&format!("Deleted {} records", removed), no_color))
            }
            ShellCommand::Export { format, output } => match export_records(&self.store, format, output)? {
                Some(path) => format!(
                    "{}\n",
                    style::format_success(&format!("Exported {} to {}", format, path.display()), no_color)
                ),
                None => String::new(),
            },
            ShellCommand::Status => self.status()?,
            ShellCommand::Help => ShellLine::command().render_help().to_string(),
            ShellCommand::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Print(text))
    }

    fn status(&self) -> Result<String> {
        let mut out = String::new();
        match self.session.fetched() {
            Some(snapshot) => out.push_str(&format!(
                "Last lookup: {} ({:.1}°C, {})\n",
                snapshot.location, snapshot.current.temperature, snapshot.current.description
            )),
            None => out.push_str("Last lookup: none\n"),
        }
        match self.session.editing() {
            Some(id) => out.push_str(&format!("Editing:     record {}\n", id)),
            None => out.push_str("Editing:     nothing\n"),
        }
        out.push_str(&format!("Records:     {}\n", self.store.record_count()?));
        Ok(out)
    }
}

/// Split a shell line into words, honoring single and double quotes.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => bail!("Trailing backslash"),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_word = true;
                }
                None => bail!("Trailing backslash"),
            },
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        bail!("Unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

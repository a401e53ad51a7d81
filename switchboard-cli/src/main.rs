//! Interactive console for the Switchboard command engine.
//!
//! Reads lines from stdin, dispatches them through a [`CommandTable`] of
//! demonstration commands, and renders help, usage errors and permission
//! refusals with the terminal renderer.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, error, info};

use switchboard_core::{CommandTable, Invoker, VERSION};

mod commands;
mod config;
mod host;
mod render;

use config::ConsoleConfig;
use host::ConsoleHost;
use render::TermRenderer;

#[derive(Parser)]
#[command(name = "switchboard", version = VERSION, about = "Switchboard interactive console")]
struct Cli {
    /// Path to a toml configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Run as a console invoker instead of an interactive one; help output
    /// is not word-wrapped
    #[arg(long)]
    plain: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        "switchboard_cli=debug,switchboard_core=debug"
    } else {
        "switchboard_cli=info,switchboard_core=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };

    let host = Arc::new(ConsoleHost::from_config(&config));
    let renderer = Arc::new(TermRenderer::new());

    let mut table = CommandTable::new();
    commands::register_all(
        &mut table,
        &config,
        cli.config.as_deref(),
        host.clone(),
        renderer,
    )?;
    info!(commands = table.names().len(), "console ready");

    let invoker = if cli.plain {
        Invoker::console("console")
    } else {
        Invoker::interactive("operator")
    };

    println!("Switchboard {} — type a command, ':complete <line>' or ':quit'", VERSION);
    println!("Registered: {}", table.names().join(", "));

    repl(&table, &invoker, &config.prompt)?;

    host.shut_down();
    Ok(())
}

fn repl(table: &CommandTable, invoker: &Invoker, prompt: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" || line == ":q" || line == "exit" {
            break;
        }
        if let Some(partial) = line.strip_prefix(":complete") {
            show_completions(table, invoker, partial.trim_start());
            continue;
        }

        dispatch(table, invoker, line);
    }

    Ok(())
}

fn dispatch(table: &CommandTable, invoker: &Invoker, line: &str) {
    debug!(%line, "dispatching");
    match table.dispatch_line(invoker, line) {
        Ok(Some(ok)) => debug!(%line, ok, "dispatched"),
        Ok(None) => {
            println!(
                "{} {}",
                "Unknown command.".red(),
                format!("Known: {}", table.names().join(", ")).dimmed()
            );
        }
        // A handler or completer crashed; report it and keep the console up.
        Err(err) => {
            error!(%line, "command failed: {err:#}");
            println!("{}", format!("{err:#}").red());
        }
    }
}

fn show_completions(table: &CommandTable, invoker: &Invoker, partial: &str) {
    match table.complete_line(invoker, partial) {
        Ok(Some(candidates)) => println!("{}", candidates.join("  ")),
        Ok(None) => println!("{}", "(no candidates)".dimmed()),
        Err(err) => println!("{}", format!("{err:#}").red()),
    }
}

//! Interactive explorer shell.
//!
//! # Responsibility
//! - Parse process flags, start logging and load optional configuration.
//! - Seed the demo tree and run the read-eval-print loop on stdin.

mod shell;

use clap::Parser;
use explorer_core::{default_log_level, init_logging, ExplorerConfig, TreeService};
use log::{info, warn};
use shell::{seed_demo_tree, Command, Shell};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// In-memory file explorer shell.
#[derive(Debug, Parser)]
#[command(name = "explorer", version)]
struct Cli {
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
    /// Directory for rolling log files; logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// JSON file with explorer configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start with an empty root instead of the demo tree.
    #[arg(long)]
    empty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = init_logging(&cli.log_level, &absolute(log_dir)) {
            eprintln!("explorer: {err}");
            return ExitCode::from(2);
        }
    }

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(message) => {
            eprintln!("explorer: {message}");
            return ExitCode::from(2);
        }
    };

    let mut service = match TreeService::in_memory(config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("explorer: invalid config: {err}");
            return ExitCode::from(2);
        }
    };
    if !cli.empty {
        if let Err(err) = seed_demo_tree(&mut service) {
            eprintln!("explorer: cannot seed demo tree: {err}");
            return ExitCode::FAILURE;
        }
    }
    info!(
        "event=shell_start module=cli status=ok nodes={}",
        service.node_count()
    );

    match run(Shell::new(service)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("explorer: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(mut shell: Shell) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "{}", shell.prompt())?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(stdout, "error: {err}")?;
                continue;
            }
        };
        if command == Command::Exit {
            break;
        }
        match shell.execute(&command) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(err) => {
                warn!(
                    "event=shell_command module=cli status=error command={}",
                    command.label()
                );
                writeln!(stdout, "error: {err}")?;
            }
        }
    }

    info!(
        "event=shell_exit module=cli status=ok nodes={}",
        shell.service().node_count()
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<ExplorerConfig, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read config `{}`: {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("cannot parse config `{}`: {err}", path.display()))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use deepwork::cli::args::{Cli, Commands};
use deepwork::cli::commands;
use deepwork::config::{Config, Paths};
use deepwork::features::session::SessionStore;
use deepwork::logging::{init_logging, level_for};
use deepwork::storage::SqliteKv;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor storage
    if let Some(Commands::Completions { shell }) = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let paths = Paths::resolve(cli.home.clone())?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    paths.ensure_dirs()?;
    let command = cli.command.unwrap_or(Commands::Run);
    let interactive = matches!(command, Commands::Run);
    init_logging(
        level_for(cli.verbose, &config.logging.level),
        interactive.then_some(paths.log_file.as_path()),
    )
    .context("Failed to set up logging")?;

    let kv = SqliteKv::open_at(&paths.database)
        .with_context(|| format!("Failed to open history at {}", paths.database.display()))?;
    let mut store = SessionStore::load(kv, config.storage.key.clone());

    let output = match command {
        Commands::Run => {
            deepwork::tui::run(store)?;
            String::new()
        }
        Commands::History { limit } => commands::history(&store, limit, format)?,
        Commands::Stats => commands::stats(&store, format)?,
        Commands::Export { format: kind, file } => {
            commands::export(&store, kind, file, &config.export.directory, format)?
        }
        Commands::Import { file } => commands::import(&mut store, &file, format)?,
        Commands::Clear { force } => commands::clear(&mut store, force, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

use textman::cli::{CliArgs, StartupConfig, StartupMode};
use textman::plugin::PluginListing;
use textman::repl::{self, Session};
use textman::{CommandOutput, Settings, TextEngine};

/// defaults < config file < environment < CLI flags
fn load_settings(args: &CliArgs) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(explicit) => Settings::load_from_file(explicit)
            .with_context(|| format!("Failed to load settings from {}", explicit.display()))?,
        None => Settings::load(),
    };
    settings.apply_env(|key| std::env::var(key).ok());

    if let Some(dir) = textman::config_paths::plugins_dir() {
        if dir.is_dir() && !settings.plugin_search_paths.contains(&dir) {
            settings.plugin_search_paths.insert(0, dir);
        }
    }
    Ok(settings)
}

fn list_plugins(engine: &TextEngine, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let listing = engine.list_plugins(true);
    if json {
        serde_json::to_writer_pretty(&mut stdout, &listing)
            .context("Failed to serialize plugin list")?;
        writeln!(stdout)?;
    } else if let PluginListing::ByCategory(grouped) = listing {
        repl::write_grouped(&mut stdout, &grouped)?;
    }
    Ok(())
}

fn execute(engine: &mut TextEngine, config: &StartupConfig, command: &str) -> Result<()> {
    let output = engine
        .execute_command(command)
        .with_context(|| format!("Command failed: {}", command))?;

    match (&output, &config.settings.output) {
        (CommandOutput::Text(_), Some(path)) => {
            engine
                .save_file(Some(path.as_path()), &config.settings.encoding)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Result written to {}", path.display());
        }
        (CommandOutput::Statistics(stats), _) if config.json => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, stats)
                .context("Failed to serialize statistics")?;
            writeln!(stdout)?;
        }
        _ => println!("{}", output),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    match args.log_directive() {
        Ok(level) => textman::tracing::init(level),
        Err(e) => bail!(e),
    }

    let settings = load_settings(&args)?;
    let config = match args.into_config(settings) {
        Ok(config) => config,
        Err(e) => bail!(e),
    };
    tracing::debug!("Startup settings: {:?}", config.settings);

    let mut engine = TextEngine::from_settings(&config.settings);

    if let Some(file) = &config.settings.file {
        engine
            .load_file(file, &config.settings.encoding)
            .with_context(|| format!("Failed to load {}", file.display()))?;
    }

    match &config.mode {
        StartupMode::ListPlugins => list_plugins(&engine, config.json),
        StartupMode::Execute(command) => execute(&mut engine, &config, command),
        StartupMode::Interactive => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let mut session = Session::new(&mut engine, stdin.lock(), io::stdout())
                .with_encoding(config.settings.encoding.clone())
                .with_prompt(interactive);
            session.run().context("Session I/O failed")
        }
    }
}

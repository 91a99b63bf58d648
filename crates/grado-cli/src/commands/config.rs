//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use grado_core::models::config::GradoConfig;
use grado_core::DocumentSlot;

use super::{default_config_path, load_config};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective thresholds and sources
    Show {
        /// Print the full configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(),
    }
}

fn show_config(config_path: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    print_summary(&config);
    Ok(())
}

fn print_summary(config: &GradoConfig) {
    let dictionaries = &config.dictionaries.dir;
    let dir_status = if dictionaries.is_dir() {
        style("found").green()
    } else {
        style("missing, using built-in lists").yellow()
    };
    println!("{}", style("Dictionaries").bold());
    println!("  {} ({})", dictionaries.display(), dir_status);

    let validation = &config.validation;
    println!();
    println!("{}", style("Validation").bold());
    println!("  minimum file size     {:>8} bytes", validation.min_file_size);
    println!("  keyword matches       {:>8}", validation.min_keyword_matches);
    for slot in DocumentSlot::ALL {
        let threshold = validation.min_size_for(slot);
        let marker = if validation.min_sizes.contains_key(&slot) { "" } else { " (default)" };
        println!("  {:<21} {:>8} bytes{}", slot.key(), threshold, marker);
    }

    println!();
    println!("{}", style("OCR").bold());
    match &config.ocr.model_dir {
        Some(dir) => println!("  image models          {}", dir.display()),
        None => println!("  image models          {}", style("disabled").yellow()),
    }

    println!();
    println!("{}", style("Downloads").bold());
    println!("  timeout               {:>8} s", config.download.timeout_secs);
    let token = if std::env::var_os(&config.download.access_token_env).is_some() {
        style("set").green()
    } else {
        style("not set, public URLs only").yellow()
    };
    println!("  {:<21} {}", config.download.access_token_env, token);
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    GradoConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'grado config init' to create a configuration file.");
    }

    Ok(())
}

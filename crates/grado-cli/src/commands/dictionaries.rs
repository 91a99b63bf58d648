//! Dictionaries command - inspect keyword dictionaries.

use clap::{Args, Subcommand};
use console::style;

use grado_core::{DictionaryStore, DocumentSlot};

use super::load_config;

/// Arguments for the dictionaries command.
#[derive(Args)]
pub struct DictionariesArgs {
    #[command(subcommand)]
    command: DictionariesCommand,
}

#[derive(Subcommand)]
enum DictionariesCommand {
    /// Show the keywords used for a slot
    Show {
        /// Document slot (cedula, prueba_tt, icfes, ...) or "instituciones"
        slot: String,
    },

    /// Load every dictionary and report its size
    Preload,
}

pub async fn run(args: DictionariesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = DictionaryStore::from_config(&config.dictionaries);

    match args.command {
        DictionariesCommand::Show { slot } => show(&store, &slot),
        DictionariesCommand::Preload => preload(&store),
    }
}

fn show(store: &DictionaryStore, slot: &str) -> anyhow::Result<()> {
    let (name, keywords) = if slot == "instituciones" {
        (
            grado_core::dictionary::INSTITUTIONS_FILE,
            store.get_institution_dictionary(),
        )
    } else {
        let slot: DocumentSlot = slot.parse().map_err(anyhow::Error::msg)?;
        (slot.dictionary_file(), store.get_dictionary(slot))
    };

    let source = if store.dir().join(name).is_file() {
        store.dir().join(name).display().to_string()
    } else {
        "built-in".to_string()
    };

    println!("{} ({}, {} keywords)", style(name).bold(), source, keywords.len());
    for keyword in keywords.iter() {
        println!("  {}", keyword);
    }

    Ok(())
}

fn preload(store: &DictionaryStore) -> anyhow::Result<()> {
    store.preload_all();

    for slot in DocumentSlot::ALL {
        println!(
            "{} {:<20} {:>3} keywords  {}",
            style("✓").green(),
            slot.key(),
            store.get_dictionary(slot).len(),
            slot.dictionary_file()
        );
    }
    println!(
        "{} {:<20} {:>3} variants  {}",
        style("✓").green(),
        "instituciones",
        store.get_institution_dictionary().len(),
        grado_core::dictionary::INSTITUTIONS_FILE
    );
    println!();
    println!("{} dictionaries cached", store.cached_count());

    Ok(())
}

//! Directory command - query and extend the BIC table.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use console::style;

use mtscan_core::{BicDirectory, BicEntry};

use super::context::{bic_source, load_config};

/// Arguments for the directory command.
#[derive(Args)]
pub struct DirectoryArgs {
    /// BIC table (CSV)
    #[arg(long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: DirectoryCommand,
}

#[derive(Subcommand)]
enum DirectoryCommand {
    /// Show the bank behind a BIC code
    Lookup {
        /// BIC code (8 or 11 characters)
        code: String,
    },

    /// Add a mapping to the table
    Add {
        /// BIC code (8 or 11 characters)
        code: String,
        /// Bank name
        name: String,
        /// ISO3 country code
        country: String,
    },

    /// Show table statistics
    Stats,
}

pub async fn run(args: DirectoryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = bic_source(&config, args.directory.as_deref());

    match args.command {
        DirectoryCommand::Lookup { code } => {
            let directory = BicDirectory::new(source);
            match directory.lookup(&code)? {
                Some(entry) => print_entry(&entry),
                None => anyhow::bail!("Code {} is not in the BIC table", code.trim().to_uppercase()),
            }
        }
        DirectoryCommand::Add { code, name, country } => {
            let entry = BicEntry::new(&code, &name, Some(&country));
            let source = Arc::new(source);
            let path = source.path().to_path_buf();
            let directory = BicDirectory::new(Arc::clone(&source));

            if path.exists() {
                if let Some(existing) = directory.lookup(&entry.code)? {
                    anyhow::bail!("Code {} is already mapped to {}", existing.code, existing.name);
                }
            }

            source.append(&entry)?;
            directory.invalidate_and_reload();

            let Some(added) = directory.lookup(&entry.code)? else {
                anyhow::bail!("Code {} was written but could not be read back", entry.code);
            };

            println!(
                "{} Added {} to {}",
                style("✓").green(),
                added.code,
                path.display()
            );
            print_entry(&added);
        }
        DirectoryCommand::Stats => {
            let path = source.path().to_path_buf();
            let snapshot = BicDirectory::new(source).snapshot()?;

            println!("BIC table: {}", path.display());
            println!("Entries: {}", snapshot.len());
            println!("With country: {}", snapshot.with_country());
        }
    }

    Ok(())
}

fn print_entry(entry: &BicEntry) {
    println!("{}", style(&entry.code).bold());
    println!("  Name: {}", entry.name);
    println!("  Country: {}", entry.country.as_deref().unwrap_or("-"));
}

#![warn(missing_docs)]

//! Entry point for the `tilespace` binary.

mod cli;
mod error;
mod inspect;
mod simulate;

use std::{
    io::{self, Write},
    process,
};

use clap::Parser;
use spaces::{JsonFileStore, Settings, StoreBackend};
use tracing::error;

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log.spec());

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let store_path = cli.store_path();
    let backend = JsonFileStore::new(&store_path);
    let mut out = io::stdout().lock();

    match &cli.command {
        Commands::List => inspect::list(&backend.load()?, &mut out),
        Commands::Show(args) => inspect::show(&backend.load()?, args, &mut out),
        Commands::Clear(args) => {
            let removed = inspect::clear(&backend, args)?;
            writeln!(out, "{removed} space(s) removed from {}", store_path.display())?;
            Ok(())
        }
        Commands::Rename(args) => {
            let changed = inspect::rename(&backend, args)?;
            writeln!(out, "{changed} space(s) renamed in {}", store_path.display())?;
            Ok(())
        }
        Commands::Simulate(args) => simulate::run(args, settings, &store_path),
    }
}

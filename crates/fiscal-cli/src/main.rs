mod cli;
mod commands;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::Format;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let format = if cli.json { Format::Json } else { Format::Text };
    let output = match cli.command {
        Command::Year(args) => commands::year(args, format),
        Command::Quarter(args) => commands::quarter(args, format),
        Command::Period(args) => commands::period(args, format),
        Command::Classify(args) => commands::classify(args, format),
        Command::Calendar(args) => commands::calendar(args, format),
    }?;
    println!("{output}");
    Ok(())
}

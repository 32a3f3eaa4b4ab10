//! `custom-mailer` entry-point: parse flags, load defaults, run a workflow.

use std::io;

use clap::Parser;

use custom_mailer::cli::{CommandLine, Commands};
use custom_mailer::credentials::MemoryCredentials;
use custom_mailer::custom::CustomMailer;
use custom_mailer::error::Result;
use custom_mailer::example::{load_factory, run_example, write_bindings_to};
use custom_mailer::logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let cli = CommandLine::parse();
    logging::init()?;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Example(command) => {
            let factory = load_factory(&cli.globals)?;
            run_example(&mut stdout, &factory, &command)?;
        }
        Commands::Bindings => {
            let variant = CustomMailer::new(MemoryCredentials::default());
            write_bindings_to(&mut stdout, &variant)?;
        }
    }
    Ok(())
}

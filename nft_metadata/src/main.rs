//! CLI entrypoint for `nft-metadata`.

use std::io;

use clap::Parser;
use nft_metadata::cli::{Cli, Command};
use nft_metadata::error::Result;
use nft_metadata::{PassReport, RunConfig, generate_metadata, load_config, logging, update_image_uris};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;
    let config = load_config(&cli.globals)?;
    tracing::debug!(?config, "resolved configuration");

    let mut stdout = io::stdout().lock();
    match cli.command() {
        Command::Generate => finish(generate_metadata(&config, &mut stdout)?)?,
        Command::Update => finish(update_image_uris(&config, &mut stdout)?)?,
        Command::Run => run_both(&config, &mut stdout)?,
    }
    Ok(())
}

/// Runs the generator to completion, then the updater over its output.
///
/// Under `keep-going` the updater still runs when some entries failed to
/// generate; both reports are summarised afterwards.
fn run_both(config: &RunConfig, stdout: &mut impl io::Write) -> Result<()> {
    let generated = generate_metadata(config, stdout)?;
    let updated = update_image_uris(config, stdout)?;
    finish(generated)?;
    finish(updated)
}

fn finish(report: PassReport) -> Result<()> {
    for failure in report.failures() {
        tracing::error!(pass = %report.pass(), entry = %failure.entry, "{}", failure.reason);
    }
    report.into_result().map(|_| ())
}

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use dialog_session::resource::PropCatalog;
use dialog_session::script::ScriptBook;
use dialog_session::{config, logging, log_error, log_info, Cli, Conversation};

fn run(cli: &Cli) -> Result<()> {
    // Load configuration file, then let the command line override it
    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;

    logging::init_logging(options.log_level)?;
    log_info!("Dialogue session starting");

    let catalog_path = options
        .catalog
        .as_deref()
        .context("No message catalog given (use --catalog)")?;
    let script_path = options
        .script
        .as_deref()
        .context("No script book given (use --script)")?;

    let catalog = PropCatalog::load(Path::new(catalog_path))
        .with_context(|| format!("Failed to load message catalog {}", catalog_path))?;
    let book = ScriptBook::load(Path::new(script_path))
        .with_context(|| format!("Failed to load script book {}", script_path))?;
    log_info!(
        "Loaded {} messages and {} infos",
        catalog.len(),
        book.len()
    );

    let conversation = Conversation::new(Arc::new(catalog), Arc::new(book), &options)?;
    let transcript = conversation.run()?;
    print!("{}", transcript);
    log_info!("Dialogue finished after {} ticks", transcript.ticks);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_journal::config::Command;
use notion_journal::{
    server, CommandLineInput, JournalConfig, JournalService, SaveRequest,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_journal.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Log to stderr so JSON printed by `read` stays clean on stdout.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

async fn run(command: Command, config: &JournalConfig) -> anyhow::Result<()> {
    let service = JournalService::connect(config)?;

    match command {
        Command::Save {
            text,
            title,
            rating,
            date,
        } => {
            let saved = service
                .save(SaveRequest {
                    text,
                    title,
                    rating,
                    date,
                })
                .await
                .context("Saving entry failed")?;
            println!("✓ Saved entry {}", saved.id);
        }
        Command::Read { limit, sort } => {
            let entries = service
                .read_entries(limit, sort)
                .await
                .context("Reading entries failed")?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Serve { bind } => {
            server::serve(Arc::new(service), &bind).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = JournalConfig::resolve(&cli.store)?;

    run(cli.command, &config).await
}

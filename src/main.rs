// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use podfetch::{
    CommandDownloader, Config, ConsoleStream, DownloaderConfig, ProgressEvent, ProgressReporter,
    SharedProgressReporter, console_line, run,
};

static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Download every episode of an RSS podcast feed
#[derive(Parser, Debug)]
#[command(name = "podfetch")]
#[command(about = "Download every episode of an RSS podcast feed")]
#[command(version)]
struct Args {
    /// Path to the RSS feed file (reads standard input when omitted)
    feed: Option<PathBuf>,

    /// Directory to change into before downloading
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Progress reporter printing to the terminal
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match console_line(&event) {
            Some((ConsoleStream::Stdout, line)) => println!("{line}"),
            Some((ConsoleStream::Stderr, line)) => eprintln!("{line}"),
            None => {}
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = Config {
        feed_path: args.feed,
        output_dir: args.output_dir,
    };
    let downloader = CommandDownloader::from_config(&DownloaderConfig::from_env());
    let reporter: SharedProgressReporter = Arc::new(ConsoleReporter);

    let summary = run(config, &downloader, &reporter)
        .await
        .context("Failed to download podcasts")?;

    if !summary.failed_entries.is_empty() {
        eprintln!("\n{}", "Failed episodes:".red().bold());
        for (title, error) in &summary.failed_entries {
            eprintln!(
                "  {}{} - {}",
                CROSS,
                title.yellow(),
                error.dimmed()
            );
        }
    }

    if let Some(err) = summary.interruption {
        return Err(err).context("Reading the feed stopped early");
    }

    Ok(())
}

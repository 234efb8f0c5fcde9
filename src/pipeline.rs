// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use tokio::io::AsyncBufRead;
use tracing::{error, info};

use crate::config::Config;
use crate::download::Downloader;
use crate::error::{FeedError, RunError};
use crate::feed::{FeedEntries, FeedSource};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Result of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of downloads attempted
    pub attempted: usize,
    /// Number of downloads that failed
    pub failed: usize,
    /// Number of feed items skipped because they could not be decoded
    pub skipped: usize,
    /// Details of failed downloads (title, error message)
    pub failed_entries: Vec<(String, String)>,
    /// Set when malformed XML ended the extraction before the end of the feed
    pub interruption: Option<FeedError>,
}

/// Download every episode of a feed
///
/// This is the main entry point for the library. It:
/// 1. Changes into the output directory, if one is configured
/// 2. Opens the feed source
/// 3. Extracts entries one by one, downloading each before reading the next
///
/// Failing downloads are counted, never fatal. Only an unusable output
/// directory or feed source makes this return an error.
pub async fn run<D: Downloader>(
    config: Config,
    downloader: &D,
    reporter: &SharedProgressReporter,
) -> Result<RunSummary, RunError> {
    if let Some(dir) = &config.output_dir {
        std::env::set_current_dir(dir).map_err(|e| RunError::Initialization {
            path: dir.clone(),
            source: e,
        })?;
        info!(dir = %dir.display(), "Changed into output directory");
    }

    let source = FeedSource::from_path(config.feed_path);
    let reader = source.open().await?;

    reporter.report(ProgressEvent::FeedOpened {
        source: source.to_string(),
    });

    let mut entries = FeedEntries::new(reader);
    Ok(download_entries(&mut entries, downloader, reporter).await)
}

/// Drive the downloader over all remaining entries
///
/// Entries are processed strictly one after another. The summary is reported
/// even when malformed XML cuts the feed short.
pub async fn download_entries<R, D>(
    entries: &mut FeedEntries<R>,
    downloader: &D,
    reporter: &SharedProgressReporter,
) -> RunSummary
where
    R: AsyncBufRead + Unpin,
    D: Downloader,
{
    let mut summary = RunSummary::default();

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!("Feed extraction stopped: {e}");
                summary.interruption = Some(e);
                break;
            }
        };

        summary.attempted += 1;

        reporter.report(ProgressEvent::DownloadStarting {
            title: entry.title.clone(),
        });

        match downloader.download(&entry.media_url).await {
            Ok(()) => reporter.report(ProgressEvent::DownloadCompleted { title: entry.title }),
            Err(e) => {
                error!(title = %entry.title, url = %entry.media_url, "Download failed: {e}");
                summary.failed += 1;
                summary
                    .failed_entries
                    .push((entry.title.clone(), e.to_string()));
                reporter.report(ProgressEvent::DownloadFailed {
                    title: entry.title,
                    error: e.to_string(),
                });
            }
        }
    }

    summary.skipped = entries.skipped();

    reporter.report(ProgressEvent::RunCompleted {
        failed: summary.failed,
        skipped: summary.skipped,
    });

    summary
}

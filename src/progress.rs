// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use colored::Colorize;
use console::Emoji;

// Emoji with fallback for terminals without Unicode support
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");

/// Events emitted while a feed is being downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The feed source was opened successfully
    FeedOpened { source: String },

    /// A download is about to start
    DownloadStarting { title: String },

    /// The downloader finished successfully
    DownloadCompleted { title: String },

    /// The downloader failed to start or exited unsuccessfully
    DownloadFailed { title: String, error: String },

    /// All entries have been processed
    RunCompleted { failed: usize, skipped: usize },
}

/// Trait for reporting progress events during a run.
///
/// Implementations can use this to print console output, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Which console stream a line belongs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Render the console output for an event, if it has any
///
/// Failures go to stderr so they never mix with normal output.
pub fn console_line(event: &ProgressEvent) -> Option<(ConsoleStream, String)> {
    match event {
        ProgressEvent::FeedOpened { source } => Some((
            ConsoleStream::Stdout,
            format!("{SEARCH}Reading feed from {}", source.cyan()),
        )),

        ProgressEvent::DownloadStarting { title } => Some((
            ConsoleStream::Stdout,
            format!("Downloading '{}'", title.bold()),
        )),

        ProgressEvent::DownloadCompleted { .. } => None,

        ProgressEvent::DownloadFailed { title, error } => Some((
            ConsoleStream::Stderr,
            format!(
                "{} '{}': {}",
                "Download failed:".red().bold(),
                title.yellow(),
                error.red()
            ),
        )),

        ProgressEvent::RunCompleted { failed, skipped } => {
            let count = if *failed > 0 {
                failed.to_string().red().bold()
            } else {
                failed.to_string().green()
            };
            let mut line = format!("Finished downloading podcasts. ({count} downloads failed)");
            if *skipped > 0 {
                line.push_str(&format!(
                    "\n{} feed entries without a usable media URL were skipped",
                    skipped.to_string().yellow()
                ));
            }
            Some((ConsoleStream::Stdout, line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_line(event: ProgressEvent) -> Option<(ConsoleStream, String)> {
        colored::control::set_override(false);
        console_line(&event)
    }

    #[test]
    fn noop_reporter_handles_all_events() {
        let reporter = NoopReporter::shared();

        reporter.report(ProgressEvent::FeedOpened {
            source: "standard input".to_string(),
        });

        reporter.report(ProgressEvent::DownloadStarting {
            title: "Episode 1".to_string(),
        });

        reporter.report(ProgressEvent::DownloadCompleted {
            title: "Episode 1".to_string(),
        });

        reporter.report(ProgressEvent::DownloadFailed {
            title: "Episode 2".to_string(),
            error: "wget failed with exit status: 8".to_string(),
        });

        reporter.report(ProgressEvent::RunCompleted {
            failed: 1,
            skipped: 0,
        });
    }

    #[test]
    fn announces_each_download_on_stdout() {
        let line = plain_line(ProgressEvent::DownloadStarting {
            title: "Episode 1".to_string(),
        });

        assert_eq!(
            line,
            Some((ConsoleStream::Stdout, "Downloading 'Episode 1'".to_string()))
        );
    }

    #[test]
    fn reports_failures_on_stderr() {
        let line = plain_line(ProgressEvent::DownloadFailed {
            title: "Episode 2".to_string(),
            error: "wget failed with exit status: 8".to_string(),
        });

        assert_eq!(
            line,
            Some((
                ConsoleStream::Stderr,
                "Download failed: 'Episode 2': wget failed with exit status: 8".to_string()
            ))
        );
    }

    #[test]
    fn summarizes_failed_downloads() {
        let line = plain_line(ProgressEvent::RunCompleted {
            failed: 2,
            skipped: 0,
        });

        assert_eq!(
            line,
            Some((
                ConsoleStream::Stdout,
                "Finished downloading podcasts. (2 downloads failed)".to_string()
            ))
        );
    }

    #[test]
    fn summary_mentions_skipped_entries() {
        let (stream, text) = plain_line(ProgressEvent::RunCompleted {
            failed: 0,
            skipped: 3,
        })
        .unwrap();

        assert_eq!(stream, ConsoleStream::Stdout);
        assert_eq!(
            text,
            "Finished downloading podcasts. (0 downloads failed)\n\
             3 feed entries without a usable media URL were skipped"
        );
    }

    #[test]
    fn names_the_feed_source() {
        let (stream, text) = plain_line(ProgressEvent::FeedOpened {
            source: "podcasts/feed.xml".to_string(),
        })
        .unwrap();

        assert_eq!(stream, ConsoleStream::Stdout);
        assert!(text.ends_with("Reading feed from podcasts/feed.xml"));
    }

    #[test]
    fn completed_downloads_print_nothing() {
        let line = plain_line(ProgressEvent::DownloadCompleted {
            title: "Episode 1".to_string(),
        });
        assert_eq!(line, None);
    }
}

pub mod config;
pub mod download;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod progress;

// Re-export main types for convenience
pub use config::{Config, DownloaderConfig};
pub use download::{CommandDownloader, DownloadOutcome, Downloader};
pub use error::{DownloadError, EntryError, FeedError, RunError};
pub use feed::{FeedEntries, FeedEntry, FeedSource};
pub use pipeline::{RunSummary, download_entries, run};
pub use progress::{
    ConsoleStream, NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter,
    console_line,
};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur when opening or reading a feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to open feed file {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in feed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Feed ended inside <{element}> element")]
    UnexpectedEof { element: String },
}

/// Errors that make a single feed item unusable
///
/// These never stop the extraction; the offending item is skipped.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Episode '{title}' has neither an enclosure nor a link")]
    MissingMediaUrl { title: String },

    #[error("Episode '{title}' has an invalid media URL '{url}': {source}")]
    InvalidMediaUrl {
        title: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur while running the external downloader
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to launch {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with {status}")]
    Unsuccessful { program: String, status: ExitStatus },
}

/// Top-level errors that prevent a run from starting
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to change into output directory {path}: {source}")]
    Initialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}

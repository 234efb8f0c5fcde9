// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

use crate::error::FeedError;

/// An open, buffered feed byte stream
///
/// The underlying file (if any) is closed when the reader is dropped.
pub type FeedReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// Where the feed bytes are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A feed file on disk
    File(PathBuf),
    /// The process's standard input
    Stdin,
}

impl FeedSource {
    /// Use the given file, or standard input when no path was provided
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdin,
        }
    }

    /// Open the source for reading
    pub async fn open(&self) -> Result<FeedReader, FeedError> {
        match self {
            Self::File(path) => open_feed_file(path).await,
            Self::Stdin => Ok(Box::pin(BufReader::new(tokio::io::stdin()))),
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("standard input"),
        }
    }
}

async fn open_feed_file(path: &Path) -> Result<FeedReader, FeedError> {
    let file = File::open(path)
        .await
        .map_err(|e| FeedError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(Box::pin(BufReader::new(file)))
}

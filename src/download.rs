// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use crate::config::DownloaderConfig;
use crate::error::DownloadError;

/// Result of downloading a single entry
pub type DownloadOutcome = Result<(), DownloadError>;

/// Downloader abstraction for testability
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download the file behind `url`, returning once the transfer is over
    async fn download(&self, url: &Url) -> DownloadOutcome;
}

/// Default downloader that hands each URL to an external program
///
/// The program's stdout and stderr go straight to ours.
#[derive(Debug, Clone)]
pub struct CommandDownloader {
    program: String,
    args: Vec<String>,
}

impl CommandDownloader {
    /// Create a downloader running `program args.. <url>`
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &DownloaderConfig) -> Self {
        Self::new(config.program.clone(), config.args.iter().cloned())
    }
}

#[async_trait]
impl Downloader for CommandDownloader {
    async fn download(&self, url: &Url) -> DownloadOutcome {
        debug!(program = %self.program, args = ?self.args, %url, "Running downloader");

        // The feed may be coming in on stdin; keep the child away from it.
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| DownloadError::SpawnFailed {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(DownloadError::Unsuccessful {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

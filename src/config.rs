// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// Environment variable naming the downloader program
pub const DOWNLOADER_ENV: &str = "PODFETCH_DOWNLOADER";
/// Environment variable holding whitespace-separated downloader arguments
pub const DOWNLOADER_ARGS_ENV: &str = "PODFETCH_DOWNLOADER_ARGS";

/// Settings for a single run, built once by the command line layer
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Feed file to read; standard input when `None`
    pub feed_path: Option<PathBuf>,
    /// Directory to change into before the feed is opened
    pub output_dir: Option<PathBuf>,
}

/// How the external downloader is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    pub program: String,
    /// Arguments placed before the URL
    pub args: Vec<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: "wget".to_string(),
            args: vec!["-c".to_string()],
        }
    }
}

impl DownloaderConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup, falling back to `wget -c`
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            program: set(DOWNLOADER_ENV)
                .map(|program| program.trim().to_string())
                .unwrap_or(defaults.program),
            args: set(DOWNLOADER_ARGS_ENV)
                .map(|args| args.split_whitespace().map(String::from).collect())
                .unwrap_or(defaults.args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_wget_continue() {
        let config = DownloaderConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, DownloaderConfig::default());
        assert_eq!(config.program, "wget");
        assert_eq!(config.args, ["-c"]);
    }

    #[test]
    fn environment_overrides_program_and_args() {
        let config = DownloaderConfig::from_lookup(lookup_from(&[
            (DOWNLOADER_ENV, "curl"),
            (DOWNLOADER_ARGS_ENV, "  -C -   -O "),
        ]));

        assert_eq!(config.program, "curl");
        assert_eq!(config.args, ["-C", "-", "-O"]);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = DownloaderConfig::from_lookup(lookup_from(&[
            (DOWNLOADER_ENV, "   "),
            (DOWNLOADER_ARGS_ENV, ""),
        ]));

        assert_eq!(config, DownloaderConfig::default());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::error::EntryError;

/// A single podcast episode, fully decoded from its `<item>` element
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Episode title; empty if the item had none
    pub title: String,
    /// The file to download
    pub media_url: Url,
    /// Enclosure size in bytes, if announced
    pub length: Option<u64>,
    /// Enclosure MIME type, if announced
    pub mime_type: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

/// Fields collected while walking an `<item>` subtree
#[derive(Debug, Default)]
pub(crate) struct EntryDraft {
    pub title: Option<String>,
    pub enclosure_url: Option<String>,
    pub enclosure_length: Option<String>,
    pub enclosure_type: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
}

impl EntryDraft {
    /// Turn the collected fields into an entry
    ///
    /// The enclosure URL wins over the link; an item with neither is rejected.
    pub fn finish(self) -> Result<FeedEntry, EntryError> {
        let title = self.title.unwrap_or_default();

        let raw_url = self
            .enclosure_url
            .filter(|url| !url.is_empty())
            .or(self.link)
            .ok_or_else(|| EntryError::MissingMediaUrl {
                title: title.clone(),
            })?;

        let media_url = match Url::parse(&raw_url) {
            Ok(url) => url,
            Err(source) => {
                return Err(EntryError::InvalidMediaUrl {
                    title,
                    url: raw_url,
                    source,
                });
            }
        };

        Ok(FeedEntry {
            title,
            media_url,
            length: self.enclosure_length.and_then(|len| len.parse().ok()),
            mime_type: self.enclosure_type.filter(|s| !s.is_empty()),
            published: self.pub_date.and_then(|date| parse_pub_date(&date)),
        })
    }
}

/// Parse an RSS `pubDate`, tolerating a few common deviations from RFC 2822
fn parse_pub_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    const RELAXED_FORMATS: [&str; 3] = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    DateTime::parse_from_rfc2822(date_str).ok().or_else(|| {
        RELAXED_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(date_str, format).ok())
    })
}

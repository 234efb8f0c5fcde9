// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use tokio::io::AsyncBufRead;
use tracing::{debug, warn};

use crate::error::{EntryError, FeedError};

use super::entry::{EntryDraft, FeedEntry};
use super::tokens::{Token, TokenReader};

/// Local name of the element holding one episode
const ITEM_TAG: &str = "item";

/// Streaming extractor yielding one [`FeedEntry`] per `<item>` element
///
/// Items that cannot be turned into an entry are logged and skipped.
/// Malformed XML ends the extraction with an error, as nothing after it can
/// be trusted.
pub struct FeedEntries<R> {
    tokens: TokenReader<R>,
    skipped: usize,
}

impl<R: AsyncBufRead + Unpin> FeedEntries<R> {
    pub fn new(source: R) -> Self {
        Self {
            tokens: TokenReader::new(source),
            skipped: 0,
        }
    }

    /// Advance to the next decodable entry, or `None` at end of feed
    pub async fn next_entry(&mut self) -> Result<Option<FeedEntry>, FeedError> {
        while let Some(token) = self.tokens.next_token().await? {
            let Token::Start(element) = token else {
                continue;
            };
            if element.name != ITEM_TAG {
                continue;
            }

            match self.decode_item().await? {
                Ok(entry) => {
                    debug!(
                        title = %entry.title,
                        url = %entry.media_url,
                        length = ?entry.length,
                        mime_type = ?entry.mime_type,
                        published = ?entry.published,
                        "Decoded feed entry"
                    );
                    return Ok(Some(entry));
                }
                Err(e) => {
                    warn!("Skipping feed entry: {e}");
                    self.skipped += 1;
                }
            }
        }

        Ok(None)
    }

    /// Number of items skipped because they could not be decoded
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Walk the direct children of the current `<item>` up to its end tag
    async fn decode_item(&mut self) -> Result<Result<FeedEntry, EntryError>, FeedError> {
        let mut draft = EntryDraft::default();

        loop {
            let element = match self.tokens.next_token().await? {
                Some(Token::Start(element)) => element,
                Some(Token::End(_)) => break,
                Some(Token::Text(_)) => continue,
                None => {
                    return Err(FeedError::UnexpectedEof {
                        element: ITEM_TAG.to_string(),
                    });
                }
            };

            match element.name.as_str() {
                "title" => {
                    let title = self.tokens.read_text(&element.name).await?;
                    draft.title.get_or_insert(title);
                }
                "enclosure" => {
                    let url = element
                        .attribute("url")
                        .filter(|url| !url.is_empty() && draft.enclosure_url.is_none());
                    if let Some(url) = url {
                        draft.enclosure_url = Some(url.to_string());
                        draft.enclosure_length = element.attribute("length").map(String::from);
                        draft.enclosure_type = element.attribute("type").map(String::from);
                    }
                    self.tokens.skip_element(&element.name).await?;
                }
                "link" => {
                    let link = self.tokens.read_text(&element.name).await?;
                    if draft.link.is_none() && !link.is_empty() {
                        draft.link = Some(link);
                    }
                }
                "pubDate" => {
                    let date = self.tokens.read_text(&element.name).await?;
                    draft.pub_date.get_or_insert(date);
                }
                _ => self.tokens.skip_element(&element.name).await?,
            }
        }

        Ok(draft.finish())
    }
}

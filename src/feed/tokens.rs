// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Streaming XML tokenizer
//!
//! Turns a byte stream into a forward-only sequence of owned tokens, with
//! namespace prefixes stripped from element and attribute names. Nothing
//! downstream of this module touches quick-xml types.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tokio::io::AsyncBufRead;

use crate::error::FeedError;

/// A start tag with its local name and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    /// Look up an attribute value by its local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, FeedError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            attributes.push((decode_name(attr.key.local_name().as_ref()), value.into_owned()));
        }

        Ok(Self {
            name: decode_name(start.local_name().as_ref()),
            attributes,
        })
    }
}

/// A structural XML token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start(Element),
    End(String),
    /// Text or CDATA content exactly as written, never empty
    Text(String),
}

/// Lazy, single-pass token sequence over an XML byte stream
pub struct TokenReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> TokenReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Read the next token, or `None` once the input is exhausted
    pub async fn next_token(&mut self) -> Result<Option<Token>, FeedError> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into_async(&mut self.buf).await? {
                Event::Start(start) => Token::Start(Element::from_start(&start)?),
                Event::End(end) => Token::End(decode_name(end.local_name().as_ref())),
                Event::Text(text) => {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    if text.is_empty() {
                        continue;
                    }
                    Token::Text(text.into_owned())
                }
                Event::CData(cdata) => {
                    let raw = cdata.into_inner();
                    if raw.is_empty() {
                        continue;
                    }
                    Token::Text(String::from_utf8_lossy(&raw).into_owned())
                }
                Event::Eof => return Ok(None),
                // Declarations, comments, processing instructions, doctypes
                _ => continue,
            };
            return Ok(Some(token));
        }
    }

    /// Consume the remainder of the current element and return its text
    ///
    /// Must be called right after the element's start token. Text of nested
    /// elements is included; only the joined result is trimmed.
    pub async fn read_text(&mut self, element: &str) -> Result<String, FeedError> {
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            match self.next_token().await? {
                Some(Token::Start(_)) => depth += 1,
                Some(Token::End(_)) if depth == 0 => return Ok(text.trim().to_string()),
                Some(Token::End(_)) => depth -= 1,
                Some(Token::Text(chunk)) => text.push_str(&chunk),
                None => {
                    return Err(FeedError::UnexpectedEof {
                        element: element.to_string(),
                    });
                }
            }
        }
    }

    /// Consume the remainder of the current element, discarding it
    pub async fn skip_element(&mut self, element: &str) -> Result<(), FeedError> {
        self.read_text(element).await.map(drop)
    }
}

fn decode_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(xml: &str) -> Result<Vec<Token>, FeedError> {
        let mut tokens = TokenReader::new(xml.as_bytes());
        let mut collected = Vec::new();
        while let Some(token) = tokens.next_token().await? {
            collected.push(token);
        }
        Ok(collected)
    }

    fn start(name: &str, attributes: &[(&str, &str)]) -> Token {
        Token::Start(Element {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    fn end(name: &str) -> Token {
        Token::End(name.to_string())
    }

    fn text(content: &str) -> Token {
        Token::Text(content.to_string())
    }

    #[tokio::test]
    async fn yields_tokens_in_document_order() {
        let tokens = collect("<?xml version=\"1.0\"?><rss><!-- hi --><title> Show </title></rss>")
            .await
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                start("rss", &[]),
                start("title", &[]),
                text(" Show "),
                end("title"),
                end("rss"),
            ]
        );
    }

    #[tokio::test]
    async fn strips_namespace_prefixes() {
        let tokens = collect(
            r#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"><itunes:item itunes:href="x">1</itunes:item></rss>"#,
        )
        .await
        .unwrap();

        assert_eq!(tokens[1], start("item", &[("href", "x")]));
        assert_eq!(tokens[3], end("item"));
    }

    #[tokio::test]
    async fn expands_self_closing_elements() {
        let tokens = collect(r#"<enclosure url="https://example.com/a.mp3"/>"#)
            .await
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                start("enclosure", &[("url", "https://example.com/a.mp3")]),
                end("enclosure"),
            ]
        );
    }

    #[tokio::test]
    async fn unescapes_text_and_attributes() {
        let tokens = collect(r#"<a href="?x=1&amp;y=2">Q&amp;A<![CDATA[ <raw> ]]></a>"#)
            .await
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                start("a", &[("href", "?x=1&y=2")]),
                text("Q&A"),
                text(" <raw> "),
                end("a"),
            ]
        );
    }

    #[tokio::test]
    async fn read_text_consumes_whole_element() {
        let mut tokens = TokenReader::new("<t>Hello <b>World</b></t><next/>".as_bytes());

        assert_eq!(tokens.next_token().await.unwrap(), Some(start("t", &[])));
        assert_eq!(tokens.read_text("t").await.unwrap(), "Hello World");
        assert_eq!(tokens.next_token().await.unwrap(), Some(start("next", &[])));
    }

    #[tokio::test]
    async fn read_text_keeps_whitespace_between_pieces() {
        let mut tokens =
            TokenReader::new("<title>  Part 1 <![CDATA[and more]]>\n</title>".as_bytes());
        tokens.next_token().await.unwrap();

        assert_eq!(tokens.read_text("title").await.unwrap(), "Part 1 and more");
    }

    #[tokio::test]
    async fn read_text_keeps_whitespace_around_nested_elements() {
        let mut tokens = TokenReader::new("<title>A <i>big</i> show</title>".as_bytes());
        tokens.next_token().await.unwrap();

        assert_eq!(tokens.read_text("title").await.unwrap(), "A big show");
    }

    #[tokio::test]
    async fn mismatched_tags_are_reported() {
        let err = collect("<rss><item></rss>").await.unwrap_err();
        assert!(matches!(err, FeedError::Xml(_)));
    }

    #[tokio::test]
    async fn truncated_element_is_reported() {
        let mut tokens = TokenReader::new("<item><title>cut".as_bytes());
        tokens.next_token().await.unwrap();

        let err = tokens.read_text("item").await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::UnexpectedEof { .. } | FeedError::Xml(_)
        ));
    }
}

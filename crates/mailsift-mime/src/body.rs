//! Body part tree and plain-text extraction.
//!
//! A body is either a leaf or a multipart container. Containers split their
//! content on the boundary up front but only parse a child when the walk
//! reaches it, so extraction stops at the first child that yields text.

use std::borrow::Cow;

use crate::charset::{Charset, decode_to_utf8};
use crate::config::Config;
use crate::content_type::ContentType;
use crate::error::{ExtractError, ExtractResult};
use crate::header::{RawHeader, split_part_headers};
use crate::html::html_to_text;
use crate::message::TransferEncoding;

/// A single-part body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<'a> {
    /// Declared content type.
    pub content_type: ContentType,
    /// Declared transfer encoding.
    pub encoding: TransferEncoding,
    /// Raw, still-encoded content.
    pub body: &'a [u8],
}

/// A multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'a> {
    /// Declared content type; always `multipart/*` with a boundary.
    pub content_type: ContentType,
    segments: Vec<&'a [u8]>,
    depth: usize,
    max_depth: usize,
}

/// A body, or body part, as declared by its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart<'a> {
    /// Leaf content.
    Leaf(Leaf<'a>),
    /// Multipart container.
    Container(Container<'a>),
}

impl<'a> BodyPart<'a> {
    /// Resolves a body against its content type.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MissingBoundary`] for a multipart type without a
    /// boundary, or [`ExtractError::NestingTooDeep`] if `max_depth` is zero.
    pub fn new(
        body: &'a [u8],
        content_type: ContentType,
        encoding: TransferEncoding,
        config: &Config,
    ) -> ExtractResult<Self> {
        Self::at_depth(body, content_type, encoding, 0, config.max_depth)
    }

    fn at_depth(
        body: &'a [u8],
        content_type: ContentType,
        encoding: TransferEncoding,
        depth: usize,
        max_depth: usize,
    ) -> ExtractResult<Self> {
        if !content_type.is_multipart() {
            return Ok(Self::Leaf(Leaf {
                content_type,
                encoding,
                body,
            }));
        }

        if depth >= max_depth {
            return Err(ExtractError::NestingTooDeep { limit: max_depth });
        }

        let boundary = content_type
            .boundary()
            .ok_or(ExtractError::MissingBoundary)?;
        let segments = split_multipart(body, boundary);

        Ok(Self::Container(Container {
            content_type,
            segments,
            depth,
            max_depth,
        }))
    }

    /// Returns the declared content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        match self {
            Self::Leaf(leaf) => &leaf.content_type,
            Self::Container(container) => &container.content_type,
        }
    }

    /// Extracts the best plain-text representation.
    ///
    /// # Errors
    ///
    /// Returns the reason no text could be produced.
    pub fn plain_text(&self, config: &Config) -> ExtractResult<String> {
        match self {
            Self::Leaf(leaf) => leaf.plain_text(config),
            Self::Container(container) => container.plain_text(config),
        }
    }
}

impl Leaf<'_> {
    /// Extracts text from a `text/plain` or `text/html` leaf.
    ///
    /// # Errors
    ///
    /// Fails on other media types, undecodable transfer encodings and, for
    /// plain text, unsupported charsets.
    pub fn plain_text(&self, config: &Config) -> ExtractResult<String> {
        let ct = &self.content_type;
        match (ct.main_type.as_str(), ct.sub_type.as_str()) {
            ("text", "plain") => {
                let bytes = self.encoding.decode(self.body)?;
                let text = match self.charset() {
                    Some(label) => decode_to_utf8(&bytes, label)?,
                    None => Charset::Utf8.decode(&bytes),
                };
                Ok(normalize(&text))
            }
            ("text", "html") if config.html_fallback => {
                let bytes = self.encoding.decode(self.body)?;
                let html = self.decode_html_charset(&bytes);
                Ok(normalize(&html_to_text(&html)))
            }
            _ => Err(ExtractError::UnsupportedMediaType(ct.media_type())),
        }
    }

    fn charset(&self) -> Option<&str> {
        self.content_type.charset().filter(|c| !c.trim().is_empty())
    }

    /// HTML is best-effort: an unknown charset degrades to lossy UTF-8.
    fn decode_html_charset<'b>(&self, bytes: &'b [u8]) -> Cow<'b, str> {
        let Some(label) = self.charset() else {
            return Charset::Utf8.decode(bytes);
        };
        decode_to_utf8(bytes, label).unwrap_or_else(|e| {
            tracing::warn!(
                charset = label,
                error = %e,
                "Charset accepted for text/html but rejected for text/plain, reading as UTF-8"
            );
            Charset::Utf8.decode(bytes)
        })
    }
}

impl<'a> Container<'a> {
    /// Number of parts between the boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if no part sits between the boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parses child parts in declaration order, on demand.
    pub fn parts(&self) -> impl Iterator<Item = ExtractResult<BodyPart<'a>>> + '_ {
        self.segments
            .iter()
            .map(move |&segment| self.parse_child(segment))
    }

    fn parse_child(&self, segment: &'a [u8]) -> ExtractResult<BodyPart<'a>> {
        let (headers, body) =
            split_part_headers(segment).map_err(|e| ExtractError::MalformedPart(e.to_string()))?;

        let content_type = ContentType::from_header(find_header(&headers, "content-type"))
            .map_err(|e| ExtractError::InvalidContentType(e.to_string()))?;
        let encoding = find_header(&headers, "content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse);

        BodyPart::at_depth(body, content_type, encoding, self.depth + 1, self.max_depth)
    }

    /// Returns the text of the first child that yields any.
    ///
    /// Children are tried strictly in order; a failing child is skipped. If
    /// every child fails, the last failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the last child error, or [`ExtractError::UnsupportedMediaType`]
    /// when the container has no parts.
    pub fn plain_text(&self, config: &Config) -> ExtractResult<String> {
        let mut last_error = None;
        let mut saw_empty = false;

        for (index, part) in self.parts().enumerate() {
            match part.and_then(|part| part.plain_text(config)) {
                Ok(text) if !text.is_empty() => return Ok(text),
                Ok(_) => saw_empty = true,
                Err(e) => {
                    tracing::debug!(index, depth = self.depth, error = %e, "Skipping body part");
                    last_error = Some(e);
                }
            }
        }

        if saw_empty {
            return Ok(String::new());
        }
        let Some(error) = last_error else {
            return Err(ExtractError::UnsupportedMediaType(self.content_type.media_type()));
        };
        Err(error)
    }
}

fn find_header<'h>(headers: &'h [RawHeader], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}

/// Splits multipart content on `--boundary` delimiter lines (RFC 2046).
///
/// The preamble before the first delimiter and the epilogue after the close
/// delimiter are dropped, as is the line break that precedes each delimiter.
/// A body missing its close delimiter keeps everything after the last one.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut part_start = None;
    let mut offset = 0;

    for line in body.split_inclusive(|&b| b == b'\n') {
        let line_start = offset;
        offset += line.len();

        let Some(rest) = line.trim_ascii_end().strip_prefix(delimiter.as_bytes()) else {
            continue;
        };
        let closing = rest == b"--";
        if !rest.is_empty() && !closing {
            continue;
        }

        if let Some(start) = part_start.take() {
            parts.push(strip_line_break(&body[start..line_start]));
        }
        if closing {
            return parts;
        }
        part_start = Some(offset);
    }

    if let Some(start) = part_start {
        tracing::debug!(boundary, "Multipart body has no closing delimiter");
        parts.push(&body[start..]);
    }
    parts
}

fn strip_line_break(segment: &[u8]) -> &[u8] {
    let segment = segment.strip_suffix(b"\n").unwrap_or(segment);
    segment.strip_suffix(b"\r").unwrap_or(segment)
}

/// Extracts plain text from a body using the default [`Config`].
///
/// # Errors
///
/// Returns the reason no text could be produced.
pub fn extract_plain_text(
    body: &[u8],
    content_type: &ContentType,
    encoding: TransferEncoding,
) -> ExtractResult<String> {
    extract_plain_text_with(body, content_type, encoding, &Config::default())
}

/// Extracts plain text from a body.
///
/// # Errors
///
/// Returns the reason no text could be produced.
pub fn extract_plain_text_with(
    body: &[u8],
    content_type: &ContentType,
    encoding: TransferEncoding,
    config: &Config,
) -> ExtractResult<String> {
    BodyPart::new(body, content_type.clone(), encoding, config)?.plain_text(config)
}

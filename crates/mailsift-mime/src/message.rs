//! Whole-message parsing: headers plus the best plain-text body.

use std::borrow::Cow;
use std::fmt;

use crate::body::BodyPart;
use crate::config::Config;
use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_base64url, decode_quoted_printable};
use crate::error::{ExtractResult, Result};
use crate::header::{HeaderMap, RawHeader, split_header_block};

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    ///
    /// Unrecognized values are treated as 7bit and passed through.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" | "" => Self::SevenBit,
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            other => {
                tracing::debug!(
                    encoding = other,
                    "Unknown transfer encoding, passing through"
                );
                Self::SevenBit
            }
        }
    }

    /// Undoes the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::TransferDecodeFailed`](crate::ExtractError::TransferDecodeFailed)
    /// if Base64 or Quoted-Printable content does not decode.
    pub fn decode(self, body: &[u8]) -> ExtractResult<Cow<'_, [u8]>> {
        match self {
            Self::Base64 => decode_base64(body.trim_ascii()).map(Cow::Owned),
            Self::QuotedPrintable => decode_quoted_printable(body).map(Cow::Owned),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(Cow::Borrowed(body)),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Message parser holding its configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Parses a raw message into its plain-text body and decoded headers.
    ///
    /// The header map always contains a `Message-ID` key, possibly empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed, the top-level
    /// `Content-Type` is invalid, or the body yields no text.
    pub fn parse(&self, raw: &[u8]) -> Result<(String, HeaderMap)> {
        let (raw_headers, body) = split_header_block(raw)?;
        let headers = extract_headers(&raw_headers);

        let content_type = ContentType::from_header(find(&raw_headers, "content-type"))?;
        let encoding = find(&raw_headers, "content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse);

        tracing::trace!(
            content_type = %content_type,
            encoding = %encoding,
            headers = headers.len(),
            "Parsed header block"
        );

        let text =
            BodyPart::new(body, content_type, encoding, &self.config)?.plain_text(&self.config)?;
        Ok((text, headers))
    }

    /// Parses a message wrapped in URL-safe Base64, as returned by mail APIs.
    ///
    /// # Errors
    ///
    /// Returns an error if the wrapper does not decode or parsing fails.
    pub fn parse_base64url(&self, encoded: &[u8]) -> Result<(String, HeaderMap)> {
        let raw = decode_base64url(encoded)?;
        self.parse(&raw)
    }
}

fn find<'h>(headers: &'h [RawHeader], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Decodes every header and guarantees a `Message-ID` key.
/// Decodes every header; a message without `Message-ID` gets an empty one.
fn extract_headers(raw: &[RawHeader]) -> HeaderMap {
    let mut headers = HeaderMap::from_raw(raw);
    if !headers.contains("Message-ID") {
        headers.add("Message-ID", "");
    }
    headers
}

/// Parses a raw message with the default configuration.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse_email(raw: impl AsRef<[u8]>) -> Result<(String, HeaderMap)> {
    Parser::default().parse(raw.as_ref())
}

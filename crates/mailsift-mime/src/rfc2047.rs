//! RFC 2047 encoded-word decoding for header values.
//!
//! Format: `=?charset?encoding?encoded-text?=`, where the encoding is `B`
//! (Base64) or `Q` (Quoted-Printable variant).

use crate::charset::decode_to_utf8;
use crate::encoding::{decode_base64, decode_q};
use crate::error::{ExtractError, ExtractResult};

/// An encoded word located inside a header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    text: &'a str,
    /// Length of the whole `=?...?=` token.
    len: usize,
}

impl<'a> EncodedWord<'a> {
    /// Parses an encoded word at the start of `input`.
    fn parse(input: &'a str) -> Option<Self> {
        let inner = input.strip_prefix("=?")?;
        let (charset, rest) = inner.split_once('?')?;
        let (encoding, rest) = rest.split_once('?')?;
        let end = rest.find("?=")?;
        let text = &rest[..end];

        if charset.is_empty()
            || encoding.len() != 1
            || charset.contains(char::is_whitespace)
            || text.contains(char::is_whitespace)
        {
            return None;
        }

        Some(Self {
            charset,
            encoding,
            text,
            len: 2 + charset.len() + 1 + encoding.len() + 1 + end + 2,
        })
    }

    fn decode(&self) -> ExtractResult<String> {
        // RFC 2231 allows a language suffix: `utf-8*en`
        let charset = self
            .charset
            .split_once('*')
            .map_or(self.charset, |(charset, _)| charset);

        let bytes = match self.encoding {
            "B" | "b" => decode_base64(self.text.as_bytes())?,
            "Q" | "q" => decode_q(self.text)?,
            other => {
                return Err(ExtractError::transfer(
                    "rfc2047",
                    format!("unknown encoding '{other}'"),
                ));
            }
        };

        Ok(decode_to_utf8(&bytes, charset)?.into_owned())
    }
}

/// Decodes every encoded word in a header value.
///
/// Whitespace between two adjacent encoded words is dropped. A word that
/// cannot be decoded is kept verbatim and the failure is logged.
#[must_use]
pub fn decode_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        let Some(word) = EncodedWord::parse(candidate) else {
            result.push_str(before);
            result.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
            continue;
        };

        if !(after_word && before.chars().all(char::is_whitespace)) {
            result.push_str(before);
        }

        let raw = &candidate[..word.len];
        match word.decode() {
            Ok(text) => {
                result.push_str(&text);
                after_word = true;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    word = raw,
                    "Failed to decode encoded word, keeping raw text"
                );
                result.push_str(raw);
                after_word = false;
            }
        }
        rest = &candidate[word.len..];
    }

    result.push_str(rest);
    result
}

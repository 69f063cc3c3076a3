//! Transfer-encoding decoders.
//!
//! Supports Base64 (standard and URL-safe), Quoted-Printable (RFC 2045) and
//! the `Q` encoding used inside RFC 2047 encoded words.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{ExtractError, ExtractResult};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decodes Base64 data, ignoring embedded whitespace and missing padding.
///
/// # Errors
///
/// Returns [`ExtractError::TransferDecodeFailed`] if the input is not valid Base64.
pub fn decode_base64(data: &[u8]) -> ExtractResult<Vec<u8>> {
    let cleaned = strip_whitespace(data);
    STANDARD_LENIENT
        .decode(cleaned)
        .map_err(|e| ExtractError::transfer("base64", e))
}

/// Decodes URL-safe Base64, as used by mail APIs that wrap raw messages.
///
/// # Errors
///
/// Returns [`ExtractError::TransferDecodeFailed`] if the input is not valid Base64.
pub fn decode_base64url(data: &[u8]) -> ExtractResult<Vec<u8>> {
    let cleaned = strip_whitespace(data);
    URL_SAFE_LENIENT
        .decode(cleaned)
        .map_err(|e| ExtractError::transfer("base64url", e))
}

fn strip_whitespace(data: &[u8]) -> Vec<u8> {
    data.iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect()
}

/// Decodes Quoted-Printable content (RFC 2045).
///
/// Trailing whitespace on each line is dropped, a trailing `=` joins the line
/// with the next one, and hard line breaks are kept as they appear.
///
/// # Errors
///
/// Returns [`ExtractError::TransferDecodeFailed`] on an `=` that is not followed
/// by two hex digits or a line break.
pub fn decode_quoted_printable(data: &[u8]) -> ExtractResult<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len());

    for line in data.split_inclusive(|&b| b == b'\n') {
        let content_len = line
            .iter()
            .rposition(|&b| b != b'\n' && b != b'\r')
            .map_or(0, |i| i + 1);
        let (content, line_break) = line.split_at(content_len);
        let content = content.trim_ascii_end();

        match content.strip_suffix(b"=") {
            // Soft line break
            Some(joined) => unescape_into(joined, &mut result, false)?,
            None => {
                unescape_into(content, &mut result, false)?;
                result.extend_from_slice(line_break);
            }
        }
    }

    Ok(result)
}

/// Decodes the RFC 2047 `Q` encoding: Quoted-Printable with `_` for space.
///
/// # Errors
///
/// Returns [`ExtractError::TransferDecodeFailed`] on an invalid escape.
pub fn decode_q(text: &str) -> ExtractResult<Vec<u8>> {
    let mut result = Vec::with_capacity(text.len());
    unescape_into(text.as_bytes(), &mut result, true)?;
    Ok(result)
}

fn unescape_into(
    mut input: &[u8],
    out: &mut Vec<u8>,
    underscore_is_space: bool,
) -> ExtractResult<()> {
    while let Some((&byte, rest)) = input.split_first() {
        match byte {
            b'=' => {
                let decoded = match rest {
                    [hi, lo, ..] => hex_pair(*hi, *lo),
                    _ => None,
                };
                let Some(decoded) = decoded else {
                    let shown = String::from_utf8_lossy(&rest[..rest.len().min(2)]).into_owned();
                    return Err(ExtractError::transfer(
                        "quoted-printable",
                        format!("invalid escape sequence '={shown}'"),
                    ));
                };
                out.push(decoded);
                input = &rest[2..];
            }
            b'_' if underscore_is_space => {
                out.push(b' ');
                input = rest;
            }
            _ => {
                out.push(byte);
                input = rest;
            }
        }
    }
    Ok(())
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    Some((hex_value(hi)? << 4) | hex_value(lo)?)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

//! Header block framing and the decoded header map.

use std::fmt;
use std::ops::Index;

use crate::error::ParseError;
use crate::rfc2047::decode_header_value;

/// A header line as received: unfolded, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    /// Header name, case preserved.
    pub name: String,
    /// Unfolded value with surrounding whitespace trimmed.
    pub value: String,
}

/// Splits a message (or body part) into its headers and the remaining body.
///
/// The header block ends at the first empty line. Lines starting with a space
/// or tab continue the previous header and are joined with a single space.
///
/// # Errors
///
/// Returns [`ParseError::MalformedHeaderBlock`] if no empty line ends the block,
/// or if a line is neither `name: value` nor a continuation.
pub fn split_header_block(raw: &[u8]) -> Result<(Vec<RawHeader>, &[u8]), ParseError> {
    let Some((header_end, body_start)) = find_empty_line(raw) else {
        return Err(ParseError::MalformedHeaderBlock(
            "no empty line terminates the header block".to_string(),
        ));
    };

    let block = String::from_utf8_lossy(&raw[..header_end]);
    let headers = parse_lines(&block)?;
    Ok((headers, &raw[body_start..]))
}

/// Splits a multipart body part into its headers and content.
///
/// Unlike [`split_header_block`], the empty line is optional (RFC 2046): a
/// part that ends inside its header block has an empty body.
pub(crate) fn split_part_headers(raw: &[u8]) -> Result<(Vec<RawHeader>, &[u8]), ParseError> {
    if find_empty_line(raw).is_some() {
        return split_header_block(raw);
    }
    let headers = parse_lines(&String::from_utf8_lossy(raw))?;
    Ok((headers, &raw[raw.len()..]))
}

/// Returns where the first empty line starts and where the line after it begins.
fn find_empty_line(raw: &[u8]) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in raw.split_inclusive(|&b| b == b'\n') {
        let line_start = offset;
        offset += line.len();
        let content = line
            .strip_suffix(b"\n")
            .map(|l| l.strip_suffix(b"\r").unwrap_or(l));
        if content.is_some_and(<[u8]>::is_empty) {
            return Some((line_start, offset));
        }
    }
    None
}

fn parse_lines(block: &str) -> Result<Vec<RawHeader>, ParseError> {
    let mut headers: Vec<RawHeader> = Vec::new();

    for line in block.lines() {
        // Continuation line
        if line.starts_with(' ') || line.starts_with('\t') {
            let Some(current) = headers.last_mut() else {
                return Err(ParseError::MalformedHeaderBlock(format!(
                    "continuation line before any header: {line:?}"
                )));
            };
            let folded = line.trim();
            if !folded.is_empty() {
                if !current.value.is_empty() {
                    current.value.push(' ');
                }
                current.value.push_str(folded);
            }
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeaderBlock(format!(
                "not a header line: {line:?}"
            )));
        };
        let name = name.trim_end();
        if name.is_empty() || !name.bytes().all(|b| (33..=126).contains(&b)) {
            return Err(ParseError::MalformedHeaderBlock(format!(
                "invalid header name: {name:?}"
            )));
        }

        headers.push(RawHeader {
            name: name.to_string(),
            value: value.trim().to_string(),
        });
    }

    Ok(headers)
}

/// Decoded headers, keyed by name as received.
///
/// Lookups ignore ASCII case. A header that repeats keeps every value in
/// original order under the spelling of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from raw headers, decoding RFC 2047 encoded words.
    #[must_use]
    pub fn from_raw(raw: &[RawHeader]) -> Self {
        let mut map = Self::new();
        for header in raw {
            map.add(header.name.clone(), decode_header_value(&header.value));
        }
        map
    }

    /// Appends a value for a header.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns true if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over header names and their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Gets the first From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.first("from")
    }

    /// Gets the first Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.first("subject")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.first("message-id")
    }
}

impl Index<&str> for HeaderMap {
    type Output = [String];

    /// Missing headers index to an empty slice.
    fn index(&self, name: &str) -> &[String] {
        self.get(name).unwrap_or(&[])
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.entries {
            for value in values {
                writeln!(f, "{name}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HeaderMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_block() {
        let raw = concat!(
            "From: sender@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n",
            "Body line\r\n"
        );

        let (headers, body) = split_header_block(raw.as_bytes()).unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0].name, "From");
        assert_eq!(headers[0].value, "sender@example.com");
        assert_eq!(headers[2].value, "text/plain; charset=utf-8");
        assert_eq!(body, b"Body line\r\n");
    }

    #[test]
    fn test_split_header_block_lf_only() {
        let (headers, body) = split_header_block(b"Subject: hi\n\nbody").unwrap();
        assert_eq!(headers[0].value, "hi");
        assert_eq!(body, b"body");
    }

    #[test]
    fn test_split_header_block_no_headers() {
        let (headers, body) = split_header_block(b"\r\nonly body").unwrap();
        assert!(headers.is_empty());
        assert_eq!(body, b"only body");
    }

    #[test]
    fn test_split_header_block_missing_terminator() {
        let err = split_header_block(b"Subject: hi\r\nFrom: a@x.com\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderBlock(_)));
    }

    #[test]
    fn test_split_header_block_rejects_garbage_line() {
        let err = split_header_block(b"Subject: hi\r\nnot a header\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderBlock(_)));
    }

    #[test]
    fn test_split_header_block_rejects_leading_continuation() {
        let err = split_header_block(b" folded\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderBlock(_)));
    }

    #[test]
    fn test_split_part_headers_without_body() {
        let (headers, body) = split_part_headers(b"Content-Type: text/plain\r\n").unwrap();
        assert_eq!(headers[0].name, "Content-Type");
        assert_eq!(headers[0].value, "text/plain");
        assert!(body.is_empty());

        let (headers, body) = split_part_headers(b"").unwrap();
        assert!(headers.is_empty());
        assert!(body.is_empty());
    }

    #[test]
    fn test_split_part_headers_with_body() {
        let (headers, body) = split_part_headers(b"X-A: 1\r\n\r\ntext").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(body, b"text");
    }

    #[test]
    fn test_split_part_headers_rejects_bare_text() {
        assert!(split_part_headers(b"just some text").is_err());
    }

    #[test]
    fn test_header_map_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.first("content-type"), Some("text/plain"));
        assert!(headers.contains("CONTENT-TYPE"));
    }

    #[test]
    fn test_header_map_preserves_duplicates_in_order() {
        let mut headers = HeaderMap::new();
        headers.add("Received", "first");
        headers.add("Subject", "s");
        headers.add("received", "second");

        assert_eq!(headers["Received"], ["first", "second"]);
        assert_eq!(headers.len(), 2);
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Received", "Subject"]);
    }

    #[test]
    fn test_header_map_index_missing_is_empty() {
        let headers = HeaderMap::new();
        assert!(headers["From"].is_empty());
        assert_eq!(headers.from(), None);
    }

    #[test]
    fn test_header_map_from_raw_decodes_words() {
        let raw = vec![RawHeader {
            name: "Subject".to_string(),
            value: "=?UTF-8?Q?Hello=3F?=".to_string(),
        }];
        let headers = HeaderMap::from_raw(&raw);
        assert_eq!(headers.subject(), Some("Hello?"));
    }

    #[test]
    fn test_header_map_display() {
        let mut headers = HeaderMap::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");

        let s = headers.to_string();
        assert_eq!(s, "From: sender@example.com\nTo: recipient@example.com\n");
    }
}

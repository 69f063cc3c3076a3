//! MIME content type handling.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ParseError, Result};

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentType {
    /// Main type, lowercased (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype, lowercased (e.g., "plain", "alternative").
    pub sub_type: String,
    /// Parameters keyed by lowercased name (e.g., charset, boundary).
    pub parameters: BTreeMap<String, String>,
}

impl Default for ContentType {
    /// `text/plain; charset="utf-8"`, assumed when a body declares nothing.
    fn default() -> Self {
        Self::text_plain()
    }
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into().to_ascii_lowercase(),
            sub_type: sub_type.into().to_ascii_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns `type/subtype`.
    #[must_use]
    pub fn media_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Returns a parameter, ignoring the case of its name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present and non-empty.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary").filter(|b| !b.is_empty())
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type == "multipart"
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type == "text"
    }

    /// Resolves an optional `Content-Type` header value.
    ///
    /// A missing or blank header yields [`ContentType::text_plain`].
    ///
    /// # Errors
    ///
    /// Returns an error if a non-blank value cannot be parsed.
    pub fn from_header(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => Self::parse(value),
        }
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidContentType`] if the value cannot be tokenized.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ParseError::InvalidContentType(format!("{reason}: {s:?}"));

        let (media, mut rest) = s.split_once(';').unwrap_or((s, ""));
        let (main_type, sub_type) = media
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("missing subtype"))?;
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if !is_token(main_type) || !is_token(sub_type) {
            return Err(invalid("invalid media type"));
        }

        let mut content_type = Self::new(main_type, sub_type);

        loop {
            rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
            if rest.is_empty() {
                break;
            }

            let (key, after_key) = rest
                .split_once('=')
                .ok_or_else(|| invalid("parameter without value"))?;
            let key = key.trim();
            if !is_token(key) {
                return Err(invalid("invalid parameter name"));
            }

            let (value, remainder) = parse_value(after_key.trim_start())
                .ok_or_else(|| invalid("unterminated quoted string"))?;
            content_type
                .parameters
                .insert(key.to_ascii_lowercase(), value);

            let remainder = remainder.trim_start();
            if !remainder.is_empty() && !remainder.starts_with(';') {
                return Err(invalid("unexpected text after parameter"));
            }
            rest = remainder;
        }

        Ok(content_type)
    }
}

/// Parses a quoted string or a bare value; returns the value and what follows.
fn parse_value(input: &str) -> Option<(String, &str)> {
    let Some(quoted) = input.strip_prefix('"') else {
        let end = input
            .find(|c: char| c == ';' || c.is_whitespace())
            .unwrap_or(input.len());
        return Some((input[..end].to_string(), &input[end..]));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Some((value, &quoted[i + 1..])),
            '\\' => value.push(chars.next()?.1),
            _ => value.push(ch),
        }
    }
    None
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(c))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.is_empty() || !is_token(value) {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {key}=\"{escaped}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

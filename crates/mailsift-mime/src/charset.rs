//! Charset table shared by the header and body decoders.
//!
//! Every charset the parser understands is listed in [`Charset`]; labels are
//! resolved through [`Charset::lookup`]. Legacy Japanese encodings go through
//! `encoding_rs`.

use std::borrow::Cow;

use encoding_rs::{EUC_JP, ISO_2022_JP, SHIFT_JIS};

use crate::error::{ExtractError, ExtractResult};

/// A supported character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// UTF-8 (no transformation).
    Utf8,
    /// US-ASCII, read as UTF-8.
    UsAscii,
    /// ISO-8859-1 (Latin-1).
    Latin1,
    /// `Shift_JIS`.
    ShiftJis,
    /// EUC-JP.
    EucJp,
    /// ISO-2022-JP.
    Iso2022Jp,
}

impl Charset {
    /// All supported charsets.
    pub const ALL: [Self; 6] = [
        Self::Utf8,
        Self::UsAscii,
        Self::Latin1,
        Self::ShiftJis,
        Self::EucJp,
        Self::Iso2022Jp,
    ];

    /// Resolves a charset label, ignoring case, surrounding quotes and whitespace.
    #[must_use]
    pub fn lookup(label: &str) -> Option<Self> {
        let normalized = label.trim().trim_matches('"').trim().to_ascii_lowercase();
        let charset = match normalized.as_str() {
            "utf-8" | "utf8" => Self::Utf8,
            "us-ascii" | "ascii" | "ansi_x3.4-1968" => Self::UsAscii,
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Self::Latin1,
            "shift_jis" | "shift-jis" | "sjis" | "x-sjis" | "ms_kanji" => Self::ShiftJis,
            "euc-jp" | "x-euc-jp" | "eucjp" => Self::EucJp,
            "iso-2022-jp" | "csiso2022jp" => Self::Iso2022Jp,
            _ => return None,
        };

        if normalized != charset.name() {
            tracing::debug!(label, charset = charset.name(), "Resolved charset alias");
        }
        Some(charset)
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::UsAscii => "us-ascii",
            Self::Latin1 => "iso-8859-1",
            Self::ShiftJis => "shift_jis",
            Self::EucJp => "euc-jp",
            Self::Iso2022Jp => "iso-2022-jp",
        }
    }

    /// Decodes bytes in this charset to UTF-8.
    ///
    /// Malformed sequences become U+FFFD.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        let (text, malformed) = match self {
            Self::Utf8 | Self::UsAscii => {
                let text = String::from_utf8_lossy(bytes);
                let malformed = matches!(text, Cow::Owned(_));
                (text, malformed)
            }
            Self::Latin1 => (encoding_rs::mem::decode_latin1(bytes), false),
            Self::ShiftJis => SHIFT_JIS.decode_without_bom_handling(bytes),
            Self::EucJp => EUC_JP.decode_without_bom_handling(bytes),
            Self::Iso2022Jp => ISO_2022_JP.decode_without_bom_handling(bytes),
        };

        if malformed {
            tracing::debug!(charset = self.name(), "Replaced malformed byte sequences");
        }
        text
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decodes bytes declared as `label` to UTF-8.
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedCharset`] if the label is not in the table.
pub fn decode_to_utf8<'a>(bytes: &'a [u8], label: &str) -> ExtractResult<Cow<'a, str>> {
    Charset::lookup(label)
        .map(|charset| charset.decode(bytes))
        .ok_or_else(|| ExtractError::UnsupportedCharset(label.trim().to_ascii_lowercase()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(Charset::lookup("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::lookup("\"Shift_JIS\""), Some(Charset::ShiftJis));
        assert_eq!(Charset::lookup(" ISO-2022-JP "), Some(Charset::Iso2022Jp));
        assert_eq!(Charset::lookup("latin1"), Some(Charset::Latin1));
        assert_eq!(Charset::lookup("koi8-r"), None);
    }

    #[test]
    fn test_every_charset_resolves_its_own_name() {
        for charset in Charset::ALL {
            assert_eq!(Charset::lookup(charset.name()), Some(charset));
        }
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(Charset::Latin1.decode(b"caf\xe9"), "café");
    }

    #[test]
    fn test_decode_shift_jis() {
        // "日本" in Shift_JIS
        assert_eq!(Charset::ShiftJis.decode(b"\x93\xfa\x96\x7b"), "日本");
    }

    #[test]
    fn test_decode_euc_jp() {
        // "日本" in EUC-JP
        assert_eq!(Charset::EucJp.decode(b"\xc6\xfc\xcb\xdc"), "日本");
    }

    #[test]
    fn test_decode_iso_2022_jp() {
        // "日本" in ISO-2022-JP
        assert_eq!(Charset::Iso2022Jp.decode(b"\x1b$BF|K\\\x1b(B"), "日本");
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        assert_eq!(Charset::Utf8.decode(b"ok\xff"), "ok\u{fffd}");
    }

    #[test]
    fn test_decode_to_utf8_unsupported() {
        let err = decode_to_utf8(b"abc", "KOI8-R").unwrap_err();
        assert_eq!(err, ExtractError::UnsupportedCharset("koi8-r".to_string()));
    }
}

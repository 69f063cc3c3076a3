//! Best-effort HTML to text conversion.
//!
//! This is a heuristic, not an HTML parser: script and style contents, comments
//! and malformed nesting all leak through as text.

/// Removes everything between `<` and `>`.
///
/// Single pass with one "inside tag" flag; entities are left untouched.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
}

/// Replaces HTML character references with the characters they name.
///
/// Handles the common named entities plus decimal and hex numeric references.
/// Anything unrecognized is kept as written.
#[must_use]
pub fn unescape_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match candidate[1..].find(';').filter(|&end| end <= 10) {
            Some(end) => {
                let name = &candidate[1..=end];
                if let Some(ch) = resolve_entity(name) {
                    result.push(ch);
                } else {
                    result.push_str(&candidate[..end + 2]);
                }
                rest = &candidate[end + 2..];
            }
            None => {
                result.push('&');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn resolve_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }

    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        _ => return None,
    };
    Some(ch)
}

/// Converts HTML to trimmed plain text: strip tags, then unescape entities.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    unescape_entities(&strip_tags(html)).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_strip_tags_leaks_style_contents() {
        assert_eq!(
            strip_tags("<style>p { color: red }</style><p>x</p>"),
            "p { color: red }x"
        );
    }

    #[test]
    fn test_strip_tags_unbalanced() {
        assert_eq!(strip_tags("a > b"), "a  b");
        assert_eq!(strip_tags("a < b"), "a ");
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(unescape_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape_entities("caf&eacute;"), "caf&eacute;");
        assert_eq!(unescape_entities("a & b"), "a & b");
        assert_eq!(unescape_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_entities_unescaped_after_stripping() {
        assert_eq!(html_to_text("<p>1 &lt; 2</p>"), "1 < 2");
    }

    #[test]
    fn test_html_to_text_trims() {
        assert_eq!(
            html_to_text("\r\n<html><body>\r\n  <h1>Hi</h1>\r\n</body></html>\r\n"),
            "Hi"
        );
    }
}

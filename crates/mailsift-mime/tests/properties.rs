//! Property tests for body decoding and header ordering.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mailsift_mime::parse_email;
use proptest::prelude::*;

fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(76)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}

proptest! {
    #[test]
    fn plain_utf8_body_is_verbatim(lines in prop::collection::vec("\\PC{0,40}", 0..8)) {
        let body = lines.join("\r\n");
        let raw = format!("Content-Type: text/plain; charset=utf-8\r\n\r\n{body}");

        let (text, _) = parse_email(&raw).unwrap();
        prop_assert_eq!(text, body.replace("\r\n", "\n").trim().to_string());
    }

    #[test]
    fn base64_body_round_trips(content in "\\PC{1,300}") {
        let encoded = STANDARD.encode(content.trim());
        let raw = format!(
            "Content-Type: text/plain; charset=utf-8\r\n\
             Content-Transfer-Encoding: base64\r\n\r\n{}\r\n",
            wrap_base64(&encoded)
        );

        let (text, _) = parse_email(&raw).unwrap();
        prop_assert_eq!(STANDARD.encode(text), encoded);
    }

    #[test]
    fn repeated_headers_keep_every_value_in_order(
        values in prop::collection::vec("[a-zA-Z0-9]([a-zA-Z0-9 ]{0,18}[a-zA-Z0-9])?", 1..10)
    ) {
        let mut raw = String::new();
        for value in &values {
            raw.push_str(&format!("X-Tag: {value}\r\n"));
        }
        raw.push_str("\r\nbody");

        let (_, headers) = parse_email(&raw).unwrap();
        prop_assert_eq!(&headers["X-Tag"], values.as_slice());
    }
}

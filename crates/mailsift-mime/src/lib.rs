//! # mailsift-mime
//!
//! Best-effort plain text and header extraction from raw email messages.
//!
//! ## Features
//!
//! - **Headers**: RFC 822 header block framing with folded lines and
//!   RFC 2047 encoded-word decoding
//! - **Bodies**: Base64 and Quoted-Printable transfer decoding
//! - **Charsets**: UTF-8, US-ASCII, ISO-8859-1, `Shift_JIS`, EUC-JP, ISO-2022-JP
//! - **Multipart**: Recursive walk over mixed, alternative and related parts,
//!   taking the first part that yields text
//! - **HTML**: Tag stripping and entity unescaping when only HTML is present
//!
//! ## Quick Start
//!
//! ```
//! use mailsift_mime::parse_email;
//!
//! let raw = "From: A <a@x.com>\r\n\
//!            Subject: =?UTF-8?Q?Hello=3F?=\r\n\
//!            \r\n\
//!            Hi there.";
//!
//! let (body, headers) = parse_email(raw)?;
//! assert_eq!(body, "Hi there.");
//! assert_eq!(headers.subject(), Some("Hello?"));
//! # Ok::<(), mailsift_mime::ParseError>(())
//! ```
//!
//! ### Configuration
//!
//! ```
//! use mailsift_mime::{Config, Parser};
//!
//! let parser = Parser::new(Config::builder().max_depth(8).html_fallback(false).build());
//! let (body, _headers) = parser.parse(b"\r\nplain body")?;
//! assert_eq!(body, "plain body");
//! # Ok::<(), mailsift_mime::ParseError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod body;
mod config;
mod content_type;
mod error;
mod header;
mod message;
mod rfc2047;

pub mod charset;
pub mod encoding;
pub mod html;

pub use address::Mailbox;
pub use body::{BodyPart, Container, Leaf, extract_plain_text, extract_plain_text_with};
pub use charset::Charset;
pub use config::{Config, ConfigBuilder, DEFAULT_MAX_DEPTH};
pub use content_type::ContentType;
pub use error::{ExtractError, ExtractResult, ParseError, Result};
pub use header::{HeaderMap, RawHeader, split_header_block};
pub use message::{Parser, TransferEncoding, parse_email};
pub use rfc2047::decode_header_value;

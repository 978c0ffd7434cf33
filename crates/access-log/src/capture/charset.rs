//! Character set resolution for captured body buffers.

use encoding_rs::{Encoding, REPLACEMENT, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

/// Resolves a character set by name or label.
///
/// Returns UTF-8 when the name is missing or not recognized; never fails.
/// Labels that only map to the replacement encoding (`ISO-2022-KR`,
/// `HZ-GB-2312`, ...) count as unrecognized. Plain `UTF-16` resolves to
/// big-endian, the byte order assumed when no BOM is present.
pub fn resolve_charset(name: Option<&str>) -> &'static Encoding {
    let Some(label) = name.map(str::trim) else {
        return UTF_8;
    };
    if label.eq_ignore_ascii_case("utf-16") {
        return UTF_16BE;
    }
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) if encoding != REPLACEMENT => encoding,
        _ => UTF_8,
    }
}

/// Decodes captured bytes. Malformed sequences become U+FFFD.
///
/// A leading BOM overrides the byte order of UTF-16 charsets; other
/// charsets decode the bytes as given.
pub fn decode(bytes: &[u8], charset: &'static Encoding) -> String {
    let text = if charset == UTF_16BE || charset == UTF_16LE {
        charset.decode(bytes).0
    } else {
        charset.decode_without_bom_handling(bytes).0
    };
    text.into_owned()
}

/// Encodes text in the given character set.
///
/// UTF-16 variants encode as UTF-8, matching what `encoding_rs` can write.
pub fn encode<'a>(text: &'a str, charset: &'static Encoding) -> Cow<'a, [u8]> {
    let (bytes, _, _) = charset.encode(text);
    bytes
}

//! URL canonicalization and display-name extraction.
//!
//! Two URLs that point at the same resource should map to the same stored
//! record, so every submitted URL is rewritten into a single canonical form
//! before it is validated or looked up.

use percent_encoding::{percent_decode, percent_encode_byte};
use tracing::debug;
use url::Url;

/// Scheme prepended to input that has no `://` separator.
pub const DEFAULT_SCHEME: &str = "http";

/// Escaped path bytes that must stay escaped because decoding them would
/// change how the path is split.
const STRUCTURAL_PATH_BYTES: &[u8] = b"/?%#";

/// Canonicalizes a URL using [`DEFAULT_SCHEME`] for scheme-less input.
///
/// See [`canonicalize_with_scheme`].
pub fn canonicalize(input: &str) -> String {
    canonicalize_with_scheme(input, DEFAULT_SCHEME)
}

/// Canonicalizes a URL into a stable, comparable form.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is stripped
/// 2. **Scheme**: `default_scheme://` is prepended when no `://` is present
/// 3. **Case**: Scheme and host are lowercased
/// 4. **Path**: Percent-encoded per RFC 3986 (UTF-8), escapes uppercased,
///    needless escapes of safe characters decoded
/// 5. **Query**: Parameters with blank values dropped, the rest sorted by
///    key then value and re-encoded (spaces become `+`)
/// 6. **Fragment**: Preserved; an empty trailing `#` is dropped
///
/// Input the URL parser rejects is returned trimmed and scheme-prefixed so the
/// validator can report a meaningful error for it.
///
/// The function is idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(canonicalize("HTTP://www.Example.com/"), "http://www.example.com/");
/// assert_eq!(canonicalize("example.com/?b=2&a=1"), "http://example.com/?a=1&b=2");
/// ```
pub fn canonicalize_with_scheme(input: &str, default_scheme: &str) -> String {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{default_scheme}://{trimmed}")
    };

    let mut url = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(e) => {
            debug!("Leaving unparsable URL {:?} as-is: {}", candidate, e);
            return candidate;
        }
    };

    if !url.cannot_be_a_base() {
        let path = normalize_path(url.path());
        url.set_path(&path);
    }

    let query = url.query().map(normalize_query).filter(|q| !q.is_empty());
    url.set_query(query.as_deref());

    if url.fragment() == Some("") {
        url.set_fragment(None);
    }

    url.to_string()
}

/// Re-encodes a URL path so every byte has exactly one representation.
fn normalize_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(decoded) = decode_hex_pair(bytes.get(i + 1), bytes.get(i + 2))
        {
            push_path_byte(&mut out, decoded, STRUCTURAL_PATH_BYTES.contains(&decoded));
            i += 3;
            continue;
        }

        push_path_byte(&mut out, bytes[i], false);
        i += 1;
    }

    out
}

fn push_path_byte(out: &mut String, byte: u8, keep_escaped: bool) {
    if !keep_escaped && is_path_safe(byte) {
        out.push(byte as char);
    } else {
        out.push_str(percent_encode_byte(byte));
    }
}

/// RFC 3986 unreserved and reserved characters that may appear raw in a path.
fn is_path_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@/[]|".contains(&byte)
}

fn decode_hex_pair(high: Option<&u8>, low: Option<&u8>) -> Option<u8> {
    let high = (*high? as char).to_digit(16)?;
    let low = (*low? as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

/// Drops blank-valued parameters, sorts the rest and re-serializes them.
///
/// Keys and values are compared and re-encoded as raw bytes, so escapes that
/// are not valid UTF-8 survive unchanged.
fn normalize_query(query: &str) -> String {
    let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_query_part(key), decode_query_part(value)),
            None => (decode_query_part(pair), Vec::new()),
        })
        .filter(|(_, value)| !value.is_empty())
        .collect();

    pairs.sort();

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_query_part(key), encode_query_part(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Form-decodes one key or value: `+` is a space, escapes become bytes.
fn decode_query_part(part: &str) -> Vec<u8> {
    let spaced = part.replace('+', " ");
    percent_decode(spaced.as_bytes()).collect()
}

/// Form-encodes one key or value with the same unreserved set as paths.
fn encode_query_part(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    for &byte in bytes {
        match byte {
            b' ' => out.push('+'),
            b if b.is_ascii_alphanumeric() || b"-._~".contains(&b) => out.push(b as char),
            b => out.push_str(percent_encode_byte(b)),
        }
    }

    out
}

/// Builds a human-readable site name from a URL.
///
/// Takes the host segment (between the scheme separator and the first `/`),
/// keeps the dot-separated labels longer than three characters, title-cases
/// them and joins them in reverse order.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(hostname("https://maps.example.com/"), "Example Maps");
/// assert_eq!(hostname("example.com.au/"), "Example");
/// assert_eq!(hostname(""), "");
/// ```
pub fn hostname(url: &str) -> String {
    let start = url.find("://").map_or(0, |idx| idx + 3);
    let rest = &url[start..];
    let host = rest.find('/').map_or(rest, |end| &rest[..end]);

    host.split('.')
        .filter(|label| label.chars().count() > 3)
        .rev()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first letter of every alphabetic run, lowercases the rest.
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut previous_is_letter = false;

    for ch in word.chars() {
        if previous_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }

    out
}

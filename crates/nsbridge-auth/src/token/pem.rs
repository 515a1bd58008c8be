//! Strict PEM normalization.
//!
//! Private keys delivered through JSON configuration often arrive with literal
//! `\n` escapes, CRLF line endings, lost line breaks or stray indentation.
//! [`normalize_pem`] rebuilds a canonical PEM document from whatever base64
//! body is present:
//!
//! 1. trim surrounding whitespace
//! 2. turn literal `\r\n` and `\n` escapes, and bare CR, into LF
//! 3. drop every `-----BEGIN ...-----` / `-----END ...-----` marker
//! 4. remove all remaining whitespace
//! 5. re-wrap the body at 64 characters per line
//! 6. frame it with the requested label
//!
//! Normalization never fails; a body that is not a valid key is reported by
//! the signer when it tries to parse the result.

use std::fmt;

/// Line width of a PEM body (RFC 7468).
pub const PEM_LINE_WIDTH: usize = 64;

/// Label for PKCS#8 private keys.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// A PEM document in canonical form.
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedPem(String);

impl NormalizedPem {
    /// Returns the PEM text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the PEM text as bytes, as expected by key parsers.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

// Key material must not end up in logs.
impl fmt::Debug for NormalizedPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NormalizedPem(<redacted>)")
    }
}

/// Normalizes `raw` into strict PEM framed by `label`.
#[must_use]
pub fn normalize_pem(raw: &str, label: &str) -> NormalizedPem {
    let unescaped = raw
        .trim()
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace('\r', "\n");

    let without_markers = strip_markers(&unescaped);
    let body: String = without_markers
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut out =
        String::with_capacity(body.len() + body.len() / PEM_LINE_WIDTH + 2 * label.len() + 40);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    // Chunk on chars; input is not guaranteed to be ASCII.
    let chars: Vec<char> = body.chars().collect();
    for line in chars.chunks(PEM_LINE_WIDTH) {
        out.extend(line.iter());
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");

    NormalizedPem(out)
}

/// Removes every `-----BEGIN <label>-----` and `-----END <label>-----` marker.
///
/// A label is one or more characters other than `-`. Dash runs that do not
/// form a complete marker are left in place.
fn strip_markers(input: &str) -> String {
    const DASHES: &str = "-----";
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(DASHES) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + DASHES.len()..];
        match marker_len(candidate) {
            Some(len) => rest = &candidate[len..],
            None => {
                out.push('-');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// If `s` starts with `BEGIN <label>-----` or `END <label>-----`, returns the
/// byte length of that text.
fn marker_len(s: &str) -> Option<usize> {
    let keyword_len = if s.starts_with("BEGIN ") {
        "BEGIN ".len()
    } else if s.starts_with("END ") {
        "END ".len()
    } else {
        return None;
    };
    let label_len = s[keyword_len..].find('-')?;
    if label_len == 0 || !s[keyword_len + label_len..].starts_with("-----") {
        return None;
    }
    Some(keyword_len + label_len + "-----".len())
}

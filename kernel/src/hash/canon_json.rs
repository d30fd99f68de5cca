//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted by UTF-16 code unit order (§5, §6).
//! 2. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 3. Strings are JSON-escaped per RFC 8259 §7.
//! 4. Numbers are serialized via their shortest deterministic decimal form;
//!    NaN/Infinity cannot occur (`serde_json::Number` excludes them).
//! 5. `null`, `true`, `false` are written literally.
//! 6. Arrays preserve order. Output is always valid UTF-8.
//! 7. Cyclic references are not representable in `serde_json::Value` and so
//!    cannot occur; §6's "become undefined" rule is therefore vacuous here.

use std::cmp::Ordering;
use std::io::Write;

/// Error type for canonical JSON serialization.
///
/// Reserved for forward compatibility; the current implementation has no
/// failure mode (`serde_json::Value` cannot hold NaN/Infinity/cycles), but
/// keeping the `Result` boundary matches how every other kernel entry point
/// reports failure and leaves room for a future structured-number backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// Reserved; currently unreachable.
    Unreachable,
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "canonical JSON serialization error")
    }
}

impl std::error::Error for CanonError {}

/// Compare two strings by UTF-16 code unit order, per the hashing
/// specification's total order over mapping keys.
#[must_use]
pub fn utf16_cmp(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// This is the single canonical JSON implementation in the workspace.
/// All hashing/digest flows that involve JSON must use this function.
///
/// # Errors
///
/// Currently infallible; the `Result` is kept for API stability.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) {
    match value {
        serde_json::Value::Null => buf.extend_from_slice(b"null"),
        serde_json::Value::Bool(b) => {
            buf.extend_from_slice(if *b { b"true" } else { b"false" });
        }
        serde_json::Value::Number(n) => {
            let _ = write!(buf, "{n}");
        }
        serde_json::Value::String(s) => write_string(buf, s),
        serde_json::Value::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item);
            }
            buf.push(b']');
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_by(|a, b| utf16_cmp(a, b));

            buf.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, &map[*key]);
            }
            buf.push(b'}');
        }
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if c < '\u{0020}' => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut utf8_buf = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8_buf).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

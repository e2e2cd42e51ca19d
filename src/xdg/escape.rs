// Copyright 2025 Laurent Pireyn
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! URI escaping for the `Path=` entry of a `.trashinfo` file.
//!
//! RFC 2396 percent-encoding, with the deliberate exception that `/` is
//! passed through unescaped: it is a legal separator in the stored value,
//! and every trash implementation and the freedesktop.org trash spec
//! itself does the same (see `DESIGN.md`).

/// Return true if `byte` is in the unreserved set and can be written verbatim.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// Percent-encode `path` per RFC 2396, preserving `/`.
///
/// The input is treated as an opaque byte sequence (via its UTF-8
/// representation): non-ASCII UTF-8 continuation bytes are escaped
/// byte-by-byte, never as whole code points.
pub(crate) fn escape(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for &byte in path.as_bytes() {
        if byte == b'/' || is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Decode a value previously produced by [`escape`].
///
/// Returns `None` if the decoded bytes are not valid UTF-8; a conforming
/// `.trashinfo` file never produces this, but a hand-edited or foreign one
/// might.
pub(crate) fn unescape(encoded: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(encoded.len());
    let mut chars = encoded.bytes();
    while let Some(byte) = chars.next() {
        if byte == b'%' {
            let hi = chars.next()?;
            let lo = chars.next()?;
            let value = u8::from_str_radix(std::str::from_utf8(&[hi, lo]).ok()?, 16).ok()?;
            bytes.push(value);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_preserves_slash_and_unreserved() {
        assert_eq!(escape("/tmp/u/notes.txt"), "/tmp/u/notes.txt");
        assert_eq!(escape("/a-b_c.d!e~f*g'h(i)"), "/a-b_c.d!e~f*g'h(i)");
    }

    #[test]
    fn test_escape_spaces_and_percent() {
        assert_eq!(escape("/tmp/u/a file %.txt"), "/tmp/u/a%20file%20%25.txt");
    }

    #[test]
    fn test_escape_non_ascii_byte_by_byte() {
        // 'é' is the two UTF-8 bytes 0xC3 0xA9.
        assert_eq!(escape("/tmp/café"), "/tmp/caf%C3%A9");
    }

    #[test]
    fn test_round_trip_arbitrary_bytes() {
        let samples = [
            "/tmp/u/notes.txt",
            "/tmp/u/a file %.txt",
            "/tmp/café/日本語.txt",
            "/",
            "",
            "/a/b/c/../d",
        ];
        for sample in samples {
            let escaped = escape(sample);
            assert_eq!(unescape(&escaped).as_deref(), Some(sample));
        }
    }

    #[test]
    fn test_no_null_bytes_in_output() {
        let escaped = escape("/tmp/\0hidden");
        assert!(!escaped.contains('\0'));
    }
}

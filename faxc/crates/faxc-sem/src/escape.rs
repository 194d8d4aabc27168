//! Escape-sequence interpretation for char/string literals.
//!
//! The scanner only recognises *where* a char/string token ends; it does not
//! interpret backslash escapes. This module decodes the quoted lexeme's
//! contents once the parser has isolated a complete token.

/// Decodes the body of a char or string literal (the token text with its
/// surrounding quotes already stripped) into raw bytes. An unrecognised
/// escape is reported via the returned error, naming the offending
/// character, so the caller can raise `E_SEMANTIC_UNKNOWN_ESCAPE`.
pub fn decode_escapes(body: &str) -> Result<Vec<u8>, char> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push(b'\\');
            break;
        };
        let byte = match escaped {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            '0' => 0,
            '\\' => b'\\',
            '\'' => b'\'',
            '"' => b'"',
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'v' => 0x0b,
            other => return Err(other),
        };
        out.push(byte);
    }
    Ok(out)
}

/// Decodes a single char constant's body to the one byte it denotes. Char
/// constants containing more than one (decoded) byte are an error identified
/// by the caller (this module only decodes; multi-char diagnostics are the
/// codegen's job since they need a span).
pub fn decode_char_constant(body: &str) -> Result<u8, char> {
    let bytes = decode_escapes(body)?;
    Ok(bytes.first().copied().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_escapes("abc").unwrap(), b"abc");
    }

    #[test]
    fn known_escapes_decode() {
        assert_eq!(decode_escapes(r"a\nb").unwrap(), b"a\nb");
        assert_eq!(decode_escapes(r"\t").unwrap(), b"\t");
        assert_eq!(decode_escapes(r"\\").unwrap(), b"\\");
        assert_eq!(decode_escapes(r#"\""#).unwrap(), b"\"");
    }

    #[test]
    fn unknown_escape_is_an_error() {
        assert_eq!(decode_escapes(r"\q"), Err('q'));
    }

    #[test]
    fn char_constant_decodes_single_byte() {
        assert_eq!(decode_char_constant("a").unwrap(), b'a');
        assert_eq!(decode_char_constant(r"\n").unwrap(), b'\n');
    }
}

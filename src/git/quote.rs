//! Paths in git's C-style quoting.
//!
//! Without `-z`, `git status` wraps a path in double quotes when it contains
//! a quote, a backslash, a control character, a space (porcelain v1) or a
//! byte above 0x7f (with the default `core.quotePath`). Inside the quotes,
//! special characters use backslash escapes and other bytes use three-digit
//! octal escapes.

use super::decode::Decoder;

/// Read a quoted path at the start of `field`.
///
/// Returns the unescaped path and the text after the closing quote, or
/// `None` if `field` doesn't start with a quote or the quoting is broken.
pub fn take_quoted(field: &str) -> Option<(String, &str)> {
    let bytes = field.as_bytes();
    if bytes.first() != Some(&b'"') {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some((Decoder::default().decode(&out), &field[i + 1..])),
            b'\\' => {
                let (byte, len) = unescape(&bytes[i + 1..])?;
                out.push(byte);
                i += 1 + len;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    None
}

/// A whole field: quoted (nothing may follow the closing quote) or bare.
pub fn unquote(field: &str) -> Option<String> {
    if !field.starts_with('"') {
        return Some(field.to_string());
    }
    match take_quoted(field)? {
        (path, "") => Some(path),
        _ => None,
    }
}

/// One escape sequence after a backslash: the byte it stands for and how
/// many input bytes it used.
fn unescape(rest: &[u8]) -> Option<(u8, usize)> {
    let byte = match *rest.first()? {
        b'a' => 0x07,
        b'b' => 0x08,
        b't' => b'\t',
        b'n' => b'\n',
        b'v' => 0x0b,
        b'f' => 0x0c,
        b'r' => b'\r',
        b'"' => b'"',
        b'\\' => b'\\',
        d @ b'0'..=b'3' => {
            let digits = rest.get(1..3)?;
            if !digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                return None;
            }
            let value = (d - b'0') * 64 + (digits[0] - b'0') * 8 + (digits[1] - b'0');
            return Some((value, 3));
        }
        _ => return None,
    };
    Some((byte, 1))
}

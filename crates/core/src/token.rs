// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reversible filesystem-safe tokens.
//!
//! Result files are often named after free-form case descriptions.
//! [`to_token`] turns an arbitrary string into something safe to embed
//! in a filename: characters outside `[A-Za-z0-9_-. ]` become `0xNN`
//! hex escapes and the whole thing is wrapped in parentheses. Purely
//! alphanumeric strings pass through untouched. [`from_token`] decodes.
//!
//! Round-trip holds for every string whose characters fit in one byte;
//! code points above U+00FF collapse to `0xa8`.

/// Substitute for characters that do not fit in one byte.
const ESCAPE_FALLBACK: u8 = 0xa8;

fn needs_escape(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
}

/// Encode a string as a filesystem-safe token.
///
/// A literal `0x` is doubled to `0xx` before escaping so the decoder
/// can tell it apart from an escape sequence.
pub fn to_token(s: &str) -> String {
    if s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return s.to_string();
    }

    let doubled = s.replace("0x", "0xx");
    let mut out = String::with_capacity(doubled.len() + 2);
    out.push('(');
    for c in doubled.chars() {
        if needs_escape(c) {
            let code = u32::from(c);
            let byte = if code > 0xff {
                ESCAPE_FALLBACK
            } else {
                code as u8
            };
            out.push_str(&format!("0x{byte:02x}"));
        } else {
            out.push(c);
        }
    }
    out.push(')');
    out
}

/// Decode a token produced by [`to_token`].
///
/// Strings not wrapped in parentheses were never escaped and pass
/// through unchanged.
pub fn from_token(token: &str) -> String {
    let inner = match token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
    {
        Some(inner) => inner,
        None => return token.to_string(),
    };

    let chars: Vec<char> = inner.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '0' && i + 1 < chars.len() && chars[i + 1] == 'x' {
            // `0xx` is an escaped literal `0x`
            if i + 2 < chars.len() && chars[i + 2] == 'x' {
                out.push_str("0x");
                i += 3;
                continue;
            }
            if i + 3 < chars.len() {
                let digits = (chars[i + 2].to_digit(16), chars[i + 3].to_digit(16));
                if let (Some(hi), Some(lo)) = digits {
                    out.push(char::from((hi * 16 + lo) as u8));
                    i += 4;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;

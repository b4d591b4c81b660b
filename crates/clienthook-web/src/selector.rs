#![forbid(unsafe_code)]

//! CSS attribute selectors for bound-element lookup.
//!
//! State names are arbitrary strings, so they are quoted and escaped as CSS
//! strings; the marker attribute is escaped as a CSS identifier. Without
//! this a name containing `"` or `]` would make `querySelectorAll` throw.
//!
//! No JS/WASM types here.

/// Build `[attribute="name"]` with both parts escaped.
#[must_use]
pub fn attribute_selector(attribute: &str, name: &str) -> String {
    format!("[{}=\"{}\"]", escape_ident(attribute), escape_string(name))
}

/// Escape a value for use inside a double-quoted CSS string.
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() => push_code_point(&mut out, c),
            c => out.push(c),
        }
    }
    out
}

/// Escape a CSS identifier, following `CSS.escape`.
#[must_use]
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();
    for (idx, &ch) in chars.iter().enumerate() {
        let leading_digit = ch.is_ascii_digit()
            && (idx == 0 || (idx == 1 && chars[0] == '-'));
        match ch {
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() || leading_digit => push_code_point(&mut out, c),
            '-' if idx == 0 && chars.len() == 1 => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                out.push(c);
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn push_code_point(out: &mut String, ch: char) {
    out.push_str(&format!("\\{:x} ", u32::from(ch)));
}

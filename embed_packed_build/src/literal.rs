//! Renders compressed bytes as a Rust byte-string declaration.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Prefix that makes any mangled identifier a legal static name.
pub const SYMBOL_PREFIX: &str = "EMBED_";

/// The static name a mangled identifier is bound to in generated source.
#[must_use]
pub fn symbol(identifier: &str) -> String {
    format!("{SYMBOL_PREFIX}{identifier}")
}

/// Renders `bytes` as `b"\xNN..."`, one escape per byte with no wrapping.
#[must_use]
pub fn byte_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4 + 3);
    out.push_str("b\"");
    for &byte in bytes {
        out.push_str("\\x");
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    out.push('"');
    out
}

/// Declares a static named after `identifier` holding `bytes`.
#[must_use]
pub fn encode(bytes: &[u8], identifier: &str) -> String {
    format!(
        "#[allow(non_upper_case_globals)]\nstatic {}: &[u8] = {};\n",
        symbol(identifier),
        byte_string(bytes)
    )
}

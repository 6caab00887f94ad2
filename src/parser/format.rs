//! Legacy formatting codes
//!
//! The server colors text in-band with `§` followed by one code character
//! (`§a` green, `§l` bold, `§r` reset, ...).

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker that starts a formatting code
pub const FORMAT_MARKER: char = '§';

static FORMAT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new("§.").unwrap());

/// Remove every formatting code (marker plus the following character)
pub fn strip_formatting_codes(text: &str) -> String {
    if !text.contains(FORMAT_MARKER) {
        return text.to_string();
    }
    FORMAT_CODE.replace_all(text, "").into_owned()
}

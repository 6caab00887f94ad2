//! World list parsing (`worlds`)
//!
//! Output varies between server builds ("- world (DIM0): Loaded", bare
//! names, bullets), so each line contributes its first word token.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::format::strip_formatting_codes;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Loaded worlds in reply order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldList {
    pub worlds: Vec<String>,
}

/// Collect the leading word token of every non-empty line
pub fn parse_world_list(text: &str) -> WorldList {
    let clean = strip_formatting_codes(text);

    let worlds = clean
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| WORD.find(line))
        .map(|m| m.as_str().to_string())
        .collect();

    WorldList { worlds }
}

//! Player list parsing (`list`)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::format::strip_formatting_codes;

static PLAYER_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"There are ([0-9]+) of a max of ([0-9]+) players online:\s*(.*)").unwrap()
});

/// Online players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerList {
    pub online: u32,
    pub max: u32,
    pub players: Vec<String>,
}

impl Default for PlayerList {
    fn default() -> Self {
        Self {
            online: 0,
            max: 20,
            players: Vec::new(),
        }
    }
}

/// Parse "There are {online} of a max of {max} players online: {names}"
pub fn parse_player_list(text: &str) -> PlayerList {
    let clean = strip_formatting_codes(text);

    let Some(caps) = PLAYER_LIST.captures(&clean) else {
        return PlayerList::default();
    };

    let (Ok(online), Ok(max)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return PlayerList::default();
    };

    let players = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    PlayerList {
        online,
        max,
        players,
    }
}

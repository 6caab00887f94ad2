//! Tick-rate and tick-duration parsing
//!
//! Both replies are three numbers in a fixed order; everything else in the
//! text is decoration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::format::strip_formatting_codes;

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\.?[0-9]*").unwrap());

/// Ticks per second averaged over three windows (`tps`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRate {
    pub one_minute: f64,
    pub five_minute: f64,
    pub fifteen_minute: f64,
}

impl Default for TickRate {
    /// Nominal healthy server
    fn default() -> Self {
        Self {
            one_minute: 20.0,
            five_minute: 20.0,
            fifteen_minute: 20.0,
        }
    }
}

/// Milliseconds per tick averaged over three windows (`mspt`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickDuration {
    pub five_second: f64,
    pub ten_second: f64,
    pub sixty_second: f64,
}

/// Parse a `tps` reply; fewer than three numbers yields 20.0 across the board
pub fn parse_tick_rate(text: &str) -> TickRate {
    match first_three_numbers(text) {
        Some([one_minute, five_minute, fifteen_minute]) => TickRate {
            one_minute,
            five_minute,
            fifteen_minute,
        },
        None => TickRate::default(),
    }
}

/// Parse an `mspt` reply; fewer than three numbers yields zeros
pub fn parse_tick_duration(text: &str) -> TickDuration {
    match first_three_numbers(text) {
        Some([five_second, ten_second, sixty_second]) => TickDuration {
            five_second,
            ten_second,
            sixty_second,
        },
        None => TickDuration::default(),
    }
}

fn first_three_numbers(text: &str) -> Option<[f64; 3]> {
    let clean = strip_formatting_codes(text);
    let mut numbers = DECIMAL
        .find_iter(&clean)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    Some([numbers.next()?, numbers.next()?, numbers.next()?])
}

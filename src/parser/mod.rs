//! Response Parsers
//!
//! Turn replies to well-known server commands into structured values.
//!
//! Every parser strips legacy formatting codes first and never fails:
//! text without the expected structure yields the documented fallback.
//!
//! | Command | Parser                 | Fallback             |
//! |---------|------------------------|----------------------|
//! | `tps`   | [`parse_tick_rate`]    | `20.0, 20.0, 20.0`   |
//! | `mspt`  | [`parse_tick_duration`]| `0.0, 0.0, 0.0`      |
//! | `list`  | [`parse_player_list`]  | `0` of `20`, no names|
//! | `worlds`| [`parse_world_list`]   | no worlds            |

mod format;
mod players;
mod tick;
mod worlds;

pub use format::{strip_formatting_codes, FORMAT_MARKER};
pub use players::{parse_player_list, PlayerList};
pub use tick::{parse_tick_duration, parse_tick_rate, TickDuration, TickRate};
pub use worlds::{parse_world_list, WorldList};

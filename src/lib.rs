#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;

mod bookmark;
mod collection;
mod command;
mod config;
mod direction;
mod event;
mod history;
mod level;
mod level_map;
mod move_;
mod move_sequence;
mod play_field;
mod position;
mod progress;
mod util;

pub use crate::bookmark::*;
pub use crate::collection::*;
pub use crate::command::*;
pub use crate::config::*;
pub use crate::direction::*;
pub use crate::event::*;
pub use crate::history::*;
pub use crate::level::*;
pub use crate::level_map::pathfinding::*;
pub use crate::level_map::*;
pub use crate::move_::*;
pub use crate::move_sequence::*;
pub use crate::play_field::*;
pub use crate::position::*;
pub use crate::progress::*;
pub use crate::util::*;

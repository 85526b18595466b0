pub mod combat;
pub mod config;
pub mod data;
pub mod ecs;
pub mod logging;
pub mod map;
pub mod player;
pub mod scripted_input;
pub mod session;
pub mod spatial;

pub use config::{ConfigError, GameConfig};
pub use data::CharacterClass;
pub use ecs::components::Stats;
pub use session::{Direction, MoveOutcome, Phase, Session, Snapshot};

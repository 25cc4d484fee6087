//! Deterministic simulation core for the platformer: physics, actors, stages and the
//! run state machine. Rendering goes through the [`draw::Canvas`] trait so the same
//! code runs in a browser shell, a headless runner and tests.

pub mod collectible;
pub mod collision;
pub mod config;
pub mod constants;
pub mod draw;
pub mod enemy;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod level;
pub mod particle;
pub mod platform;
pub mod player;
pub mod rng;

pub use config::GameConfig;
pub use draw::{Canvas, Color, CommandList, DrawCommand, NullCanvas};
pub use error::{InputScriptError, LevelError, SimError};
pub use events::{GameEvent, SoundCue};
pub use game::{Game, GameSnapshot, GameState};
pub use input::{FrameInput, InputScript, InputState, Key};
pub use level::{builtin_layouts, Level, StageLayout};

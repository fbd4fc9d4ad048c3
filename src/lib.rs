//! Headless turn-based dungeon simulation: room-and-corridor maps, wall and
//! doorway classification, circular field of view, and a per-entity system
//! pipeline over a `specs` world.

pub mod ai;
pub mod config;
pub mod data;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod input;
pub mod map;

pub use config::{EngineConfig, MapConfig, MapStrategyKind};
pub use engine::{ActorView, Engine, TileManager};
pub use error::{EngineError, Result};
pub use input::PlayerInput;
pub use map::{Glyph, GlyphGrid, OccupancyGrid};

//! Tilt Cannon - a single-screen arcade game
//!
//! Core modules:
//! - `session`: the fixed-timestep game loop and its state machine
//! - `store`, `spawner`, `collision`: what a tick does
//! - `commands`: the input queue drained between ticks
//! - `sensor`, `audio`, `highscore`: collaborators behind traits
//! - `renderer`, `input`, `app`: the terminal front end

pub use collision::{EndCause, Hit, Hitbox};
pub use commands::{Command, CommandQueue, CommandSender};
pub use config::{GameConfig, RuntimeConfig, Size};
pub use entities::{Cannon, EntityId, Obstacle, Projectile};
pub use session::{Game, GameEvent, Phase};
pub use snapshot::{Position, Snapshot};
pub use spawner::Spawner;
pub use store::EntityStore;

pub mod app;
pub mod audio;
pub mod collision;
pub mod commands;
pub mod config;
pub mod entities;
pub mod highscore;
pub mod input;
pub mod renderer;
pub mod sensor;
pub mod session;
pub mod snapshot;
pub mod spawner;
pub mod store;
pub mod ticker;

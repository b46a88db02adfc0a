// Library exports for testing
pub use campaign::Campaign;
pub use config::{Config, LevelSettings};
pub use controls::{Control, InputSource, NoInput, Side};
pub use cooldown::Cooldown;
pub use entities::{
    Difficulty, EnemyFormation, EnemyKind, EnemyShip, Entity, Item, Projectile, ProjectileLane,
    ProjectileOwner, Ship, Sprite, SpriteKind, Tier, collides,
};
pub use error::ConfigError;
pub use round::{GameRound, ItemEffect, Phase, PlayerSlot};
pub use state::GameState;
pub use view::RenderView;

pub mod app;
pub mod campaign;
pub mod config;
pub mod controls;
pub mod cooldown;
pub mod entities;
pub mod error;
pub mod input;
pub mod pool;
pub mod renderer;
pub mod round;
pub mod state;
pub mod view;

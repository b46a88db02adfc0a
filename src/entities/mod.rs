pub mod enemy;
pub mod formation;
pub mod item;
pub mod projectile;
pub mod ship;

pub use enemy::{EnemyKind, EnemyShip};
pub use formation::{Direction, EnemyFormation, EnemyId};
pub use item::Item;
pub use projectile::{
    Difficulty, Projectile, ProjectileLane, ProjectileOwner, Tier, TierSpec, Volley,
};
pub use ship::{Lean, Ship};

/// Sprite identity handed to the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ship(Lean),
    ShipDestroyed,
    EnemyA,
    EnemyB,
    EnemyC,
    EnemyBonus,
    Explosion,
    Bullet(Tier),
    Item,
}

/// Colour hint, mapped to a terminal colour by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    White,
    Red,
    Blue,
    Green,
    Yellow,
    Magenta,
    Cyan,
}

/// Everything that is drawn and collided: an axis-aligned box with a sprite.
pub trait Entity {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn sprite(&self) -> SpriteKind;
    fn tint(&self) -> Tint;

    fn to_sprite(&self) -> Sprite {
        Sprite {
            x: self.x(),
            y: self.y(),
            width: self.width(),
            height: self.height(),
            kind: self.sprite(),
            tint: self.tint(),
        }
    }
}

/// Flattened entity as seen by the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: SpriteKind,
    pub tint: Tint,
}

/// Box-overlap test on entity centers.
///
/// Two entities touch when their centers are closer than the sum of their
/// half-extents on both axes. Halves use integer division, and near-corner
/// contacts count as hits.
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Entity + ?Sized,
    B: Entity + ?Sized,
{
    let center_ax = a.x() + a.width() / 2;
    let center_ay = a.y() + a.height() / 2;
    let center_bx = b.x() + b.width() / 2;
    let center_by = b.y() + b.height() / 2;

    let max_distance_x = a.width() / 2 + b.width() / 2;
    let max_distance_y = a.height() / 2 + b.height() / 2;

    let distance_x = (center_ax - center_bx).abs();
    let distance_y = (center_ay - center_by).abs();

    distance_x < max_distance_x && distance_y < max_distance_y
}

use super::{Entity, SpriteKind, Tint};
use crate::pool::Recyclable;

/// Pixels an item falls per frame.
pub const ITEM_SPEED: i32 = 3;
pub const ITEM_WIDTH: i32 = 5 * 2;
pub const ITEM_HEIGHT: i32 = 5 * 2;

/// Falling pickup dropped by a destroyed enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub x: i32,
    pub y: i32,
    pub speed: i32,
}

impl Item {
    pub fn new(x: i32, y: i32, speed: i32) -> Self {
        Self { x, y, speed }
    }

    pub fn update(&mut self) {
        self.y += self.speed;
    }

    pub fn is_out_of_bounds(&self, max_y: i32) -> bool {
        self.y > max_y
    }
}

impl Entity for Item {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn width(&self) -> i32 {
        ITEM_WIDTH
    }

    fn height(&self) -> i32 {
        ITEM_HEIGHT
    }

    fn sprite(&self) -> SpriteKind {
        SpriteKind::Item
    }

    fn tint(&self) -> Tint {
        Tint::Cyan
    }
}

impl Recyclable for Item {
    type Spawn = (i32, i32, i32);

    fn spawn((x, y, speed): Self::Spawn) -> Self {
        Self::new(x, y, speed)
    }

    fn rearm(&mut self, (x, y, speed): Self::Spawn) {
        self.x = x;
        self.y = y;
        self.speed = speed;
    }

    fn reset(&mut self) {
        self.speed = 0;
    }
}

use super::{Entity, SpriteKind, Tint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Bottom rows
    A,
    /// Middle rows
    B,
    /// Top rows
    C,
    /// Bonus ship crossing the top of the screen
    Bonus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyShip {
    pub x: i32,
    pub y: i32,
    pub kind: EnemyKind,
    pub hit_points: u8,
    pub destroyed: bool,
    pub damage_flash_frames: u8,
}

impl EnemyShip {
    pub fn new(x: i32, y: i32, kind: EnemyKind, hit_points: u8) -> Self {
        Self {
            x,
            y,
            kind,
            hit_points: hit_points.max(1),
            destroyed: false,
            damage_flash_frames: 0,
        }
    }

    /// Bonus ship, always killed by a single hit.
    pub fn bonus(x: i32, y: i32) -> Self {
        Self::new(x, y, EnemyKind::Bonus, 1)
    }

    pub fn update(&mut self) {
        if self.damage_flash_frames > 0 {
            self.damage_flash_frames -= 1;
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Applies damage and reports whether the ship is out of hit points.
    pub fn take_damage(&mut self, damage: u8) -> bool {
        self.hit_points = self.hit_points.saturating_sub(damage);
        // Flash for 10 frames so multi-hit ships show they were struck
        self.damage_flash_frames = 10;
        self.hit_points == 0
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.hit_points = 0;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_flashing(&self) -> bool {
        self.damage_flash_frames > 0
    }

    pub fn get_points(&self) -> u32 {
        match self.kind {
            EnemyKind::A => 10,
            EnemyKind::B => 20,
            EnemyKind::C => 30,
            EnemyKind::Bonus => 100,
        }
    }
}

impl Entity for EnemyShip {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn width(&self) -> i32 {
        match self.kind {
            EnemyKind::Bonus => 16 * 2,
            _ => 12 * 2,
        }
    }

    fn height(&self) -> i32 {
        match self.kind {
            EnemyKind::Bonus => 7 * 2,
            _ => 8 * 2,
        }
    }

    fn sprite(&self) -> SpriteKind {
        if self.destroyed {
            return SpriteKind::Explosion;
        }
        match self.kind {
            EnemyKind::A => SpriteKind::EnemyA,
            EnemyKind::B => SpriteKind::EnemyB,
            EnemyKind::C => SpriteKind::EnemyC,
            EnemyKind::Bonus => SpriteKind::EnemyBonus,
        }
    }

    fn tint(&self) -> Tint {
        if self.is_flashing() || self.destroyed {
            return Tint::White;
        }
        match self.kind {
            EnemyKind::A => Tint::Green,
            EnemyKind::B => Tint::Yellow,
            EnemyKind::C => Tint::Magenta,
            EnemyKind::Bonus => Tint::Red,
        }
    }
}

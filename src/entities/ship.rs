use std::time::Duration;

use super::projectile::ProjectileLane;
use super::{Entity, SpriteKind, Tint};
use crate::cooldown::Cooldown;

pub const SHIP_WIDTH: i32 = 13 * 2;
pub const SHIP_HEIGHT: i32 = 8 * 2;

const SHIP_SPEED: i32 = 2;
const BULLET_SPEED: i32 = -6;
const SHOOTING_INTERVAL: Duration = Duration::from_millis(750);
const DESTRUCTION_DURATION: Duration = Duration::from_millis(1000);
const ITEM_FLASH_DURATION: Duration = Duration::from_millis(1000);

/// Which way the ship sprite leans, driven by the movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lean {
    Idle,
    Left,
    Right,
}

/// Player-controlled ship. Movement bounds belong to the round, not the ship.
#[derive(Debug, Clone)]
pub struct Ship {
    pub x: i32,
    pub y: i32,
    tint: Tint,
    speed: i32,
    bullet_speed: i32,
    shooting_interval: Duration,
    shooting_cooldown: Cooldown,
    destruction_cooldown: Cooldown,
    item_flash: Cooldown,
    /// Last upgrade collected: 0 none, 1 life, 2 fire rate, 3 speed.
    pub item_number: u8,
    /// Animation frame: 1 idle, 2 leaning left, 3 leaning right.
    pub anim_frame: u8,
    /// Showing the wreck sprite.
    wrecked: bool,
    game_over: bool,
}

impl Ship {
    pub fn new(x: i32, y: i32, tint: Tint) -> Self {
        Self {
            x,
            y,
            tint,
            speed: SHIP_SPEED,
            bullet_speed: BULLET_SPEED,
            shooting_interval: SHOOTING_INTERVAL,
            shooting_cooldown: Cooldown::new(SHOOTING_INTERVAL),
            destruction_cooldown: Cooldown::new(DESTRUCTION_DURATION),
            item_flash: Cooldown::new(ITEM_FLASH_DURATION),
            item_number: 0,
            anim_frame: 1,
            wrecked: false,
            game_over: false,
        }
    }

    /// Refreshes the sprite from the destruction timer. Never moves the ship.
    pub fn update(&mut self, now: Duration) {
        self.wrecked = self.is_destroyed(now);
    }

    pub fn move_left(&mut self) {
        self.x -= self.speed;
    }

    pub fn move_right(&mut self) {
        self.x += self.speed;
    }

    pub fn lean(&mut self, lean: Lean) {
        self.anim_frame = match lean {
            Lean::Idle => 1,
            Lean::Left => 2,
            Lean::Right => 3,
        };
    }

    pub fn leaning(&self) -> Lean {
        match self.anim_frame {
            2 => Lean::Left,
            3 => Lean::Right,
            _ => Lean::Idle,
        }
    }

    /// Fires one projectile from the nose of the ship if the shooting cooldown
    /// allows it. Returns whether a shot was fired.
    pub fn shoot(&mut self, lane: &mut ProjectileLane, now: Duration) -> bool {
        if !self.shooting_cooldown.check_finished(now) {
            return false;
        }

        self.shooting_cooldown.reset(now);
        lane.fire(self.x + self.width() / 2, self.y, self.bullet_speed);
        true
    }

    pub fn destroy(&mut self, now: Duration) {
        self.destruction_cooldown.reset(now);
        self.wrecked = true;
    }

    pub fn is_destroyed(&self, now: Duration) -> bool {
        !self.destruction_cooldown.check_finished(now)
    }

    /// Freezes the ship for the rest of the round. Irreversible.
    pub fn game_over(&mut self) {
        self.speed = 0;
        self.shooting_cooldown = Cooldown::never();
        self.game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn collect_item(&mut self, now: Duration) {
        self.item_flash.reset(now);
    }

    /// True while the last collected upgrade should be shown next to the ship.
    pub fn is_showing_item(&self, now: Duration) -> bool {
        self.item_number != 0 && !self.item_flash.check_finished(now)
    }

    pub fn get_speed(&self) -> i32 {
        self.speed
    }

    pub fn get_bullet_speed(&self) -> i32 {
        self.bullet_speed
    }

    pub fn get_shooting_interval(&self) -> Duration {
        self.shooting_interval
    }

    pub fn get_shooting_cooldown(&self) -> &Cooldown {
        &self.shooting_cooldown
    }

    pub fn set_speed(&mut self, speed: i32) {
        if self.game_over {
            return;
        }
        self.speed = speed;
    }

    /// Sets the time between shots and re-arms the cooldown with it.
    pub fn set_shooting_interval(&mut self, interval: Duration) {
        if self.game_over {
            return;
        }
        self.shooting_interval = interval;
        self.shooting_cooldown.set_duration(interval);
    }

    pub fn set_shooting_cooldown(&mut self, duration: Duration) {
        if self.game_over {
            return;
        }
        self.shooting_cooldown.set_duration(duration);
    }
}

impl Entity for Ship {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn width(&self) -> i32 {
        SHIP_WIDTH
    }

    fn height(&self) -> i32 {
        SHIP_HEIGHT
    }

    fn sprite(&self) -> SpriteKind {
        if self.wrecked {
            SpriteKind::ShipDestroyed
        } else {
            SpriteKind::Ship(self.leaning())
        }
    }

    fn tint(&self) -> Tint {
        self.tint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Tier;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_ship_new() {
        let ship = Ship::new(112, 490, Tint::Red);
        assert_eq!(ship.x, 112);
        assert_eq!(ship.y, 490);
        assert_eq!(ship.get_speed(), 2);
        assert_eq!(ship.get_bullet_speed(), -6);
        assert_eq!(ship.get_shooting_interval(), ms(750));
        assert_eq!(ship.item_number, 0);
        assert_eq!(ship.anim_frame, 1);
    }

    #[test]
    fn test_ship_movement_uses_speed() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        ship.move_left();
        assert_eq!(ship.x, 98);
        ship.set_speed(5);
        ship.move_right();
        assert_eq!(ship.x, 103);
    }

    #[test]
    fn test_ship_shoot_respects_cooldown() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        let mut lane = ProjectileLane::new(Tier::Plain);

        assert!(ship.shoot(&mut lane, ms(0)));
        assert_eq!(lane.live.len(), 1);
        assert_eq!(lane.live[0].x, 100 + SHIP_WIDTH / 2);
        assert_eq!(lane.live[0].y, 490);
        assert_eq!(lane.live[0].speed, -6);

        assert!(!ship.shoot(&mut lane, ms(749)));
        assert_eq!(lane.live.len(), 1);

        assert!(ship.shoot(&mut lane, ms(750)));
        assert_eq!(lane.live.len(), 2);
    }

    #[test]
    fn test_ship_destroyed_until_cooldown_elapses() {
        let mut ship = Ship::new(100, 490, Tint::Blue);
        ship.destroy(ms(2000));
        assert!(ship.is_destroyed(ms(2000)));
        assert!(ship.is_destroyed(ms(2999)));
        ship.update(ms(2500));
        assert_eq!(ship.sprite(), SpriteKind::ShipDestroyed);

        assert!(!ship.is_destroyed(ms(3000)));
        ship.update(ms(3000));
        assert_eq!(ship.sprite(), SpriteKind::Ship(Lean::Idle));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut ship = Ship::new(100, 490, Tint::Blue);
        let mut lane = ProjectileLane::new(Tier::Plain);
        ship.game_over();
        assert_eq!(ship.get_speed(), 0);
        assert!(!ship.shoot(&mut lane, ms(10_000_000)));

        // Upgrades no longer apply
        ship.set_speed(7);
        ship.set_shooting_interval(ms(300));
        assert_eq!(ship.get_speed(), 0);
        assert_eq!(ship.get_shooting_interval(), ms(750));
        assert!(!ship.get_shooting_cooldown().check_finished(ms(10_000_000)));
    }

    #[test]
    fn test_set_shooting_interval_rearms_cooldown() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        let mut lane = ProjectileLane::new(Tier::Plain);
        ship.set_shooting_interval(ms(300));
        assert!(ship.shoot(&mut lane, ms(0)));
        assert!(!ship.shoot(&mut lane, ms(299)));
        assert!(ship.shoot(&mut lane, ms(300)));
    }

    #[test]
    fn test_set_shooting_cooldown_keeps_interval() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        let mut lane = ProjectileLane::new(Tier::Plain);
        ship.set_shooting_cooldown(ms(200));
        assert_eq!(ship.get_shooting_interval(), ms(750));
        assert_eq!(ship.get_shooting_cooldown().duration(), ms(200));

        assert!(ship.shoot(&mut lane, ms(0)));
        assert!(ship.shoot(&mut lane, ms(200)));
    }

    #[test]
    fn test_lean_sets_animation_frame() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        ship.lean(Lean::Left);
        assert_eq!(ship.anim_frame, 2);
        assert_eq!(ship.sprite(), SpriteKind::Ship(Lean::Left));
        ship.lean(Lean::Right);
        assert_eq!(ship.anim_frame, 3);
        ship.lean(Lean::Idle);
        assert_eq!(ship.anim_frame, 1);
    }

    #[test]
    fn test_item_flash_expires() {
        let mut ship = Ship::new(100, 490, Tint::Red);
        ship.item_number = 3;
        ship.collect_item(ms(100));
        assert!(ship.is_showing_item(ms(500)));
        assert!(!ship.is_showing_item(ms(1100)));
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_shots_never_closer_than_interval(
                frames in prop::collection::vec(1u64..100, 1..100)
            ) {
                let mut ship = Ship::new(100, 490, Tint::Red);
                let mut lane = ProjectileLane::new(Tier::Plain);
                let mut now = 0;
                let mut last_shot: Option<u64> = None;
                for step in frames {
                    now += step;
                    if ship.shoot(&mut lane, ms(now)) {
                        if let Some(last) = last_shot {
                            prop_assert!(now - last >= 750);
                        }
                        last_shot = Some(now);
                    }
                }
            }
        }
    }
}

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::enemy::{EnemyKind, EnemyShip};
use super::projectile::{ProjectileLane, Volley};
use super::{Entity, Tier};
use crate::config::LevelSettings;
use crate::cooldown::Cooldown;

const INIT_POS_X: i32 = 20;
const INIT_POS_Y: i32 = 100;
const SEPARATION_DISTANCE: i32 = 40;
/// Share of rows, from the top, holding kind C ships.
const PROPORTION_C: f64 = 0.2;
/// Share of rows below those holding kind B ships.
const PROPORTION_B: f64 = 0.4;
const X_SPEED: i32 = 8;
const Y_SPEED: i32 = 4;
const BULLET_SPEED: i32 = 4;
const SHOOTING_VARIANCE: f64 = 0.2;
const SIDE_MARGIN: i32 = 20;
const BOTTOM_MARGIN: i32 = 80;
const DESCENT_DISTANCE: i32 = 20;
const MINIMUM_SPEED: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
}

/// Stable handle to a formation member, valid until the next movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyId {
    pub column: usize,
    pub row: usize,
}

/// Grid of enemy ships marching as one unit.
#[derive(Debug, Clone)]
pub struct EnemyFormation {
    /// Members by column, top to bottom.
    columns: Vec<Vec<EnemyShip>>,
    pub position_x: i32,
    pub position_y: i32,
    pub width: i32,
    pub height: i32,
    direction: Direction,
    previous_direction: Direction,
    /// Frames since the last movement step
    movement_interval: u32,
    /// Frames between movement steps
    movement_speed: u32,
    base_speed: u32,
    shooting_cooldown: Cooldown,
    initial_count: usize,
    ship_count: usize,
    screen_width: i32,
    screen_height: i32,
}

impl EnemyFormation {
    pub fn new(
        settings: &LevelSettings,
        tier: Tier,
        screen_width: i32,
        screen_height: i32,
    ) -> Self {
        let hit_points = tier.spec().hit_points;
        let rows = settings.formation_height as usize;
        let mut columns = Vec::with_capacity(settings.formation_width as usize);

        for col in 0..settings.formation_width as i32 {
            let mut column = Vec::with_capacity(rows);
            for row in 0..rows {
                let kind = if (row as f64 / rows as f64) < PROPORTION_C {
                    EnemyKind::C
                } else if (row as f64 / rows as f64) < PROPORTION_C + PROPORTION_B {
                    EnemyKind::B
                } else {
                    EnemyKind::A
                };
                column.push(EnemyShip::new(
                    INIT_POS_X + col * SEPARATION_DISTANCE,
                    INIT_POS_Y + row as i32 * SEPARATION_DISTANCE,
                    kind,
                    hit_points,
                ));
            }
            columns.push(column);
        }

        let frequency = Duration::from_millis(settings.shooting_frequency_ms);
        let variance = Duration::from_millis(
            (settings.shooting_frequency_ms as f64 * SHOOTING_VARIANCE) as u64,
        );
        let ship_count = columns.iter().map(Vec::len).sum();

        let mut formation = Self {
            columns,
            position_x: INIT_POS_X,
            position_y: INIT_POS_Y,
            width: 0,
            height: 0,
            direction: Direction::Right,
            previous_direction: Direction::Right,
            movement_interval: 0,
            movement_speed: settings.base_speed + MINIMUM_SPEED,
            base_speed: settings.base_speed,
            shooting_cooldown: Cooldown::variable(frequency, variance),
            initial_count: ship_count,
            ship_count,
            screen_width,
            screen_height,
        };
        formation.clean_up();
        debug!(
            columns = settings.formation_width,
            rows = settings.formation_height,
            "formation created"
        );
        formation
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Frames between movement steps at the current strength.
    pub fn movement_speed(&self) -> u32 {
        self.movement_speed
    }

    /// Advances the march by one frame.
    pub fn update(&mut self) {
        for ship in self.columns.iter_mut().flatten() {
            ship.update();
        }

        // Fewer ships left means faster steps
        let remaining = if self.initial_count == 0 {
            0.0
        } else {
            self.ship_count as f64 / self.initial_count as f64
        };
        self.movement_speed = (remaining.powi(2) * self.base_speed as f64) as u32 + MINIMUM_SPEED;

        self.movement_interval += 1;
        if self.movement_interval < self.movement_speed {
            return;
        }
        self.movement_interval = 0;

        // Explosions from the previous step disappear now
        self.clean_up();
        if self.columns.is_empty() {
            return;
        }

        let is_at_bottom = self.position_y + self.height > self.screen_height - BOTTOM_MARGIN;
        let is_at_right_side = self.position_x + self.width >= self.screen_width - SIDE_MARGIN;
        let is_at_left_side = self.position_x <= SIDE_MARGIN;
        let is_at_horizontal_altitude = self.position_y % DESCENT_DISTANCE == 0;

        match self.direction {
            Direction::Down => {
                if is_at_horizontal_altitude {
                    self.direction = if self.previous_direction == Direction::Right {
                        Direction::Left
                    } else {
                        Direction::Right
                    };
                }
            }
            Direction::Left => {
                if is_at_left_side {
                    if is_at_bottom {
                        self.direction = Direction::Right;
                    } else {
                        self.previous_direction = self.direction;
                        self.direction = Direction::Down;
                    }
                }
            }
            Direction::Right => {
                if is_at_right_side {
                    if is_at_bottom {
                        self.direction = Direction::Left;
                    } else {
                        self.previous_direction = self.direction;
                        self.direction = Direction::Down;
                    }
                }
            }
        }

        let (movement_x, movement_y) = match self.direction {
            Direction::Right => (X_SPEED, 0),
            Direction::Left => (-X_SPEED, 0),
            Direction::Down => (0, Y_SPEED),
        };
        self.position_x += movement_x;
        self.position_y += movement_y;
        for ship in self.columns.iter_mut().flatten() {
            ship.move_by(movement_x, movement_y);
        }
    }

    /// Drops destroyed members and empty columns, then recomputes the
    /// bounding box.
    fn clean_up(&mut self) {
        for column in &mut self.columns {
            column.retain(|ship| !ship.is_destroyed());
        }
        self.columns.retain(|column| !column.is_empty());

        let columns = &self.columns;
        let (Some(left), Some(top)) = (
            columns.iter().flatten().map(|s| s.x()).min(),
            columns.iter().flatten().map(|s| s.y()).min(),
        ) else {
            self.width = 0;
            self.height = 0;
            return;
        };
        let right = columns
            .iter()
            .flatten()
            .map(|s| s.x() + s.width())
            .max()
            .unwrap_or(left);
        let bottom = columns
            .iter()
            .flatten()
            .map(|s| s.y() + s.height())
            .max()
            .unwrap_or(top);

        self.position_x = left;
        self.position_y = top;
        self.width = right - left;
        self.height = bottom - top;
    }

    /// Single-bullet volley, used on the Plain tier.
    pub fn shoot<R: Rng + ?Sized>(
        &mut self,
        lane: &mut ProjectileLane,
        now: Duration,
        rng: &mut R,
    ) -> bool {
        self.fire_volley(Volley::Single, lane, now, rng)
    }

    /// Double-bullet volley, used on the N tier.
    pub fn shoot_n<R: Rng + ?Sized>(
        &mut self,
        lane: &mut ProjectileLane,
        now: Duration,
        rng: &mut R,
    ) -> bool {
        self.fire_volley(Volley::Double, lane, now, rng)
    }

    /// Triple-bullet volley, used on the H tier.
    pub fn shoot_h<R: Rng + ?Sized>(
        &mut self,
        lane: &mut ProjectileLane,
        now: Duration,
        rng: &mut R,
    ) -> bool {
        self.fire_volley(Volley::Triple, lane, now, rng)
    }

    fn fire_volley<R: Rng + ?Sized>(
        &mut self,
        volley: Volley,
        lane: &mut ProjectileLane,
        now: Duration,
        rng: &mut R,
    ) -> bool {
        if !self.shooting_cooldown.check_finished(now) {
            return false;
        }

        let shooters = self.shooters();
        if shooters.is_empty() {
            return false;
        }
        let shooter = shooters[rng.random_range(0..shooters.len())];
        let (x, y) = (shooter.x() + shooter.width() / 2, shooter.y());

        self.shooting_cooldown.reset_random(now, rng);
        for offset in volley.offsets() {
            lane.fire(x + offset, y, BULLET_SPEED);
        }
        true
    }

    /// Lowest alive member of every column that still has one.
    pub fn shooters(&self) -> Vec<&EnemyShip> {
        self.columns
            .iter()
            .filter_map(|column| column.iter().rev().find(|ship| !ship.is_destroyed()))
            .collect()
    }

    /// First alive member touching `other`.
    pub fn find_collision<E: Entity + ?Sized>(&self, other: &E) -> Option<EnemyId> {
        self.columns.iter().enumerate().find_map(|(column, ships)| {
            ships
                .iter()
                .position(|ship| !ship.is_destroyed() && super::collides(other, ship))
                .map(|row| EnemyId { column, row })
        })
    }

    pub fn get(&self, id: EnemyId) -> Option<&EnemyShip> {
        self.columns.get(id.column).and_then(|column| column.get(id.row))
    }

    /// Damages a member, destroying it once it runs out of hit points.
    /// Returns true when this hit destroyed it.
    pub fn hit(&mut self, id: EnemyId, damage: u8) -> bool {
        let Some(ship) = self
            .columns
            .get_mut(id.column)
            .and_then(|column| column.get_mut(id.row))
        else {
            return false;
        };
        if ship.is_destroyed() {
            return false;
        }
        if ship.take_damage(damage) {
            self.destroy(id);
            true
        } else {
            false
        }
    }

    pub fn destroy(&mut self, id: EnemyId) {
        let Some(ship) = self
            .columns
            .get_mut(id.column)
            .and_then(|column| column.get_mut(id.row))
        else {
            return;
        };
        if ship.is_destroyed() {
            return;
        }
        ship.destroy();
        self.ship_count -= 1;
        info!(remaining = self.ship_count, "enemy destroyed");
    }

    /// Every member still in the grid, explosions included.
    pub fn members(&self) -> impl Iterator<Item = &EnemyShip> {
        self.columns.iter().flatten()
    }

    pub fn alive(&self) -> impl Iterator<Item = &EnemyShip> {
        self.members().filter(|ship| !ship.is_destroyed())
    }

    pub fn alive_count(&self) -> usize {
        self.ship_count
    }

    pub fn is_empty(&self) -> bool {
        self.ship_count == 0
    }
}

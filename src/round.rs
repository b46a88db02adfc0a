use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::{Config, LevelSettings, ScreenConfig};
use crate::controls::{Control, InputSource, Side};
use crate::cooldown::Cooldown;
use crate::entities::item::ITEM_SPEED;
use crate::entities::ship::SHIP_WIDTH;
use crate::entities::{
    Difficulty, EnemyFormation, EnemyShip, Entity, Item, Lean, Projectile, ProjectileLane,
    ProjectileOwner, Ship, Tier, Tint, collides,
};
use crate::pool::Pool;
use crate::state::{GameState, MAX_LIVES};
use crate::view::{CountdownOverlay, Hud, RenderView};

/// Distance from the bottom of the field to the ships' top edge.
const SHIP_BOTTOM_OFFSET: i32 = 30;
const BONUS_SHIP_X: i32 = -32;
const BONUS_SHIP_Y: i32 = 65;
const BONUS_SHIP_SPEED: i32 = 2;
const FIRE_RATE_STEP: Duration = Duration::from_millis(100);
/// Fire-rate upgrades stop once the interval is at or below this.
const FIRE_RATE_FLOOR: Duration = Duration::from_millis(300);
/// Hit points one player projectile takes off an enemy.
const SHOT_DAMAGE: u8 = 1;

/// Lifecycle of one level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input is locked while the level number is shown.
    Countdown,
    Active,
    /// Level is over; waiting for the screen change.
    Finishing,
    /// Snapshot is ready to be taken with [`GameRound::finish`].
    Terminal,
}

/// Horizontal span a ship must stay inside, edges included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    pub min_x: i32,
    pub max_x: i32,
}

/// One player's side of the split screen.
#[derive(Debug, Clone)]
pub struct PlayerSlot {
    pub side: Side,
    pub lane: Lane,
    pub ship: Ship,
    pub lives: u8,
}

impl PlayerSlot {
    fn new(side: Side, screen: &ScreenConfig, lives: u8) -> Self {
        let midline = screen.width / 2;
        let y = screen.height - SHIP_BOTTOM_OFFSET;
        let (lane, ship) = match side {
            Side::Left => (
                Lane {
                    min_x: 1,
                    max_x: midline - 1,
                },
                Ship::new(screen.width / 4, y, Tint::Red),
            ),
            Side::Right => (
                Lane {
                    min_x: midline + 1,
                    max_x: screen.width - 1,
                },
                Ship::new(screen.width / 4 * 3, y, Tint::Blue),
            ),
        };
        let mut slot = Self {
            side,
            lane,
            ship,
            lives,
        };
        if lives == 0 {
            slot.ship.game_over();
        }
        slot
    }

    fn can_move_right(&self) -> bool {
        self.ship.x + self.ship.width() + self.ship.get_speed() <= self.lane.max_x
    }

    fn can_move_left(&self) -> bool {
        self.ship.x - self.ship.get_speed() >= self.lane.min_x
    }
}

/// Upgrade granted by a collected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    ExtraLife,
    FireRate,
    Speed,
    HorizontalBurst,
    VerticalBurst,
    ArcBurst,
}

impl ItemEffect {
    pub const COUNT: u32 = 6;

    pub fn from_roll(roll: u32) -> Self {
        match roll % Self::COUNT {
            0 => ItemEffect::ExtraLife,
            1 => ItemEffect::FireRate,
            2 => ItemEffect::Speed,
            3 => ItemEffect::HorizontalBurst,
            4 => ItemEffect::VerticalBurst,
            _ => ItemEffect::ArcBurst,
        }
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_roll(rng.random_range(0..Self::COUNT))
    }

    /// Bullet spawn points relative to the ship's top-left corner.
    pub fn burst_offsets(&self) -> &'static [(i32, i32)] {
        const HALF: i32 = SHIP_WIDTH / 2;
        const THIRD: i32 = SHIP_WIDTH / 3;
        match self {
            ItemEffect::HorizontalBurst => &[(0, 0), (HALF, 0), (SHIP_WIDTH, 0)],
            ItemEffect::VerticalBurst => &[(HALF, 0), (HALF, HALF), (HALF, SHIP_WIDTH)],
            ItemEffect::ArcBurst => &[
                (-HALF, 0),
                (0, -THIRD),
                (HALF, -HALF),
                (SHIP_WIDTH, -THIRD),
                (SHIP_WIDTH + HALF, 0),
            ],
            _ => &[],
        }
    }
}

/// One level attempt: owns every entity, pool and timer of the level and
/// steps them one frame at a time.
pub struct GameRound<R: Rng> {
    rng: R,
    difficulty: Difficulty,
    screen: ScreenConfig,
    level: usize,
    bonus_life: bool,
    phase: Phase,

    score: u32,
    coin: u32,
    bullets_shot: u32,
    ships_destroyed: u32,

    slots: [PlayerSlot; 2],
    formation: EnemyFormation,
    /// One lane per tier, indexed by [`Tier::index`].
    lanes: [ProjectileLane; 3],
    items: Vec<Item>,
    item_pool: Pool<Item>,
    bonus_ship: Option<EnemyShip>,

    input_delay: Cooldown,
    screen_finished: Cooldown,
    bonus_ship_cooldown: Cooldown,
    bonus_ship_explosion: Cooldown,
    level_finished: bool,
}

impl<R: Rng> GameRound<R> {
    /// Builds the round for `state.level()`. The state's lives must already
    /// include any bonus life; `bonus_life` only drives the countdown banner.
    pub fn new(
        config: &Config,
        settings: &LevelSettings,
        state: GameState,
        bonus_life: bool,
        rng: R,
        now: Duration,
    ) -> Self {
        let screen = config.screen;
        let timing = config.timing;

        let mut input_delay = Cooldown::new(timing.input_delay());
        input_delay.reset(now);
        let mut bonus_ship_cooldown =
            Cooldown::variable(timing.bonus_ship_interval(), timing.bonus_ship_variance());
        bonus_ship_cooldown.reset(now);

        info!(
            level = state.level(),
            difficulty = ?config.difficulty,
            lives_left = state.lives_left(),
            lives_right = state.lives_right(),
            "round starting"
        );

        Self {
            rng,
            difficulty: config.difficulty,
            screen,
            level: state.level(),
            bonus_life,
            phase: Phase::Countdown,
            score: state.score(),
            coin: state.coin(),
            bullets_shot: state.bullets_shot(),
            ships_destroyed: state.ships_destroyed(),
            slots: [
                PlayerSlot::new(Side::Left, &screen, state.lives_left()),
                PlayerSlot::new(Side::Right, &screen, state.lives_right()),
            ],
            formation: EnemyFormation::new(
                settings,
                config.difficulty,
                screen.width,
                screen.height,
            ),
            lanes: Tier::ALL.map(ProjectileLane::new),
            items: Vec::new(),
            item_pool: Pool::new(),
            bonus_ship: None,
            input_delay,
            screen_finished: Cooldown::new(timing.screen_change()),
            bonus_ship_cooldown,
            bonus_ship_explosion: Cooldown::new(timing.bonus_ship_explosion()),
            level_finished: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn slot(&self, side: Side) -> &PlayerSlot {
        &self.slots[side.index()]
    }

    pub fn formation(&self) -> &EnemyFormation {
        &self.formation
    }

    pub fn lane(&self, tier: Tier) -> &ProjectileLane {
        &self.lanes[tier.index()]
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn bonus_ship(&self) -> Option<&EnemyShip> {
        self.bonus_ship.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Advances the round by one frame.
    pub fn update(&mut self, now: Duration, input: &impl InputSource) {
        for slot in &mut self.slots {
            slot.ship.update(now);
        }

        match self.phase {
            Phase::Countdown => {
                if !self.input_delay.check_finished(now) {
                    return;
                }
                self.phase = Phase::Active;
                debug!(level = self.level, "input unlocked");
            }
            Phase::Active => {}
            Phase::Finishing => {
                if self.screen_finished.check_finished(now) {
                    self.phase = Phase::Terminal;
                    info!(level = self.level, score = self.score, "round over");
                }
                return;
            }
            Phase::Terminal => return,
        }

        self.move_ships(now, input);
        self.update_formation(now);
        self.update_bonus_ship(now);
        for tier in Tier::ALL {
            self.resolve_lane(tier, now);
        }
        for lane in &mut self.lanes {
            let recycled = lane.advance(self.screen.separation_line, self.screen.height);
            if recycled > 0 {
                debug!(tier = ?lane.tier, recycled, "projectiles recycled");
            }
        }
        self.advance_items();
        self.collect_items(now);
        self.check_level_finished(now);
    }

    fn move_ships(&mut self, now: Duration, input: &impl InputSource) {
        let lane = &mut self.lanes[self.difficulty.index()];
        for slot in &mut self.slots {
            if slot.ship.is_destroyed(now) {
                continue;
            }

            let right = input.is_down(Control::MoveRight(slot.side));
            let left = input.is_down(Control::MoveLeft(slot.side));
            if right && slot.can_move_right() {
                slot.ship.move_right();
            }
            if left && slot.can_move_left() {
                slot.ship.move_left();
            }
            slot.ship.lean(match (left, right) {
                (true, false) => Lean::Left,
                (false, true) => Lean::Right,
                _ => Lean::Idle,
            });

            if input.is_down(Control::Fire(slot.side)) && slot.ship.shoot(lane, now) {
                self.bullets_shot += 1;
            }
        }
    }

    fn update_formation(&mut self, now: Duration) {
        self.formation.update();
        let lane = &mut self.lanes[self.difficulty.index()];
        match self.difficulty {
            Tier::Plain => self.formation.shoot(lane, now, &mut self.rng),
            Tier::N => self.formation.shoot_n(lane, now, &mut self.rng),
            Tier::H => self.formation.shoot_h(lane, now, &mut self.rng),
        };
    }

    fn update_bonus_ship(&mut self, now: Duration) {
        match &mut self.bonus_ship {
            Some(bonus) if bonus.is_destroyed() => {
                if self.bonus_ship_explosion.check_finished(now) {
                    self.bonus_ship = None;
                }
            }
            Some(bonus) => {
                bonus.move_by(BONUS_SHIP_SPEED, 0);
                if bonus.x > self.screen.width {
                    self.bonus_ship = None;
                    info!("bonus ship escaped");
                }
            }
            None => {
                if self.bonus_ship_cooldown.check_finished(now) {
                    self.bonus_ship = Some(EnemyShip::bonus(BONUS_SHIP_X, BONUS_SHIP_Y));
                    self.bonus_ship_cooldown.reset_random(now, &mut self.rng);
                    info!("bonus ship appears");
                }
            }
        }
    }

    /// Resolves every hit involving one tier's projectiles. Consumed
    /// projectiles go back to that tier's pool.
    fn resolve_lane(&mut self, tier: Tier, now: Duration) {
        let live = std::mem::take(&mut self.lanes[tier.index()].live);
        let mut kept = Vec::with_capacity(live.len());
        let mut spent = Vec::new();

        for projectile in live {
            let consumed = match projectile.owner() {
                ProjectileOwner::Enemy => self.hit_ship(&projectile, now),
                ProjectileOwner::Player => self.hit_enemy(&projectile, now),
            };
            if consumed {
                spent.push(projectile);
            } else {
                kept.push(projectile);
            }
        }

        let lane = &mut self.lanes[tier.index()];
        lane.live = kept;
        lane.pool.recycle(spent);
    }

    fn hit_ship(&mut self, projectile: &Projectile, now: Duration) -> bool {
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| collides(projectile, &slot.ship))
        else {
            return false;
        };

        if !slot.ship.is_destroyed(now) {
            slot.ship.destroy(now);
            if slot.lives > 0 {
                slot.lives -= 1;
                info!(side = ?slot.side, lives = slot.lives, "ship hit");
            } else {
                info!(side = ?slot.side, "ship hit with no lives left");
            }
        }
        true
    }

    fn hit_enemy(&mut self, projectile: &Projectile, now: Duration) -> bool {
        let spec = projectile.tier.spec();

        if let Some(id) = self.formation.find_collision(projectile) {
            if self.formation.hit(id, SHOT_DAMAGE)
                && let Some(enemy) = self.formation.get(id)
            {
                let points = enemy.get_points();
                let drop_x = enemy.x + enemy.width() / 2;
                let drop_y = enemy.y;
                self.award_kill(points);
                if self.rng.random_range(0..spec.drop_one_in.max(1)) == 0 {
                    self.items.push(self.item_pool.acquire((drop_x, drop_y, ITEM_SPEED)));
                    debug!(x = drop_x, y = drop_y, "item dropped");
                }
            }
            return true;
        }

        if let Some(bonus) = self.bonus_ship.as_mut()
            && !bonus.is_destroyed()
            && collides(projectile, &*bonus)
        {
            let points = bonus.get_points();
            bonus.destroy();
            self.bonus_ship_explosion.reset(now);
            self.award_kill(points);
            info!(points, "bonus ship destroyed");
            return true;
        }

        false
    }

    fn award_kill(&mut self, points: u32) {
        self.score += points;
        self.ships_destroyed += 1;
        self.coin += points / 10;
    }

    fn advance_items(&mut self) {
        for item in &mut self.items {
            item.update();
        }
        let height = self.screen.height;
        let (spent, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.is_out_of_bounds(height));
        self.items = live;
        self.item_pool.recycle(spent);
    }

    fn collect_items(&mut self, now: Duration) {
        let items = std::mem::take(&mut self.items);
        let mut kept = Vec::with_capacity(items.len());
        let mut spent = Vec::new();

        for item in items {
            let collector = self
                .slots
                .iter()
                .find(|slot| collides(&item, &slot.ship))
                .map(|slot| (slot.side, slot.ship.is_game_over()));
            match collector {
                // Out-of-play ships still absorb the item but gain nothing
                Some((_, true)) => spent.push(item),
                Some((side, false)) => {
                    let effect = ItemEffect::roll(&mut self.rng);
                    self.apply_item(side, effect, now);
                    spent.push(item);
                }
                None => kept.push(item),
            }
        }

        self.items = kept;
        self.item_pool.recycle(spent);
    }

    /// Grants `effect` to one side. Bursts fire into the active tier's lane.
    pub fn apply_item(&mut self, side: Side, effect: ItemEffect, now: Duration) {
        let lane = &mut self.lanes[self.difficulty.index()];
        let slot = &mut self.slots[side.index()];

        let effect = if effect == ItemEffect::ExtraLife && slot.lives >= MAX_LIVES {
            ItemEffect::FireRate
        } else {
            effect
        };

        match effect {
            ItemEffect::ExtraLife => {
                slot.lives += 1;
                slot.ship.item_number = 1;
                info!(?side, lives = slot.lives, "extra life");
            }
            ItemEffect::FireRate => {
                let interval = slot.ship.get_shooting_interval();
                if interval > FIRE_RATE_FLOOR {
                    slot.ship.set_shooting_interval(interval - FIRE_RATE_STEP);
                    info!(
                        ?side,
                        interval_ms = (interval - FIRE_RATE_STEP).as_millis() as u64,
                        "fire rate up"
                    );
                } else {
                    info!(?side, "fire rate already at maximum");
                }
                slot.ship.item_number = 2;
            }
            ItemEffect::Speed => {
                slot.ship.set_speed(slot.ship.get_speed() + 1);
                slot.ship.item_number = 3;
                info!(?side, speed = slot.ship.get_speed(), "speed up");
            }
            ItemEffect::HorizontalBurst | ItemEffect::VerticalBurst | ItemEffect::ArcBurst => {
                let speed = slot.ship.get_bullet_speed();
                for (dx, dy) in effect.burst_offsets() {
                    lane.fire(slot.ship.x + dx, slot.ship.y + dy, speed);
                }
                debug!(?side, ?effect, "burst fired");
            }
        }
        slot.ship.collect_item(now);
    }

    fn check_level_finished(&mut self, now: Duration) {
        if self.level_finished {
            return;
        }

        let wiped_out = self.slots.iter().all(|slot| slot.lives == 0);
        if self.formation.is_empty() || wiped_out {
            self.level_finished = true;
            self.screen_finished.reset(now);
            self.phase = Phase::Finishing;
            info!(level = self.level, cleared = !wiped_out, "level finished");
        }

        for slot in &mut self.slots {
            if slot.lives == 0 && !slot.ship.is_game_over() {
                slot.ship.game_over();
                info!(side = ?slot.side, "side out of lives");
            }
        }
    }

    /// Snapshot of the round so far.
    pub fn game_state(&self) -> GameState {
        GameState::new(
            self.level,
            self.score,
            self.slots[0].lives,
            self.slots[1].lives,
            self.bullets_shot,
            self.ships_destroyed,
            self.coin,
        )
    }

    /// Ends the round and hands back the snapshot with the end-of-level bonus
    /// applied.
    pub fn finish(self) -> GameState {
        self.game_state().with_end_bonus()
    }

    pub fn view(&self, now: Duration) -> RenderView {
        let mut sprites: Vec<_> = self.formation.members().map(Entity::to_sprite).collect();
        sprites.extend(self.bonus_ship.iter().map(Entity::to_sprite));
        sprites.extend(self.slots.iter().map(|slot| slot.ship.to_sprite()));
        sprites.extend(self.lanes.iter().flat_map(|lane| lane.live.iter().map(Entity::to_sprite)));
        sprites.extend(self.items.iter().map(Entity::to_sprite));

        let countdown = (self.phase == Phase::Countdown).then(|| CountdownOverlay {
            level: self.level,
            seconds_left: self.input_delay.remaining(now).as_secs(),
            bonus_life: self.bonus_life,
        });

        RenderView {
            phase: self.phase,
            field_width: self.screen.width,
            field_height: self.screen.height,
            separation_line: self.screen.separation_line,
            divider_x: self.screen.width / 2,
            sprites,
            hud: Hud {
                level: self.level,
                score: self.score,
                coin: self.coin,
                lives_left: self.slots[0].lives,
                lives_right: self.slots[1].lives,
                upgrades: self.slots.each_ref().map(|slot| {
                    slot.ship
                        .is_showing_item(now)
                        .then_some(slot.ship.item_number)
                }),
            },
            countdown,
        }
    }
}

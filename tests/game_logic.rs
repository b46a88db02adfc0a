/// Integration tests for game logic
///
/// These tests drive whole rounds and campaigns through the public API, the
/// way the terminal app does: one `update` per frame with held controls.
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use twinfire::{
    Campaign, Config, Control, Entity, GameRound, GameState, LevelSettings, NoInput, Phase,
    Projectile, Ship, Side, Tier, collides, entities::Tint,
};

const FRAME: u64 = 16;

fn at(frame: u64) -> Duration {
    Duration::from_millis(frame * FRAME)
}

/// Default config without the opening countdown.
fn quick_config() -> Config {
    let mut config = Config::default();
    config.timing.input_delay_ms = 0;
    config
}

/// A single enemy that barely marches and shoots once at the start.
fn lone_enemy() -> LevelSettings {
    LevelSettings::new(1, 1, 1000, 600_000)
}

fn new_round(config: &Config, state: GameState, seed: u64) -> GameRound<StdRng> {
    GameRound::new(
        config,
        &lone_enemy(),
        state,
        false,
        StdRng::seed_from_u64(seed),
        Duration::ZERO,
    )
}

#[test]
fn test_collision_is_symmetric_for_game_entities() {
    let ship = Ship::new(100, 490, Tint::Red);
    let hit = Projectile::new(110, 495, 4, Tier::Plain);
    let miss = Projectile::new(200, 495, 4, Tier::Plain);

    assert!(collides(&ship, &hit));
    assert!(collides(&hit, &ship));
    assert!(!collides(&ship, &miss));
    assert!(!collides(&miss, &ship));
}

#[test]
fn test_left_ship_clears_level_by_shooting() {
    let config = quick_config();
    let mut round = new_round(&config, GameState::initial(3), 3);

    let mut frame = 0;
    while round.phase() != Phase::Finishing && frame < 2000 {
        // Walk under the enemy, then hold position and keep firing
        let moving = round.slot(Side::Left).ship.x > 16;
        let input = move |control: Control| {
            control == Control::Fire(Side::Left)
                || (moving && control == Control::MoveLeft(Side::Left))
        };
        round.update(at(frame), &input);
        frame += 1;
    }

    assert_eq!(round.phase(), Phase::Finishing);
    assert!(round.formation().is_empty());
    let state = round.game_state();
    assert_eq!(state.score(), 30);
    assert_eq!(state.ships_destroyed(), 1);
    assert!(state.bullets_shot() >= 2);

    // The screen change cooldown runs out, then the snapshot is taken
    let finishing_at = frame;
    while round.phase() != Phase::Terminal && frame < finishing_at + 200 {
        round.update(at(frame), &NoInput);
        frame += 1;
    }
    assert_eq!(round.phase(), Phase::Terminal);
    assert_eq!(round.game_state(), state);

    let spare_lives = state.lives_left() as u32 + state.lives_right() as u32 - 1;
    let finished = round.finish();
    assert_eq!(finished.score(), 30 + 100 * spare_lives);
}

#[test]
fn test_left_ship_loses_last_life_while_right_keeps_playing() {
    let config = quick_config();
    let mut round = new_round(&config, GameState::new(1, 0, 1, 3, 0, 0, 0), 9);

    let mut frame = 0;
    while round.slot(Side::Left).lives > 0 && frame < 400 {
        // Park the left ship under the enemy's opening shot
        let moving = round.slot(Side::Left).ship.x > 16;
        let input =
            move |control: Control| moving && control == Control::MoveLeft(Side::Left);
        round.update(at(frame), &input);
        frame += 1;
    }

    let left = round.slot(Side::Left);
    assert_eq!(left.lives, 0);
    assert!(left.ship.is_game_over());
    assert_eq!(left.ship.get_speed(), 0);

    let right = round.slot(Side::Right);
    assert_eq!(right.lives, 3);
    assert!(!right.ship.is_game_over());
    assert_eq!(round.phase(), Phase::Active);

    // The right ship still answers its controls
    let x = round.slot(Side::Right).ship.x;
    let input = |control: Control| control == Control::MoveRight(Side::Right);
    round.update(at(frame), &input);
    assert_eq!(round.slot(Side::Right).ship.x, x + 2);
}

#[test]
fn test_countdown_holds_everything_still() {
    let config = Config::default();
    let mut round = new_round(&config, GameState::initial(3), 1);
    let all = |_: Control| true;

    for frame in 0..60 {
        round.update(at(frame), &all);
    }
    assert_eq!(round.phase(), Phase::Countdown);
    assert_eq!(round.slot(Side::Left).ship.x, 112);
    assert_eq!(round.slot(Side::Right).ship.x, 336);
    assert_eq!(round.game_state().bullets_shot(), 0);
    assert!(Tier::ALL.iter().all(|tier| round.lane(*tier).live.is_empty()));
}

#[test]
fn test_difficulty_from_config_sets_enemy_hit_points() {
    let config = Config::from_toml(
        r#"
        difficulty = "h"

        [[levels]]
        formation_width = 3
        formation_height = 2
        base_speed = 30
        shooting_frequency_ms = 1000
        "#,
    )
    .unwrap();
    let campaign = Campaign::new(config);
    let round = campaign
        .next_round(StdRng::seed_from_u64(5), Duration::ZERO)
        .unwrap();

    assert_eq!(round.difficulty(), Tier::H);
    assert_eq!(round.formation().alive_count(), 6);
    assert!(round.formation().alive().all(|enemy| enemy.hit_points == 3));
}

#[test]
fn test_enemy_volley_lands_in_difficulty_lane() {
    for tier in Tier::ALL {
        let config = Config {
            difficulty: tier,
            ..quick_config()
        };
        let mut round = new_round(&config, GameState::initial(3), 11);
        round.update(Duration::ZERO, &NoInput);

        let expected = tier.spec().volley.offsets().len();
        for other in Tier::ALL {
            let live = round.lane(other).live.len();
            if other == tier {
                assert_eq!(live, expected);
            } else {
                assert_eq!(live, 0);
            }
        }
    }
}

#[test]
fn test_campaign_runs_to_the_last_level() {
    let mut campaign = Campaign::new(Config::default());
    let levels = campaign.config().levels.len();

    let mut score = 0;
    while !campaign.is_over() {
        let round = campaign
            .next_round(StdRng::seed_from_u64(7), Duration::ZERO)
            .expect("campaign is not over");
        let state = round.game_state();
        score += 10;
        campaign.complete(GameState::new(
            state.level(),
            score,
            state.lives_left(),
            state.lives_right(),
            0,
            0,
            0,
        ));
    }

    assert!(campaign.is_won());
    assert_eq!(campaign.level(), levels);
    assert_eq!(campaign.state().score(), 10 * levels as u32);
}

#[test]
fn test_view_reports_round_overlays() {
    let config = quick_config();
    let mut round = new_round(&config, GameState::new(2, 70, 2, 1, 0, 0, 4), 2);
    round.update(Duration::ZERO, &NoInput);

    let view = round.view(Duration::ZERO);
    assert_eq!(view.hud.level, 2);
    assert_eq!(view.hud.score, 70);
    assert_eq!(view.hud.coin, 4);
    assert_eq!((view.hud.lives_left, view.hud.lives_right), (2, 1));
    assert_eq!(view.divider_x, config.screen.width / 2);
    assert!(view.countdown.is_none());
    assert!(
        view.sprites
            .iter()
            .all(|sprite| sprite.width > 0 && sprite.height > 0)
    );
    assert!(view.sprites.len() >= 4);
    let ship = &round.slot(Side::Left).ship;
    assert!(view.sprites.contains(&ship.to_sprite()));
}

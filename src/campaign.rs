use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::config::Config;
use crate::round::GameRound;
use crate::state::GameState;

/// A bonus life is offered on every level divisible by this.
const EXTRA_LIFE_FREQUENCY: usize = 3;

/// Walks the level table, carrying the snapshot from one round to the next.
#[derive(Debug, Clone)]
pub struct Campaign {
    config: Config,
    state: GameState,
    over: bool,
}

impl Campaign {
    pub fn new(config: Config) -> Self {
        let state = GameState::initial(config.starting_lives);
        Self {
            config,
            state,
            over: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot the next round starts from, or the final one once over.
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> usize {
        self.state.level()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Both sides survived the last level.
    pub fn is_won(&self) -> bool {
        self.over && !self.state.is_wiped_out()
    }

    pub fn is_bonus_life_level(level: usize) -> bool {
        level % EXTRA_LIFE_FREQUENCY == 0
    }

    /// Builds the round for the current level. Returns `None` once the
    /// campaign is over.
    pub fn next_round<R: Rng>(&self, rng: R, now: Duration) -> Option<GameRound<R>> {
        if self.over {
            return None;
        }
        let settings = self.config.levels.get(self.level().checked_sub(1)?)?;

        let bonus_life = Self::is_bonus_life_level(self.level());
        let state = if bonus_life {
            self.state.with_bonus_life()
        } else {
            self.state
        };
        Some(GameRound::new(&self.config, settings, state, bonus_life, rng, now))
    }

    /// Records a finished round and moves to the next level, or ends the
    /// campaign.
    pub fn complete(&mut self, state: GameState) {
        if state.is_wiped_out() || state.level() >= self.config.levels.len() {
            self.state = state;
            self.over = true;
            info!(
                level = state.level(),
                score = state.score(),
                ships_destroyed = state.ships_destroyed(),
                bullets_shot = state.bullets_shot(),
                "campaign over"
            );
            return;
        }
        self.state = state.with_level(state.level() + 1);
        info!(level = self.state.level(), score = state.score(), "level cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_campaign_starts_at_level_one() {
        let campaign = Campaign::new(Config::default());
        assert_eq!(campaign.level(), 1);
        assert_eq!(campaign.state().lives_left(), 3);
        assert!(!campaign.is_over());
        let round = campaign.next_round(StdRng::seed_from_u64(1), ms(0));
        assert!(round.is_some());
    }

    #[test]
    fn test_complete_advances_level() {
        let mut campaign = Campaign::new(Config::default());
        campaign.complete(GameState::new(1, 500, 2, 3, 10, 20, 30));
        assert_eq!(campaign.level(), 2);
        assert_eq!(campaign.state().score(), 500);
        assert!(!campaign.is_over());
    }

    #[test]
    fn test_bonus_life_on_third_level() {
        assert!(!Campaign::is_bonus_life_level(1));
        assert!(Campaign::is_bonus_life_level(3));
        assert!(Campaign::is_bonus_life_level(6));

        let mut campaign = Campaign::new(Config::default());
        campaign.complete(GameState::new(2, 0, 2, 0, 0, 0, 0));
        assert_eq!(campaign.level(), 3);
        let round = campaign
            .next_round(StdRng::seed_from_u64(1), ms(0))
            .expect("level 3 exists");
        let state = round.game_state();
        assert_eq!(state.lives_left(), 3);
        assert_eq!(state.lives_right(), 0);
        assert_eq!(round.view(ms(0)).countdown.map(|c| c.bonus_life), Some(true));
    }

    #[test]
    fn test_wipe_out_ends_campaign() {
        let mut campaign = Campaign::new(Config::default());
        campaign.complete(GameState::new(1, 120, 0, 0, 4, 3, 2));
        assert!(campaign.is_over());
        assert!(!campaign.is_won());
        assert_eq!(campaign.state().score(), 120);
        assert!(campaign.next_round(StdRng::seed_from_u64(1), ms(0)).is_none());
    }

    #[test]
    fn test_last_level_ends_campaign() {
        let config = Config {
            levels: vec![LevelSettings::new(1, 1, 10, 1000)],
            ..Config::default()
        };
        let mut campaign = Campaign::new(config);
        campaign.complete(GameState::new(1, 900, 1, 0, 0, 0, 0));
        assert!(campaign.is_over());
        assert!(campaign.is_won());
    }
}

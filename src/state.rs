/// Points per spare life awarded when a level ends.
pub const LIFE_SCORE: u32 = 100;
/// Lives a side can hold at most.
pub const MAX_LIVES: u8 = 3;

/// Snapshot of a game between levels.
///
/// Built by a finished round and consumed to build the next one. Immutable
/// once built: the `with_*` helpers return new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    level: usize,
    score: u32,
    lives_left: u8,
    lives_right: u8,
    bullets_shot: u32,
    ships_destroyed: u32,
    coin: u32,
}

impl GameState {
    pub fn new(
        level: usize,
        score: u32,
        lives_left: u8,
        lives_right: u8,
        bullets_shot: u32,
        ships_destroyed: u32,
        coin: u32,
    ) -> Self {
        Self {
            level,
            score,
            lives_left,
            lives_right,
            bullets_shot,
            ships_destroyed,
            coin,
        }
    }

    /// State at the start of a campaign.
    pub fn initial(lives: u8) -> Self {
        Self::new(1, 0, lives, lives, 0, 0, 0)
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives_left(&self) -> u8 {
        self.lives_left
    }

    pub fn lives_right(&self) -> u8 {
        self.lives_right
    }

    pub fn bullets_shot(&self) -> u32 {
        self.bullets_shot
    }

    pub fn ships_destroyed(&self) -> u32 {
        self.ships_destroyed
    }

    pub fn coin(&self) -> u32 {
        self.coin
    }

    /// Both sides are out of lives.
    pub fn is_wiped_out(&self) -> bool {
        self.lives_left == 0 && self.lives_right == 0
    }

    /// Adds `LIFE_SCORE` per spare life, where both sides together keep one
    /// life that is not counted. Score never drops below zero.
    pub fn with_end_bonus(self) -> Self {
        let lives = self.lives_left as i64 + self.lives_right as i64 - 1;
        let score = (self.score as i64 + LIFE_SCORE as i64 * lives).max(0) as u32;
        Self { score, ..self }
    }

    /// Same stats on the next level.
    pub fn with_level(self, level: usize) -> Self {
        Self { level, ..self }
    }

    /// One extra life for every side still in play below the cap.
    pub fn with_bonus_life(self) -> Self {
        let grant = |lives: u8| if lives > 0 && lives < MAX_LIVES { lives + 1 } else { lives };
        Self {
            lives_left: grant(self.lives_left),
            lives_right: grant(self.lives_right),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_bonus_counts_spare_lives() {
        let state = GameState::new(1, 1000, 2, 1, 0, 0, 0).with_end_bonus();
        assert_eq!(state.score(), 1200);
    }

    #[test]
    fn test_end_bonus_with_no_lives_saturates() {
        let state = GameState::new(1, 50, 0, 0, 0, 0, 0).with_end_bonus();
        assert_eq!(state.score(), 0);
        let state = GameState::new(1, 500, 0, 0, 0, 0, 0).with_end_bonus();
        assert_eq!(state.score(), 400);
    }

    #[test]
    fn test_bonus_life_skips_dead_and_full_sides() {
        let state = GameState::new(3, 0, 0, 2, 0, 0, 0).with_bonus_life();
        assert_eq!(state.lives_left(), 0);
        assert_eq!(state.lives_right(), 3);
        let state = GameState::new(3, 0, 3, 1, 0, 0, 0).with_bonus_life();
        assert_eq!(state.lives_left(), 3);
        assert_eq!(state.lives_right(), 2);
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial(3);
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!((state.lives_left(), state.lives_right()), (3, 3));
        assert!(!state.is_wiped_out());
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bonus_life_never_exceeds_cap(left in 0u8..=3, right in 0u8..=3) {
                let state = GameState::new(1, 0, left, right, 0, 0, 0).with_bonus_life();
                prop_assert!(state.lives_left() <= MAX_LIVES);
                prop_assert!(state.lives_right() <= MAX_LIVES);
                prop_assert_eq!(state.lives_left() == 0, left == 0);
                prop_assert_eq!(state.lives_right() == 0, right == 0);
            }
        }
    }
}

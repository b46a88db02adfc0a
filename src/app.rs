use color_eyre::Result;
use rand::rngs::ThreadRng;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::info;

use crate::campaign::Campaign;
use crate::config::Config;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, Screen};
use crate::round::{GameRound, Phase};

/// Time between frames, about 60 per second.
const FRAME_TIME: Duration = Duration::from_millis(16);

/// The main application: drives the campaign and its rounds from the
/// terminal's input and clock.
pub struct App {
    running: bool,
    campaign: Campaign,
    round: Option<GameRound<ThreadRng>>,
    /// Game clock origin; every round reads time relative to it
    started: Instant,
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    pub fn new(config: Config) -> Self {
        let started = Instant::now();
        let campaign = Campaign::new(config);
        let round = campaign.next_round(rand::rng(), Duration::ZERO);
        Self {
            running: true,
            campaign,
            round,
            started,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            let now = self.started.elapsed();

            terminal.draw(|frame| match &self.round {
                Some(round) => {
                    let view = round.view(now);
                    self.renderer.render(frame, &Screen::Round(&view));
                }
                None => self.renderer.render(
                    frame,
                    &Screen::GameOver {
                        state: self.campaign.state(),
                        won: self.campaign.is_won(),
                    },
                ),
            })?;

            self.input_manager.poll_events()?;
            let actions = self.input_manager.actions().to_vec();
            self.update(&actions);

            std::thread::sleep(FRAME_TIME);
        }
        Ok(())
    }

    /// Handles this frame's actions, then advances the game. The clock is read
    /// afterwards because a restart replaces it.
    fn update(&mut self, actions: &[InputAction]) {
        self.process_actions(actions);
        if self.running {
            self.step(self.started.elapsed());
        }
    }

    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Restart => {
                    if self.campaign.is_over() {
                        info!("restarting campaign");
                        *self = Self::new(self.campaign.config().clone());
                    }
                }
            }
        }
    }

    /// Advances the current round and hands finished rounds to the campaign.
    fn step(&mut self, now: Duration) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.update(now, &self.input_manager);
        if round.phase() != Phase::Terminal {
            return;
        }

        if let Some(finished) = self.round.take() {
            self.campaign.complete(finished.finish());
        }
        self.input_manager.clear();
        self.round = self.campaign.next_round(rand::rng(), now);
    }
}

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::controls::{Control, InputSource, Side};

/// One-shot actions outside gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Restart,
    Quit,
}

/// Held keys for one side of the screen
#[derive(Debug, Default, Clone, Copy)]
struct KeyState {
    left: bool,
    right: bool,
    fire: bool,
}

/// Manages input polling and tracks which gameplay keys are held
pub struct InputManager {
    keys: [KeyState; 2],
    oneshot_actions: Vec<InputAction>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Side and control bound to a key: A/D/Space on the left, arrows on the right.
fn binding(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::MoveLeft(Side::Left)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::MoveRight(Side::Left)),
        KeyCode::Char(' ') => Some(Control::Fire(Side::Left)),
        KeyCode::Left => Some(Control::MoveLeft(Side::Right)),
        KeyCode::Right => Some(Control::MoveRight(Side::Right)),
        KeyCode::Up => Some(Control::Fire(Side::Right)),
        _ => None,
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            keys: [KeyState::default(); 2],
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before reading actions
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event);
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event),
            KeyEventKind::Release => self.set_held(key_event.code, false),
            _ => {}
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
            self.oneshot_actions.push(InputAction::Restart);
            return;
        }

        self.set_held(key_event.code, true);
    }

    fn set_held(&mut self, code: KeyCode, down: bool) {
        let Some(control) = binding(code) else {
            return;
        };
        match control {
            Control::MoveLeft(side) => {
                let keys = &mut self.keys[side.index()];
                keys.left = down;
                if down {
                    keys.right = false;
                }
            }
            Control::MoveRight(side) => {
                let keys = &mut self.keys[side.index()];
                keys.right = down;
                if down {
                    keys.left = false;
                }
            }
            Control::Fire(side) => self.keys[side.index()].fire = down,
        }
    }

    /// Releases every held key, used when a new round starts
    pub fn clear(&mut self) {
        self.keys = [KeyState::default(); 2];
    }

    /// One-shot actions collected by the last poll
    pub fn actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }
}

impl InputSource for InputManager {
    fn is_down(&self, control: Control) -> bool {
        match control {
            Control::MoveLeft(side) => self.keys[side.index()].left,
            Control::MoveRight(side) => self.keys[side.index()].right,
            Control::Fire(side) => self.keys[side.index()].fire,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_each_side_has_its_own_keys() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('a')));
        input.handle_key_event(press(KeyCode::Up));

        assert!(input.is_down(Control::MoveLeft(Side::Left)));
        assert!(!input.is_down(Control::MoveLeft(Side::Right)));
        assert!(input.is_down(Control::Fire(Side::Right)));
        assert!(!input.is_down(Control::Fire(Side::Left)));
    }

    #[test]
    fn test_release_clears_key() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Right));
        assert!(input.is_down(Control::MoveRight(Side::Right)));
        input.handle_key_event(release(KeyCode::Right));
        assert!(!input.is_down(Control::MoveRight(Side::Right)));
    }

    #[test]
    fn test_opposite_direction_replaces_held_direction() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('d')));
        input.handle_key_event(press(KeyCode::Char('a')));
        assert!(input.is_down(Control::MoveLeft(Side::Left)));
        assert!(!input.is_down(Control::MoveRight(Side::Left)));
    }

    #[test]
    fn test_meta_keys_become_actions() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char('r')));
        input.handle_key_event(KeyEvent::new_with_kind(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        ));
        assert_eq!(input.actions(), &[InputAction::Restart, InputAction::Quit]);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputManager::new();
        input.handle_key_event(press(KeyCode::Char(' ')));
        input.clear();
        assert!(!input.is_down(Control::Fire(Side::Left)));
    }
}

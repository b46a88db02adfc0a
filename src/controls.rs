/// Half of the split screen a player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Gameplay inputs the round asks about each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft(Side),
    MoveRight(Side),
    Fire(Side),
}

/// Answers "is this control held right now". Polled once per frame.
pub trait InputSource {
    fn is_down(&self, control: Control) -> bool;
}

/// Input source with nothing pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_down(&self, _control: Control) -> bool {
        false
    }
}

impl<F> InputSource for F
where
    F: Fn(Control) -> bool,
{
    fn is_down(&self, control: Control) -> bool {
        self(control)
    }
}

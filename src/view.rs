use crate::entities::Sprite;
use crate::round::Phase;

/// Everything the render sink needs for one frame, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView {
    pub phase: Phase,
    pub field_width: i32,
    pub field_height: i32,
    /// Y of the line under the score strip.
    pub separation_line: i32,
    /// X of the vertical line splitting the two sides.
    pub divider_x: i32,
    /// Ships, enemies, projectiles and items, back to front.
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
    /// Shown while the round waits for input to unlock.
    pub countdown: Option<CountdownOverlay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub level: usize,
    pub score: u32,
    pub coin: u32,
    pub lives_left: u8,
    pub lives_right: u8,
    /// Upgrade marker to flash next to each ship, left then right.
    pub upgrades: [Option<u8>; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownOverlay {
    pub level: usize,
    pub seconds_left: u64,
    pub bonus_life: bool,
}

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::entities::{Lean, SpriteKind, Tier, Tint};
use crate::round::Phase;
use crate::state::GameState;
use crate::view::{CountdownOverlay, RenderView};

/// What the terminal shows this frame
pub enum Screen<'a> {
    Round(&'a RenderView),
    GameOver { state: GameState, won: bool },
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

fn color(tint: Tint) -> Color {
    match tint {
        Tint::White => Color::White,
        Tint::Red => Color::Red,
        Tint::Blue => Color::LightBlue,
        Tint::Green => Color::Green,
        Tint::Yellow => Color::Yellow,
        Tint::Magenta => Color::Magenta,
        Tint::Cyan => Color::Cyan,
    }
}

fn glyph(kind: SpriteKind) -> &'static str {
    match kind {
        SpriteKind::Ship(Lean::Idle) => "/^\\",
        SpriteKind::Ship(Lean::Left) => "<^\\",
        SpriteKind::Ship(Lean::Right) => "/^>",
        SpriteKind::ShipDestroyed => "*#*",
        SpriteKind::EnemyA => "<o>",
        SpriteKind::EnemyB => "{o}",
        SpriteKind::EnemyC => "/o\\",
        SpriteKind::EnemyBonus => "<=O=>",
        SpriteKind::Explosion => "*",
        SpriteKind::Bullet(Tier::Plain) => "|",
        SpriteKind::Bullet(Tier::N) => ":",
        SpriteKind::Bullet(Tier::H) => "!",
        SpriteKind::Item => "+",
    }
}

fn upgrade_label(item_number: u8) -> &'static str {
    match item_number {
        1 => "+1 LIFE",
        2 => "FIRE RATE UP",
        3 => "SPEED UP",
        _ => "",
    }
}

/// Maps logical field pixels onto terminal cells.
struct Scale {
    area: Rect,
    field_width: i32,
    field_height: i32,
}

impl Scale {
    fn column(&self, x: i32) -> i32 {
        self.area.x as i32 + x * self.area.width as i32 / self.field_width.max(1)
    }

    fn row(&self, y: i32) -> i32 {
        self.area.y as i32 + y * self.area.height as i32 / self.field_height.max(1)
    }

    fn contains(&self, column: i32, row: i32) -> bool {
        column >= self.area.left() as i32
            && column < self.area.right() as i32
            && row >= self.area.top() as i32
            && row < self.area.bottom() as i32
    }
}

/// Writes `text` centered on a cell, dropping characters outside the area.
fn put_centered(
    buffer: &mut Buffer,
    scale: &Scale,
    column: i32,
    row: i32,
    text: &str,
    style: Style,
) {
    let start = column - text.chars().count() as i32 / 2;
    for (i, ch) in text.chars().enumerate() {
        let x = start + i as i32;
        if scale.contains(x, row) {
            buffer.set_string(x as u16, row as u16, ch.to_string(), style);
        }
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches on what is shown
    pub fn render(&self, frame: &mut Frame, screen: &Screen) {
        match screen {
            Screen::Round(view) => self.render_round(frame, view),
            Screen::GameOver { state, won } => self.render_game_over(frame, state, *won),
        }
    }

    fn render_round(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let field = block.inner(area);
        frame.render_widget(block, area);

        let scale = Scale {
            area: field,
            field_width: view.field_width,
            field_height: view.field_height,
        };
        let buffer = frame.buffer_mut();

        // Separation line under the score strip and the split between sides
        let separation = scale.row(view.separation_line);
        let divider = scale.column(view.divider_x);
        let line_style = Style::default().fg(Color::DarkGray);
        for column in field.left()..field.right() {
            if scale.contains(column as i32, separation) {
                buffer.set_string(column, separation as u16, "─", line_style);
            }
        }
        for row in (separation + 1)..field.bottom() as i32 {
            if scale.contains(divider, row) {
                buffer.set_string(divider as u16, row as u16, "│", line_style);
            }
        }

        for sprite in &view.sprites {
            let column = scale.column(sprite.x + sprite.width / 2);
            let row = scale.row(sprite.y + sprite.height / 2);
            if row <= separation {
                continue;
            }
            let mut style = Style::default().fg(color(sprite.tint));
            if !matches!(sprite.kind, SpriteKind::Bullet(_)) {
                style = style.add_modifier(Modifier::BOLD);
            }
            put_centered(buffer, &scale, column, row, glyph(sprite.kind), style);
        }

        self.render_hud(frame, view, field, separation);

        if let Some(countdown) = view.countdown {
            self.render_countdown(frame, &countdown, field);
        }
        if view.phase == Phase::Finishing {
            let text = Line::from("LEVEL OVER").centered().bold().yellow();
            let row = Rect {
                y: field.y + field.height / 2,
                height: 1,
                ..field
            };
            frame.render_widget(Paragraph::new(text), row);
        }
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, field: Rect, separation: i32) {
        let hud = &view.hud;
        let hearts = |lives: u8| "♥".repeat(lives as usize);
        let label = Style::default().fg(Color::DarkGray);
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        let stats = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(format!("{}", hud.score), bold(Color::Yellow)),
            Span::styled("  Coin: ", label),
            Span::styled(format!("{}", hud.coin), bold(Color::Cyan)),
            Span::styled("  Level: ", label),
            Span::styled(format!("{}", hud.level), bold(Color::White)),
        ]);
        let lives = Line::from(vec![
            Span::styled("P1 ", bold(Color::Red)),
            Span::styled(hearts(hud.lives_left), bold(Color::Red)),
            Span::styled("   P2 ", bold(Color::LightBlue)),
            Span::styled(hearts(hud.lives_right), bold(Color::LightBlue)),
        ]);

        let strip_height = (separation - field.y as i32).max(1) as u16;
        let strip = Rect {
            height: strip_height.min(field.height),
            ..field
        };
        frame.render_widget(Paragraph::new(stats), strip);
        frame.render_widget(Paragraph::new(lives).alignment(Alignment::Right), strip);

        // Upgrade markers flash in each half just above the ships
        let half = field.width / 2;
        for (i, upgrade) in hud.upgrades.iter().enumerate() {
            let Some(item_number) = upgrade else {
                continue;
            };
            let marker = Rect {
                x: field.x + half * i as u16,
                y: field.bottom().saturating_sub(3),
                width: half,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Line::from(upgrade_label(*item_number)).centered().cyan().bold()),
                marker,
            );
        }

        let controls = Line::from(Span::styled(
            "[A/D Space: P1] [←/→ ↑: P2] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        ));
        let controls_area = Rect {
            y: field.bottom().saturating_sub(1),
            height: 1,
            ..field
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_countdown(&self, frame: &mut Frame, countdown: &CountdownOverlay, field: Rect) {
        let mut text = vec![
            Line::from(""),
            Line::from(format!("Level {}", countdown.level))
                .centered()
                .bold()
                .yellow(),
            Line::from(format!("{}", countdown.seconds_left))
                .centered()
                .white(),
        ];
        if countdown.bonus_life {
            text.push(Line::from("+1 LIFE").centered().green().bold());
        }

        let width = 24.min(field.width);
        let height = 6.min(field.height);
        let overlay = Rect {
            x: field.x + (field.width - width) / 2,
            y: field.y + (field.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            overlay,
        );
    }

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, state: &GameState, won: bool) {
        let area = frame.area();
        let (banner, banner_color) = if won {
            ("║      YOU WIN!             ║", Color::Green)
        } else {
            ("║      GAME OVER!           ║", Color::Red)
        };
        let accuracy = if state.bullets_shot() == 0 {
            0.0
        } else {
            state.ships_destroyed() as f64 / state.bullets_shot() as f64 * 100.0
        };

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().fg(banner_color),
            Line::from(banner).centered().fg(banner_color).bold(),
            Line::from("╚═══════════════════════════╝").centered().fg(banner_color),
            Line::from(""),
            Line::from(format!("Final Score: {}", state.score()))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Level Reached: {}", state.level()))
                .centered()
                .white(),
            Line::from(format!("Ships Destroyed: {}", state.ships_destroyed()))
                .centered()
                .cyan(),
            Line::from(format!("Accuracy: {:.1}%", accuracy)).centered().cyan(),
            Line::from(format!("Coin: {}", state.coin())).centered().cyan(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_maps_field_corners() {
        let scale = Scale {
            area: Rect::new(1, 1, 56, 26),
            field_width: 448,
            field_height: 520,
        };
        assert_eq!(scale.column(0), 1);
        assert_eq!(scale.row(0), 1);
        assert_eq!(scale.column(224), 29);
        assert_eq!(scale.row(520), 27);
        assert!(!scale.contains(scale.column(448), 5));
        assert!(scale.contains(scale.column(447), 5));
    }

    #[test]
    fn test_put_centered_clips_to_area() {
        let area = Rect::new(0, 0, 10, 3);
        let scale = Scale {
            area,
            field_width: 10,
            field_height: 3,
        };
        let mut buffer = Buffer::empty(area);
        put_centered(&mut buffer, &scale, 0, 1, "<=O=>", Style::default());
        assert_eq!(buffer[(0, 1)].symbol(), "O");
        assert_eq!(buffer[(1, 1)].symbol(), "=");
        assert_eq!(buffer[(2, 1)].symbol(), ">");
    }

    #[test]
    fn test_every_sprite_has_a_glyph() {
        for kind in [
            SpriteKind::Ship(Lean::Idle),
            SpriteKind::ShipDestroyed,
            SpriteKind::EnemyBonus,
            SpriteKind::Explosion,
            SpriteKind::Bullet(Tier::H),
            SpriteKind::Item,
        ] {
            assert!(!glyph(kind).is_empty());
        }
    }
}

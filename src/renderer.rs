use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::config::GameConfig;
use crate::session::Phase;
use crate::snapshot::Snapshot;

/// Everything the renderer needs for one frame
pub struct RenderView<'a> {
    pub snapshot: &'a Snapshot,
    pub config: &'a GameConfig,
    pub area: Rect,
    pub fps: u32,
}

/// Maps logical play-area pixels onto terminal cells
#[derive(Debug, Clone, Copy)]
struct Viewport {
    area: Rect,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    /// Largest area with the play area's aspect ratio that fits, centered.
    /// Terminal cells are roughly twice as tall as wide.
    fn fit(outer: Rect, play_width: f32, play_height: f32) -> Self {
        let max_w = outer.width as f32;
        let max_h = outer.height as f32;
        let aspect = play_width / play_height * 2.0;

        let (w, h) = if max_h * aspect <= max_w {
            (max_h * aspect, max_h)
        } else {
            (max_w, max_w / aspect)
        };
        let w = (w.floor() as u16).max(1);
        let h = (h.floor() as u16).max(1);

        let area = Rect {
            x: outer.x + (outer.width.saturating_sub(w)) / 2,
            y: outer.y + (outer.height.saturating_sub(h)) / 2,
            width: w,
            height: h,
        };
        Self {
            area,
            scale_x: w as f32 / play_width,
            scale_y: h as f32 / play_height,
        }
    }

    /// Cell for a logical point, or None when it falls outside the viewport
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let cx = (x * self.scale_x).floor();
        let cy = (y * self.scale_y).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.area.width as f32 || cy >= self.area.height as f32 {
            return None;
        }
        Some((self.area.x + cx as u16, self.area.y + cy as u16))
    }

    /// Size in cells of a logical box, never smaller than one cell
    fn cells(&self, w: f32, h: f32) -> (u16, u16) {
        (
            ((w * self.scale_x).round() as u16).max(1),
            ((h * self.scale_y).round() as u16).max(1),
        )
    }

    fn put(&self, buffer: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
        let right = self.area.x + self.area.width;
        let bottom = self.area.y + self.area.height;
        if x >= self.area.x && x < right && y >= self.area.y && y < bottom {
            buffer.set_string(x, y, symbol, style);
        }
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method: the field is always drawn, overlays depend on the phase
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        match view.snapshot.phase {
            Phase::Running => {}
            Phase::Idle => self.render_overlay(frame, view, self.start_text()),
            Phase::Over => self.render_overlay(frame, view, self.game_over_text(view.snapshot)),
        }
    }

    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let snapshot = view.snapshot;
        let config = view.config;

        // Leave one row for the HUD and one for the controls hint
        let field = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let viewport = Viewport::fit(field, snapshot.play_width, snapshot.play_height);
        let framed = Rect {
            x: viewport.area.x.saturating_sub(1).max(field.x),
            y: viewport.area.y,
            width: (viewport.area.width + 2).min(field.width),
            height: viewport.area.height,
        };
        frame.render_widget(block, framed);

        let buffer = frame.buffer_mut();

        // Floor line
        if let Some((_, floor_row)) = viewport.cell(0.0, config.floor_y()) {
            for col in 0..viewport.area.width {
                viewport.put(
                    buffer,
                    viewport.area.x + col,
                    floor_row,
                    "─",
                    Style::default().fg(Color::DarkGray),
                );
            }
        }

        // Obstacles
        let (rock_w, rock_h) = viewport.cells(config.obstacle.w, config.obstacle.h);
        let rock_style = Style::default()
            .fg(Color::Rgb(139, 115, 85))
            .add_modifier(Modifier::BOLD);
        for obstacle in &snapshot.obstacles {
            // Rocks entering from above are clipped at the top edge
            let top = obstacle.y.max(0.0);
            let Some((x, y)) = viewport.cell(obstacle.x, top) else {
                continue;
            };
            let visible_rows = ((obstacle.y + config.obstacle.h) * viewport.scale_y).round() as i32
                - (top * viewport.scale_y).floor() as i32;
            let rows = (visible_rows.max(1) as u16).min(rock_h);
            for row in 0..rows {
                for col in 0..rock_w {
                    viewport.put(buffer, x + col, y + row, "▓", rock_style);
                }
            }
        }

        // Projectiles
        let (shot_w, _) = viewport.cells(config.projectile.w, config.projectile.h);
        for projectile in &snapshot.projectiles {
            if let Some((x, y)) = viewport.cell(projectile.x, projectile.y.max(0.0)) {
                viewport.put(
                    buffer,
                    x + shot_w / 2,
                    y,
                    "|",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        // Cannon: barrel on the top row, body below, wheels on the bottom row
        let (cannon_w, cannon_h) = viewport.cells(config.cannon.w, config.cannon.h);
        let cannon_top = config.floor_y() - config.cannon.h;
        if let Some((x, y)) = viewport.cell(snapshot.cannon_x, cannon_top) {
            let style = Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD);
            viewport.put(buffer, x + cannon_w / 2, y, "▲", style);
            for row in 1..cannon_h {
                for col in 0..cannon_w {
                    let wheel = row + 1 == cannon_h && (col == 0 || col + 1 == cannon_w);
                    let symbol = if wheel { "●" } else { "█" };
                    viewport.put(buffer, x + col, y + row, symbol, style);
                }
            }
        }

        // HUD
        let hud = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", snapshot.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  High: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", snapshot.high_score),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let hud_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(hud).centered(), hud_area);

        let controls = Line::from(vec![Span::styled(
            "[←/→: Tilt] [Space/Click: Tap] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn start_text(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from("Tap to Start").centered().bold().yellow(),
            Line::from(""),
            Line::from("Tilt your phone to move the cannon").centered().white(),
            Line::from("(here: hold ←/→)").centered().dark_gray(),
            Line::from("Tap anywhere to shoot").centered().white(),
        ]
    }

    fn game_over_text(&self, snapshot: &Snapshot) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from("Game Over!").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {}", snapshot.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("High Score: {}", snapshot.high_score))
                .centered()
                .cyan(),
            Line::from(""),
            Line::from("Tap to play again").centered().white(),
        ]
    }

    fn render_overlay(&self, frame: &mut Frame, view: &RenderView, text: Vec<Line<'static>>) {
        let area = view.area;
        let width = 40.min(area.width);
        let height = (text.len() as u16 + 2).min(area.height);
        let overlay = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
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
}

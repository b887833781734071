//! Plain-text rendering backend.

use std::io::Write;

use anyhow::{Context, Result};
use diplomacy_core::{Event, Position};
use diplomacy_rendering::{Color, RenderingBackend, Scene, SpriteKey, SpriteManifest};

/// Draws the board as a character grid, one line per row.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    ansi: bool,
    sprites: SpriteManifest,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W, ansi: bool, sprites: SpriteManifest) -> Self {
        Self { out, ansi, sprites }
    }

    /// Lists every glyph with the sprite asset it stands in for.
    pub(crate) fn write_legend(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .sprites
            .iter()
            .map(|(key, path)| format!("  {} {:<16} {}", glyph(key), key.name(), path.display()))
            .collect();
        self.write_line("legend:")?;
        for line in lines {
            self.write_line(&line)?;
        }
        Ok(())
    }

    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("failed to write output line")
    }

    /// Writes `event` as a single JSON line.
    pub(crate) fn write_event(&mut self, event: &Event) -> Result<()> {
        let json = serde_json::to_string(event).context("failed to serialise event")?;
        self.write_line(&json)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn cell_text(&self, scene: &Scene, position: Position) -> String {
        let Some(entry) = scene.entity_at(position) else {
            return " . ".to_owned();
        };

        let mut glyph = glyph(entry.sprite).to_string();
        if self.ansi && scene.is_highlighted(position) {
            if let Some(team) = scene.active_team() {
                glyph = paint(&glyph, Color::team_highlight(team));
            }
        }

        if scene.is_selected(position) {
            format!("[{glyph}]")
        } else {
            format!(" {glyph} ")
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let mut status = match scene.active_team() {
            Some(team) => format!("round {} | {team} to move", scene.round()),
            None => format!("round {}", scene.round()),
        };
        if scene.pending().is_some() {
            status.push_str(" | placing a new piece");
        }
        self.write_line(&status)?;

        let size = scene.geometry().size();
        for row in 0..size {
            let line: String = (0..size)
                .map(|column| self.cell_text(scene, Position::new(row, column)))
                .collect();
            self.write_line(line.trim_end())?;
        }
        self.out.flush().context("failed to flush board output")
    }
}

fn glyph(sprite: SpriteKey) -> char {
    match sprite {
        SpriteKey::RedPiece => 'r',
        SpriteKey::WhitePiece => 'w',
        SpriteKey::BluePiece => 'b',
        SpriteKey::RedTower => 'R',
        SpriteKey::WhiteTower => 'W',
        SpriteKey::BlueTower => 'B',
        SpriteKey::UnclaimedTower => 'U',
    }
}

fn paint(text: &str, color: Color) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "\x1b[38;2;{};{};{}m{text}\x1b[0m",
        channel(color.red),
        channel(color.green),
        channel(color.blue)
    )
}

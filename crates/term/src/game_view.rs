//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Phase, Piece};
use crate::engine::Hud;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, COLS, ROWS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Board-and-panel layout for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, hud: &Hud, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (COLS as u16) * self.cell_w;
        let board_px_h = (ROWS as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let bg = CellStyle::plain(Rgb::new(80, 80, 90), PLAY_BG);
        let border = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for y in 0..ROWS as u16 {
            for x in 0..COLS as u16 {
                let cell = snap.board[y as usize][x as usize];
                match PieceKind::from_color_index(cell) {
                    Some(kind) => self.draw_board_cell(fb, start_x, start_y, x, y, kind),
                    None => self.draw_empty_cell(fb, start_x, start_y, x, y),
                }
            }
        }

        if let Some(active) = snap.current {
            if let Some(ghost_y) = snap.ghost_y {
                let ghost_style = CellStyle {
                    dim: true,
                    ..CellStyle::plain(Rgb::from_tuple(active.kind.rgb()).scaled(60), PLAY_BG)
                };
                for (x, y) in active.offset(0, ghost_y - active.y).cells() {
                    if let Some((x, y)) = on_board(x, y) {
                        self.fill_cell_rect(fb, start_x, start_y, x, y, '░', ghost_style);
                    }
                }
            }

            self.draw_piece(fb, start_x, start_y, &active);
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x, start_y, frame_w);

        match snap.phase {
            Phase::Idle => self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PRESS ENTER"),
            Phase::Paused => self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED"),
            Phase::GameOver => self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER"),
            Phase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: &Hud, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    /// Terminal column of board column `x`'s first character for the given frame origin
    pub fn cell_origin(&self, start_x: u16, start_y: u16, x: u16, y: u16) -> (u16, u16) {
        (start_x + 1 + x * self.cell_w, start_y + 1 + y * self.cell_h)
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            dim: true,
            ..CellStyle::plain(Rgb::new(90, 90, 100), PLAY_BG)
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::from_tuple(kind.rgb()), PLAY_BG)
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn draw_piece(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, piece: &Piece) {
        for (x, y) in piece.cells() {
            // Cells above the top edge stay hidden
            if let Some((x, y)) = on_board(x, y) {
                self.draw_board_cell(fb, start_x, start_y, x, y, piece.kind);
            }
        }
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let (px, py) = self.cell_origin(start_x, start_y, cell_x, cell_y);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: &Hud,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 10 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG)
        };
        let value = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("HIGH", hud.high_score.max(snap.score)),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            y = y.saturating_add(1);
            fb.put_u32(panel_x, y, number, value);
            y = y.saturating_add(2);
        }

        fb.put_str(panel_x, y, "SPEED", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.drop_interval_ms, value);
        let digits = snap.drop_interval_ms.max(1).ilog10() as u16 + 1;
        fb.put_str(panel_x + digits, y, "ms", value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            let style = CellStyle::plain(Rgb::from_tuple(next.kind.rgb()), PANEL_BG);
            for (dx, dy) in next.shape.filled_cells() {
                let px = panel_x + dx as u16 * 2;
                let py = y + dy as u16;
                fb.put_str(px, py, "██", style);
            }
            y = y.saturating_add(next.shape.height() as u16);
        } else {
            fb.put_str(panel_x, y, "-", value);
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "SOUND", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, if hud.sound_enabled { "ON" } else { "OFF" }, value);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(255, 255, 255), PANEL_BG)
        };
        fb.put_str(x, mid_y, text, style);
    }
}

/// Width reserved for the side panel when centering
const PANEL_W: u16 = 12;

fn on_board(x: i8, y: i8) -> Option<(u16, u16)> {
    if x >= 0 && x < COLS as i8 && y >= 0 && y < ROWS as i8 {
        Some((x as u16, y as u16))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_shows_start_prompt() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&GameSnapshot::default(), &Hud::default(), Viewport::new(50, 24));

        let middle = fb.row_text(11);
        assert!(middle.contains("PRESS ENTER"), "{middle}");
    }

    #[test]
    fn too_narrow_viewport_skips_panel() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&GameSnapshot::default(), &Hud::default(), Viewport::new(22, 22));
        assert!(!fb.row_text(0).contains("SCORE"));
        assert_eq!(fb.get(0, 0).map(|c| c.ch), Some('┌'));
    }

    #[test]
    fn on_board_clips() {
        assert_eq!(on_board(0, 0), Some((0, 0)));
        assert_eq!(on_board(9, 19), Some((9, 19)));
        assert_eq!(on_board(-1, 0), None);
        assert_eq!(on_board(0, -1), None);
        assert_eq!(on_board(10, 0), None);
    }
}

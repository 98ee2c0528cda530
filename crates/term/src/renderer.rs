//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or [`TerminalRenderer::invalidate`])
//! is a full redraw. Later frames only rewrite the column runs that changed since
//! the previous frame, and colors are re-sent only when the pen actually changes.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;

use crossterm::{
    cursor, queue,
    style::{
        Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetBackgroundColor, SetColors,
        SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        queue!(
            self.buf,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        queue!(
            self.buf,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then keep it as the baseline for the next diff.
    ///
    /// The caller's buffer is swapped with the previous frame, so one pair of
    /// framebuffers is recycled for the whole game.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let baseline = self
            .last
            .take()
            .filter(|prev| prev.width() == fb.width() && prev.height() == fb.height());

        self.buf.clear();
        encode_frame(baseline.as_ref(), fb, &mut self.buf)?;
        self.flush_buf()?;

        let mut spare = baseline.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        std::mem::swap(&mut spare, fb);
        self.last = Some(spare);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode `next` into terminal commands.
///
/// With a same-sized `baseline` only the changed runs are written, otherwise the
/// screen is cleared and every row is written.
fn encode_frame(baseline: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut pen = Pen::new(out);
    let width = next.width() as usize;
    if width == 0 {
        return Ok(());
    }
    let rows = next.cells().chunks(width);

    match baseline {
        Some(prev) => {
            for (y, (old, new)) in prev.cells().chunks(width).zip(rows).enumerate() {
                for run in ChangedRuns::new(old, new) {
                    pen.write_run(run.start as u16, y as u16, &new[run])?;
                }
            }
        }
        None => {
            queue!(pen.out, terminal::Clear(terminal::ClearType::All))?;
            for (y, row) in rows.enumerate() {
                pen.write_run(0, y as u16, row)?;
            }
        }
    }

    pen.finish()
}

/// Tracks the style last sent to the terminal so runs only emit the differences.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn write_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(x, y))?;
        for cell in cells {
            self.switch_to(cell.style)?;
            queue!(self.out, Print(cell.ch))?;
        }
        Ok(())
    }

    fn switch_to(&mut self, style: CellStyle) -> io::Result<()> {
        let Some(prev) = self.style.replace(style) else {
            return self.restyle(style);
        };
        if prev == style {
            return Ok(());
        }
        if prev.bold != style.bold || prev.dim != style.dim {
            return self.restyle(style);
        }
        if prev.fg != style.fg {
            queue!(self.out, SetForegroundColor(color(style.fg)))?;
        }
        if prev.bg != style.bg {
            queue!(self.out, SetBackgroundColor(color(style.bg)))?;
        }
        Ok(())
    }

    /// SGR reset drops colors too, so everything is sent again.
    fn restyle(&mut self, style: CellStyle) -> io::Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }
        queue!(
            self.out,
            SetColors(Colors::new(color(style.fg), color(style.bg)))
        )
    }

    fn finish(self) -> io::Result<()> {
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Column ranges where two equally long rows differ.
struct ChangedRuns<'a> {
    old: &'a [Cell],
    new: &'a [Cell],
    x: usize,
}

impl<'a> ChangedRuns<'a> {
    fn new(old: &'a [Cell], new: &'a [Cell]) -> Self {
        Self { old, new, x: 0 }
    }
}

impl Iterator for ChangedRuns<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let len = self.new.len().min(self.old.len());
        let start = (self.x..len).find(|&i| self.old[i] != self.new[i])?;
        let end = (start..len)
            .find(|&i| self.old[i] == self.new[i])
            .unwrap_or(len);
        self.x = end;
        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char) -> Cell {
        CellStyle::default().into_cell(ch)
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn full_frame_writes_every_glyph() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "AB", CellStyle::default());
        fb.put_str(0, 1, "CD", CellStyle::default());

        let mut out = Vec::new();
        encode_frame(None, &fb, &mut out).unwrap();
        let text = text(&out);
        for ch in ['A', 'B', 'C', 'D'] {
            assert!(text.contains(ch));
        }
    }

    #[test]
    fn unchanged_frame_writes_no_glyphs() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "xyz", CellStyle::default());

        let mut out = Vec::new();
        encode_frame(Some(&fb.clone()), &fb, &mut out).unwrap();
        assert!(!text(&out).contains('x'));
    }

    #[test]
    fn diff_writes_only_changed_cells() {
        let mut prev = FrameBuffer::new(6, 2);
        prev.put_str(0, 0, "SCORE", CellStyle::default());
        let mut next = prev.clone();
        next.put_str(0, 1, "42", CellStyle::default());

        let mut out = Vec::new();
        encode_frame(Some(&prev), &next, &mut out).unwrap();
        let text = text(&out);
        assert!(text.contains("42"));
        assert!(!text.contains('S'));
    }

    #[test]
    fn zero_width_frame_is_empty() {
        let mut out = Vec::new();
        encode_frame(None, &FrameBuffer::new(0, 0), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let old = [glyph(' '); 8];
        let mut new = old;
        for cell in &mut new[1..=3] {
            *cell = glyph('█');
        }
        new[6] = glyph('·');

        let runs: Vec<_> = ChangedRuns::new(&old, &new).collect();
        assert_eq!(runs, vec![1..4, 6..7]);
    }

    #[test]
    fn pen_skips_repeated_styles() {
        let style = CellStyle::default();
        let mut once = Vec::new();
        let mut pen = Pen::new(&mut once);
        pen.switch_to(style).unwrap();
        let first = pen.out.len();
        pen.switch_to(style).unwrap();
        assert_eq!(pen.out.len(), first);

        // Only the foreground changes
        let red = CellStyle {
            fg: Rgb::new(255, 0, 0),
            ..style
        };
        pen.switch_to(red).unwrap();
        let fg_only = pen.out.len() - first;
        assert!(fg_only > 0 && fg_only < first);
    }

    #[test]
    fn rgb_maps_to_truecolor() {
        assert_eq!(color(Rgb::new(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}

//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! A frame is painted in full when there is nothing to diff against (first
//! frame, resize, [`TerminalRenderer::invalidate`]). Otherwise only changed
//! [`Run`]s are repainted. A snake tick touches a few scattered cells (a head,
//! a tail, a score digit), so runs separated by at most [`RUN_MERGE_GAP`]
//! unchanged cells are written as one span instead of paying for another
//! cursor move.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Unchanged cells a diff rewrites rather than moving the cursor past them.
pub const RUN_MERGE_GAP: u16 = 3;

/// Horizontal span of cells to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Owns the terminal while a match is on screen.
///
/// Generic over the output so the swap logic can run against a `Vec<u8>`.
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Frame currently on screen.
    front: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            front: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to repaint everything (e.g. after a resize event).
    pub fn invalidate(&mut self) {
        self.front = None;
    }

    /// Present `fb`, then hand the previously shown frame back through `fb`.
    ///
    /// The caller renders the next frame into whatever `fb` holds afterwards;
    /// no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        match &self.front {
            Some(front) if same_size(front, fb) => encode_diff_into(front, fb, &mut self.buf)?,
            _ => encode_full_into(fb, &mut self.buf)?,
        }
        self.flush_buf()?;

        let mut back = match self.front.take() {
            Some(front) => front,
            None => FrameBuffer::new(fb.width(), fb.height()),
        };
        back.resize(fb.width(), fb.height());
        self.front = Some(std::mem::replace(fb, back));
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full repaint of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut painter = Painter::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for &cell in fb.row(y) {
            painter.paint(out, cell)?;
        }
    }
    finish(out)
}

/// Encode the changes from `prev` to `next` into `out`.
///
/// Writes nothing at all when the frames are identical.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut painter = Painter::default();
    for run in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(run.x, run.y))?;
        let start = usize::from(run.x);
        for &cell in &next.row(run.y)[start..start + usize::from(run.len)] {
            painter.paint(out, cell)?;
        }
    }
    if painter.style.is_some() {
        finish(out)?;
    }
    Ok(())
}

/// Spans of `next` that differ from `prev`, row by row, left to right.
///
/// Frames of different sizes have nothing in common, so every row is one run.
pub fn changed_runs<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> ChangedRuns<'a> {
    ChangedRuns {
        prev,
        next,
        whole_rows: !same_size(prev, next),
        x: 0,
        y: 0,
    }
}

/// Iterator returned by [`changed_runs`].
pub struct ChangedRuns<'a> {
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    whole_rows: bool,
    x: usize,
    y: u16,
}

impl Iterator for ChangedRuns<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        while self.y < self.next.height() {
            let y = self.y;
            if self.whole_rows {
                self.y += 1;
                if self.next.width() > 0 {
                    return Some(Run {
                        x: 0,
                        y,
                        len: self.next.width(),
                    });
                }
                continue;
            }

            let old = self.prev.row(y);
            let new = self.next.row(y);
            if let Some((start, end)) = next_span(old, new, self.x) {
                self.x = end;
                return Some(Run {
                    x: start as u16,
                    y,
                    len: (end - start) as u16,
                });
            }
            self.x = 0;
            self.y += 1;
        }
        None
    }
}

/// First changed span at or after `from`, as `start..end`.
fn next_span(old: &[Cell], new: &[Cell], from: usize) -> Option<(usize, usize)> {
    let start = (from..new.len()).find(|&i| old[i] != new[i])?;
    let mut end = start + 1;
    for i in end..new.len() {
        if old[i] != new[i] {
            end = i + 1;
        } else if i - end >= usize::from(RUN_MERGE_GAP) {
            break;
        }
    }
    Some((start, end))
}

/// Writes cells while tracking the terminal's current style, so consecutive
/// cells only emit the parts of the style that changed.
#[derive(Debug, Default)]
struct Painter {
    style: Option<CellStyle>,
}

impl Painter {
    fn paint(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        let next = cell.style;
        match self.style.replace(next) {
            Some(prev) if prev == next => {}
            Some(prev) if prev.bold == next.bold && prev.dim == next.dim => {
                if prev.fg != next.fg {
                    out.queue(SetForegroundColor(rgb_to_color(next.fg)))?;
                }
                if prev.bg != next.bg {
                    out.queue(SetBackgroundColor(rgb_to_color(next.bg)))?;
                }
            }
            // Attributes can only be cleared by a reset, which drops the colors too.
            _ => apply_style_into(out, next)?,
        }
        out.queue(Print(cell.ch))?;
        Ok(())
    }
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(ResetColor)?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

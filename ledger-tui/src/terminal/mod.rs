//! Terminal setup, teardown and diffed drawing.

mod buffer;

pub use buffer::{Attrs, Buffer, Cell, DEFAULT_BG, DEFAULT_FG};

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use trestle::element::{Element, Rgb};
use unicode_width::UnicodeWidthChar;

use crate::layout::{LayoutResult, Rect, layout};
use crate::paint::{PaintContext, paint};

/// Owns the terminal while the app runs.
///
/// Raw mode, the alternate screen and mouse capture are restored on drop
/// and from a panic hook.
pub struct Terminal {
    stdout: Stdout,
    current: Buffer,
    previous: Buffer,
    last_layout: LayoutResult,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let (width, height) = terminal::size()?;
        debug!("[terminal] initialized at {width}x{height}");

        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
            last_layout: LayoutResult::new(),
        })
    }

    /// Lay out, paint and flush `root`. Only changed cells are written.
    pub fn draw(&mut self, root: &Element, cx: &PaintContext<'_>) -> io::Result<&LayoutResult> {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            debug!("[terminal] resized to {width}x{height}");
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        self.last_layout = layout(root, Rect::from_size(width, height));
        paint(root, &self.last_layout, &mut self.current, cx);

        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);

        Ok(&self.last_layout)
    }

    /// Layout of the last drawn frame.
    pub fn layout(&self) -> &LayoutResult {
        &self.last_layout
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last: Option<(u16, u16)> = None;
        let mut last_width: u16 = 1;
        let mut fg = DEFAULT_FG;
        let mut bg = DEFAULT_BG;
        let mut attrs = Attrs::default();

        queue!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color(fg)),
            SetBackgroundColor(color(bg))
        )?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.wide_continuation {
                continue;
            }

            let sequential = matches!(last, Some((lx, ly)) if ly == y && lx + last_width == x);
            if !sequential {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }

            if cell.attrs != attrs {
                // Any attribute change resets, which also clears colors.
                queue!(self.stdout, SetAttribute(Attribute::Reset))?;
                if cell.attrs.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                if cell.attrs.dim {
                    queue!(self.stdout, SetAttribute(Attribute::Dim))?;
                }
                if cell.attrs.italic {
                    queue!(self.stdout, SetAttribute(Attribute::Italic))?;
                }
                if cell.attrs.underline {
                    queue!(self.stdout, SetAttribute(Attribute::Underlined))?;
                }
                queue!(
                    self.stdout,
                    SetForegroundColor(color(cell.fg)),
                    SetBackgroundColor(color(cell.bg))
                )?;
                attrs = cell.attrs;
                fg = cell.fg;
                bg = cell.bg;
            }
            if cell.fg != fg {
                queue!(self.stdout, SetForegroundColor(color(cell.fg)))?;
                fg = cell.fg;
            }
            if cell.bg != bg {
                queue!(self.stdout, SetBackgroundColor(color(cell.bg)))?;
                bg = cell.bg;
            }

            write!(self.stdout, "{}", cell.char)?;

            last = Some((x, y));
            last_width = cell.char.width().unwrap_or(0).max(1) as u16;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        cursor::Show,
        LeaveAlternateScreen
    )
}

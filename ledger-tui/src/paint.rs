//! Painting a laid-out element tree into a cell buffer.

use trestle::element::{Element, ElementKind, Rgb, find_element};
use trestle::event::HoverTracker;
use trestle::focus::FocusState;
use unicode_width::UnicodeWidthChar;

use crate::layout::{LayoutResult, Rect, is_floating};
use crate::terminal::{Attrs, Buffer, Cell, DEFAULT_BG, DEFAULT_FG};

const PANEL_BG: Rgb = Rgb::hex(0x1B1F2A);
const BORDER: Rgb = Rgb::hex(0x5E6A82);
const BUTTON_BG: Rgb = Rgb::hex(0x2A3142);
const FOCUS_BG: Rgb = Rgb::hex(0x3B5B8C);
const HOVER_BG: Rgb = Rgb::hex(0x222838);
const SELECTED_BG: Rgb = Rgb::hex(0x2E3F5C);
const HEADER_FG: Rgb = Rgb::hex(0x88C0D0);
const INDICATOR: Rgb = Rgb::hex(0xEBCB8B);

/// Interaction state that changes how elements look.
pub struct PaintContext<'a> {
    pub focus: &'a FocusState,
    pub hover: &'a HoverTracker,
}

#[derive(Debug, Clone, Copy)]
struct Ink {
    fg: Rgb,
    bg: Rgb,
    attrs: Attrs,
}

pub fn paint(root: &Element, layout: &LayoutResult, buffer: &mut Buffer, cx: &PaintContext<'_>) {
    let ink = Ink {
        fg: DEFAULT_FG,
        bg: DEFAULT_BG,
        attrs: Attrs::default(),
    };
    paint_element(root, layout, buffer, cx, ink);

    for id in layout.floating() {
        let Some(panel) = find_element(root, id) else {
            continue;
        };
        let Some(rect) = layout.get(id).copied() else {
            continue;
        };
        let ink = Ink { bg: PANEL_BG, ..ink };
        fill(buffer, rect, ink.bg);
        draw_border(buffer, rect, BORDER);
        paint_children(panel, layout, buffer, cx, ink);
    }
}

fn paint_element(
    element: &Element,
    layout: &LayoutResult,
    buffer: &mut Buffer,
    cx: &PaintContext<'_>,
    inherited: Ink,
) {
    let Some(rect) = layout.get(&element.id).copied() else {
        return;
    };

    let mut ink = Ink {
        fg: element.style.foreground.unwrap_or(inherited.fg),
        bg: element.style.background.unwrap_or(inherited.bg),
        attrs: inherited.attrs.with(&element.style),
    };

    match element.kind {
        ElementKind::Row => {
            if cx.focus.is_focused(&element.id) {
                ink.bg = FOCUS_BG;
            } else if element.get_attr("data-state") == Some("selected") {
                ink.bg = SELECTED_BG;
            } else if cx.hover.is_hovered(&element.id) && element.clickable {
                ink.bg = HOVER_BG;
            }
        }
        ElementKind::HeaderCell => {
            ink.fg = element.style.foreground.unwrap_or(HEADER_FG);
            if cx.focus.is_focused(&element.id) {
                ink.bg = FOCUS_BG;
            }
        }
        ElementKind::Button => {
            ink.bg = if cx.focus.is_focused(&element.id) {
                FOCUS_BG
            } else if cx.hover.is_hovered(&element.id) {
                HOVER_BG
            } else {
                BUTTON_BG
            };
        }
        _ => {}
    }

    if ink.bg != inherited.bg || element.style.background.is_some() {
        fill(buffer, rect, ink.bg);
    }

    match element.kind {
        ElementKind::Text => {
            if let Some(text) = element.content.text() {
                for (offset, line) in text.lines().enumerate() {
                    let y = rect.y.saturating_add(offset as u16);
                    if y >= rect.bottom() {
                        break;
                    }
                    write_str(buffer, rect.x, y, rect.width, line, ink);
                }
            }
        }
        ElementKind::Button => {
            let label = format!(" {} ", element.text_content());
            write_str(buffer, rect.x, rect.y, rect.width, &label, ink);
        }
        ElementKind::Skeleton => {
            let glyph = element.text_content().chars().next().unwrap_or('░');
            let ink = Ink {
                attrs: Attrs { dim: true, ..ink.attrs },
                ..ink
            };
            for x in rect.x..rect.right() {
                put(buffer, x, rect.y, glyph, ink);
            }
        }
        _ => paint_children(element, layout, buffer, cx, ink),
    }

    if element.kind == ElementKind::Row
        && element
            .child_elements()
            .first()
            .is_some_and(|cell| cell.get_attr("data-state") == Some("indicated"))
    {
        put(buffer, rect.x, rect.y, '▌', Ink { fg: INDICATOR, ..ink });
    }
}

fn paint_children(
    element: &Element,
    layout: &LayoutResult,
    buffer: &mut Buffer,
    cx: &PaintContext<'_>,
    ink: Ink,
) {
    for child in element.child_elements() {
        if !is_floating(child) {
            paint_element(child, layout, buffer, cx, ink);
        }
    }
}

fn fill(buffer: &mut Buffer, rect: Rect, bg: Rgb) {
    for y in rect.y..rect.bottom().min(buffer.height()) {
        for x in rect.x..rect.right().min(buffer.width()) {
            if let Some(cell) = buffer.get_mut(x, y) {
                cell.bg = bg;
            }
        }
    }
}

fn put(buffer: &mut Buffer, x: u16, y: u16, ch: char, ink: Ink) {
    buffer.set(
        x,
        y,
        Cell {
            char: ch,
            fg: ink.fg,
            bg: ink.bg,
            attrs: ink.attrs,
            wide_continuation: false,
        },
    );
}

/// Write `text` from `(x, y)`, clipped to `max_width` columns. A text that
/// does not fit ends with an ellipsis.
fn write_str(buffer: &mut Buffer, x: u16, y: u16, max_width: u16, text: &str, ink: Ink) {
    let right = x.saturating_add(max_width);
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    let truncate = total > usize::from(max_width);

    let mut cursor = x;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0) as u16;
        if width == 0 {
            continue;
        }
        let reserve = if truncate { 1 } else { 0 };
        if cursor.saturating_add(width).saturating_add(reserve) > right {
            break;
        }
        put(buffer, cursor, y, ch, ink);
        if width == 2
            && let Some(next) = buffer.get_mut(cursor + 1, y)
        {
            next.wide_continuation = true;
            next.bg = ink.bg;
        }
        cursor = cursor.saturating_add(width);
    }

    if truncate && max_width > 0 {
        put(buffer, cursor.min(right - 1), y, '…', ink);
    }
}

fn draw_border(buffer: &mut Buffer, rect: Rect, fg: Rgb) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }

    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    let mut set = |x: u16, y: u16, ch: char| {
        if let Some(cell) = buffer.get_mut(x, y) {
            cell.char = ch;
            cell.fg = fg;
        }
    };

    set(rect.x, rect.y, '┌');
    set(right, rect.y, '┐');
    set(rect.x, bottom, '└');
    set(right, bottom, '┘');
    for x in (rect.x + 1)..right {
        set(x, rect.y, '─');
        set(x, bottom, '─');
    }
    for y in (rect.y + 1)..bottom {
        set(rect.x, y, '│');
        set(right, y, '│');
    }
}

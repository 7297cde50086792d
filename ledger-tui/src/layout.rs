//! Positions for every element of a frame.
//!
//! The screen is a vertical stack. Tables are laid out as a grid whose
//! column widths come from width hints, then content, and honour
//! `col_span`. Cell contents flow left to right. Elements marked as
//! floating (drawers, modals, action menus) are positioned last, over the
//! rest of the frame.

use std::collections::HashMap;

use trestle::element::{Align, Element, ElementKind};
use unicode_width::UnicodeWidthStr;

/// Attribute naming how a floating panel is placed.
pub const FLOAT_ATTR: &str = "float";
pub const FLOAT_DRAWER: &str = "drawer";
pub const FLOAT_MODAL: &str = "modal";

/// Attribute switching a box from vertical stacking to inline flow.
pub const FLOW_ATTR: &str = "flow";
pub const FLOW_INLINE: &str = "inline";

const DRAWER_WIDTH: u16 = 52;
const MODAL_WIDTH: u16 = 56;
const MIN_COLUMN_WIDTH: u16 = 3;
const EMPTY_ROW_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn shrink(self, top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            x: self.x.saturating_add(left),
            y: self.y.saturating_add(top),
            width: self.width.saturating_sub(left + right),
            height: self.height.saturating_sub(top + bottom),
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    rects: HashMap<String, Rect>,
    floating: Vec<String>,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, rect: Rect) {
        self.rects.insert(id.into(), rect);
    }

    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.rects.get(id)
    }

    /// Floating element ids, bottom-most first.
    pub fn floating(&self) -> &[String] {
        &self.floating
    }
}

pub fn is_floating(element: &Element) -> bool {
    element.get_attr(FLOAT_ATTR).is_some() || element.get_attr("role") == Some("menu")
}

fn is_inline_box(element: &Element) -> bool {
    element.get_attr(FLOW_ATTR) == Some(FLOW_INLINE)
}

struct Cx<'a> {
    out: LayoutResult,
    /// Floating elements with the rect they are anchored to.
    pending: Vec<(&'a Element, Rect)>,
}

pub fn layout(root: &Element, area: Rect) -> LayoutResult {
    let mut cx = Cx {
        out: LayoutResult::new(),
        pending: Vec::new(),
    };

    layout_node(root, area, &mut cx);

    // Floating panels may contain floating children of their own.
    let mut next = 0;
    while next < cx.pending.len() {
        let (element, anchor) = cx.pending[next];
        next += 1;

        let rect = float_rect(element, anchor, area);
        cx.out.floating.push(element.id.clone());
        cx.out.insert(element.id.clone(), rect);
        layout_stack(element, rect.shrink(1, 1, 1, 1), &mut cx);
    }

    cx.out
}

fn layout_node<'a>(element: &'a Element, rect: Rect, cx: &mut Cx<'a>) {
    cx.out.insert(element.id.clone(), rect);
    match element.kind {
        ElementKind::Table => layout_table(element, rect, cx),
        ElementKind::Box if !is_inline_box(element) => layout_stack(element, rect, cx),
        _ => layout_inline(element, rect, cx),
    }
}

fn layout_stack<'a>(element: &'a Element, rect: Rect, cx: &mut Cx<'a>) {
    let mut y = rect.y;
    for child in element.child_elements() {
        if is_floating(child) {
            cx.pending.push((child, rect));
            continue;
        }
        let height = measure_height(child).min(rect.bottom().saturating_sub(y));
        layout_node(child, Rect::new(rect.x, y, rect.width, height), cx);
        y = y.saturating_add(height);
    }
}

fn layout_inline<'a>(element: &'a Element, rect: Rect, cx: &mut Cx<'a>) {
    let children: Vec<&Element> = element
        .child_elements()
        .iter()
        .filter(|child| {
            if is_floating(child) {
                cx.pending.push((*child, rect));
                false
            } else {
                true
            }
        })
        .collect();

    if children.is_empty() {
        return;
    }

    let widths: Vec<u16> = children
        .iter()
        .map(|child| match child.kind {
            ElementKind::Skeleton => (rect.width / 2).max(1),
            _ => intrinsic_width(child),
        })
        .collect();
    let gaps = u16::try_from(children.len() - 1).unwrap_or(u16::MAX);
    let total = widths.iter().fold(gaps, |acc, w| acc.saturating_add(*w));

    let mut x = match element.align {
        Align::Left => rect.x,
        Align::Center => rect.x + rect.width.saturating_sub(total) / 2,
        Align::Right => rect.x + rect.width.saturating_sub(total),
    };

    for (child, width) in children.into_iter().zip(widths) {
        let width = width.min(rect.right().saturating_sub(x));
        layout_node(child, Rect::new(x, rect.y, width, rect.height.min(1)), cx);
        x = x.saturating_add(width).saturating_add(1);
    }
}

fn layout_table<'a>(table: &'a Element, rect: Rect, cx: &mut Cx<'a>) {
    let compact = table.get_attr("compact").is_some();
    let full_width = table.get_attr("full-width").is_some();
    let padding = if compact { 0 } else { 1 };

    let rows: Vec<&Element> = table
        .child_elements()
        .iter()
        .flat_map(|section| section.child_elements())
        .collect();
    let widths = column_widths(&rows, rect.width, full_width, padding * 2);
    let table_width = widths.iter().fold(0u16, |acc, w| acc.saturating_add(*w));

    let mut y = rect.y;
    for section in table.child_elements() {
        let section_top = y;

        for row in section.child_elements() {
            let height = row_height(row).min(rect.bottom().saturating_sub(y));
            cx.out.insert(row.id.clone(), Rect::new(rect.x, y, table_width, height));

            let mut column = 0usize;
            let mut x = rect.x;
            for cell in row.child_elements() {
                let span = usize::from(cell.col_span);
                let end = (column + span).min(widths.len());
                let width = widths[column.min(end)..end]
                    .iter()
                    .fold(0u16, |acc, w| acc.saturating_add(*w));

                let cell_rect = Rect::new(x, y, width, height);
                cx.out.insert(cell.id.clone(), cell_rect);

                let middle = height.saturating_sub(1) / 2;
                let content = Rect::new(cell_rect.x, y + middle, width, height.min(1))
                    .shrink(0, padding, 0, padding);
                layout_inline(cell, content, cx);

                x = x.saturating_add(width);
                column += span;
            }

            y = y.saturating_add(height);
        }

        cx.out.insert(
            section.id.clone(),
            Rect::new(rect.x, section_top, table_width, y - section_top),
        );
    }
}

fn row_height(row: &Element) -> u16 {
    if row.get_attr("data-empty").is_some() {
        EMPTY_ROW_HEIGHT
    } else {
        1
    }
}

/// Width of every grid column.
///
/// Width hints win. Other columns take their widest single-span cell plus
/// padding. Overflow shrinks the widest flexible column first; full-width
/// tables share leftover space among flexible columns.
pub fn column_widths(rows: &[&Element], available: u16, full_width: bool, padding: u16) -> Vec<u16> {
    let count = rows
        .iter()
        .map(|row| {
            row.child_elements()
                .iter()
                .map(|cell| usize::from(cell.col_span))
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0);

    let mut widths = vec![MIN_COLUMN_WIDTH; count];
    let mut fixed = vec![false; count];

    for row in rows {
        for_each_single_span(row, |column, cell| {
            if let Some(hint) = cell.width {
                if !fixed[column] {
                    widths[column] = 0;
                }
                widths[column] = widths[column].max(hint);
                fixed[column] = true;
            }
        });
    }
    for row in rows {
        for_each_single_span(row, |column, cell| {
            if !fixed[column] {
                let content = intrinsic_width(cell).saturating_add(padding);
                widths[column] = widths[column].max(content);
            }
        });
    }

    let flexible: Vec<usize> = (0..count).filter(|&c| !fixed[c]).collect();
    let mut total: u32 = widths.iter().map(|&w| u32::from(w)).sum();

    while total > u32::from(available) {
        let Some(&widest) = flexible
            .iter()
            .filter(|&&c| widths[c] > MIN_COLUMN_WIDTH)
            .max_by_key(|&&c| widths[c])
        else {
            break;
        };
        widths[widest] -= 1;
        total -= 1;
    }

    if full_width && !flexible.is_empty() && total < u32::from(available) {
        let extra = u32::from(available) - total;
        let share = extra / flexible.len() as u32;
        let remainder = extra % flexible.len() as u32;
        for (i, &c) in flexible.iter().enumerate() {
            let bonus = share + u32::from((i as u32) < remainder);
            widths[c] = widths[c].saturating_add(u16::try_from(bonus).unwrap_or(u16::MAX));
        }
    }

    widths
}

fn for_each_single_span(row: &Element, mut f: impl FnMut(usize, &Element)) {
    let mut column = 0usize;
    for cell in row.child_elements() {
        if cell.col_span == 1 {
            f(column, cell);
        }
        column += usize::from(cell.col_span);
    }
}

/// Rows an element needs in a vertical stack.
pub fn measure_height(element: &Element) -> u16 {
    match element.kind {
        ElementKind::Table => element
            .child_elements()
            .iter()
            .flat_map(|section| section.child_elements())
            .map(row_height)
            .fold(0u16, u16::saturating_add),
        ElementKind::Box if !is_inline_box(element) => element
            .child_elements()
            .iter()
            .filter(|child| !is_floating(child))
            .map(measure_height)
            .fold(0u16, u16::saturating_add),
        ElementKind::Text => element
            .content
            .text()
            .map_or(1, |text| u16::try_from(text.lines().count().max(1)).unwrap_or(u16::MAX)),
        _ => 1,
    }
}

/// Columns an element needs on one line.
pub fn intrinsic_width(element: &Element) -> u16 {
    let width = match element.kind {
        ElementKind::Text => element
            .content
            .text()
            .map(|text| text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0))
            .unwrap_or(0),
        ElementKind::Button => element.text_content().width() + 2,
        ElementKind::Skeleton => 1,
        _ => {
            let children: Vec<u16> = element
                .child_elements()
                .iter()
                .filter(|child| !is_floating(child))
                .map(intrinsic_width)
                .collect();
            let gaps = children.len().saturating_sub(1);
            children.iter().map(|&w| usize::from(w)).sum::<usize>() + gaps
        }
    };
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn float_rect(element: &Element, anchor: Rect, area: Rect) -> Rect {
    match element.get_attr(FLOAT_ATTR) {
        Some(FLOAT_DRAWER) => {
            let width = DRAWER_WIDTH.min(area.width);
            Rect::new(area.right() - width, area.y, width, area.height)
        }
        Some(FLOAT_MODAL) => {
            let width = MODAL_WIDTH.min(area.width);
            let height = measure_height(element).saturating_add(2).min(area.height);
            Rect::new(
                area.x + (area.width - width) / 2,
                area.y + (area.height - height) / 2,
                width,
                height,
            )
        }
        _ => {
            // Dropdown below its anchor, right-aligned to it.
            let inner = element
                .child_elements()
                .iter()
                .map(intrinsic_width)
                .max()
                .unwrap_or(0);
            let width = inner.saturating_add(2).min(area.width);
            let height = measure_height(element).saturating_add(2).min(area.height);
            let x = anchor.right().saturating_sub(width).max(area.x);
            let below = anchor.y.saturating_add(1);
            let y = if below.saturating_add(height) <= area.bottom() {
                below
            } else {
                area.bottom().saturating_sub(height)
            };
            Rect::new(x, y, width, height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: Vec<Element>) -> Element {
        Element::row().children(cells)
    }

    #[test]
    fn hints_win_over_content() {
        let rows = [
            row(vec![Element::cell().width(10), Element::cell().child(Element::text("abc"))]),
            row(vec![
                Element::cell().child(Element::text("a much longer value")),
                Element::cell().child(Element::text("abcdef")),
            ]),
        ];
        let rows: Vec<&Element> = rows.iter().collect();

        assert_eq!(column_widths(&rows, 80, false, 2), vec![10, 8]);
    }

    #[test]
    fn spanning_cells_do_not_widen_columns() {
        let rows = [
            row(vec![
                Element::cell().child(Element::text("ab")),
                Element::cell().child(Element::text("cd")),
            ]),
            row(vec![
                Element::cell()
                    .col_span(2)
                    .child(Element::text("nothing to show here")),
            ]),
        ];
        let rows: Vec<&Element> = rows.iter().collect();

        assert_eq!(column_widths(&rows, 80, false, 0), vec![3, 3]);
    }

    #[test]
    fn overflow_shrinks_widest_flexible_column() {
        let rows = [row(vec![
            Element::cell().child(Element::text("x".repeat(30))),
            Element::cell().child(Element::text("y".repeat(10))),
            Element::cell().width(5),
        ])];
        let rows: Vec<&Element> = rows.iter().collect();

        let widths = column_widths(&rows, 30, false, 0);

        assert_eq!(widths.iter().sum::<u16>(), 30);
        assert_eq!(widths, vec![15, 10, 5]);
    }

    #[test]
    fn full_width_shares_leftover() {
        let rows = [row(vec![
            Element::cell().child(Element::text("abc")),
            Element::cell().child(Element::text("abc")),
            Element::cell().width(4),
        ])];
        let rows: Vec<&Element> = rows.iter().collect();

        assert_eq!(column_widths(&rows, 15, true, 0), vec![6, 5, 4]);
    }

    #[test]
    fn menu_floats_below_anchor() {
        let root = Element::box_().id("root").child(
            Element::box_()
                .id("anchor")
                .attr(FLOW_ATTR, FLOW_INLINE)
                .child(Element::button("⋯").id("trigger"))
                .child(
                    Element::box_()
                        .id("menu")
                        .attr("role", "menu")
                        .child(Element::button("Delete").id("delete")),
                ),
        );

        let layout = layout(&root, Rect::from_size(40, 10));

        assert_eq!(layout.floating(), &["menu".to_string()]);
        let menu = layout.get("menu").copied().unwrap_or_default();
        assert_eq!(menu, Rect::new(30, 1, 10, 3));
        assert_eq!(layout.get("delete").copied(), Some(Rect::new(31, 2, 8, 1)));
    }
}

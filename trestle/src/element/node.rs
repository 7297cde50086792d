use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Align, Content, Handler, Style};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// The role an element plays in the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    #[default]
    Box,
    Text,
    Table,
    Header,
    Body,
    Footer,
    Row,
    HeaderCell,
    Cell,
    Button,
    Skeleton,
}

#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub id: String,
    pub kind: ElementKind,

    // Content
    pub content: Content,

    // Presentation hints
    pub class_name: Option<String>,
    pub attrs: HashMap<String, String>,
    pub col_span: u16,
    pub width: Option<u16>,
    pub align: Align,
    pub style: Style,

    // Interaction
    /// Pointer affordance only. Hit testing and bubbling do not depend on it.
    pub clickable: bool,
    pub focusable: bool,
    /// Halts click bubbling after this element's own handler ran.
    pub stop_propagation: bool,

    pub on_click: Option<Handler>,
    pub on_mouse_enter: Option<Handler>,
    pub on_mouse_leave: Option<Handler>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            kind: ElementKind::Box,
            content: Content::None,
            class_name: None,
            attrs: HashMap::new(),
            col_span: 1,
            width: None,
            align: Align::Left,
            style: Style::default(),
            clickable: false,
            focusable: false,
            stop_propagation: false,
            on_click: None,
            on_mouse_enter: None,
            on_mouse_leave: None,
        }
    }
}

impl Element {
    fn of_kind(kind: ElementKind, prefix: &str) -> Self {
        Self {
            id: generate_id(prefix),
            kind,
            ..Default::default()
        }
    }

    pub fn box_() -> Self {
        Self::of_kind(ElementKind::Box, "box")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Content::Text(content.into()),
            ..Self::of_kind(ElementKind::Text, "text")
        }
    }

    pub fn table() -> Self {
        Self::of_kind(ElementKind::Table, "table")
    }

    pub fn header() -> Self {
        Self::of_kind(ElementKind::Header, "thead")
    }

    pub fn body() -> Self {
        Self::of_kind(ElementKind::Body, "tbody")
    }

    pub fn footer() -> Self {
        Self::of_kind(ElementKind::Footer, "tfoot")
    }

    pub fn row() -> Self {
        Self::of_kind(ElementKind::Row, "tr")
    }

    pub fn header_cell() -> Self {
        Self::of_kind(ElementKind::HeaderCell, "th")
    }

    pub fn cell() -> Self {
        Self::of_kind(ElementKind::Cell, "td")
    }

    /// A focusable, clickable button with a text label.
    pub fn button(label: impl Into<String>) -> Self {
        Self {
            content: Content::Text(label.into()),
            clickable: true,
            focusable: true,
            ..Self::of_kind(ElementKind::Button, "button")
        }
    }

    /// Loading placeholder shape.
    pub fn skeleton() -> Self {
        Self::of_kind(ElementKind::Skeleton, "skeleton")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Presentation
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn col_span(mut self, span: u16) -> Self {
        self.col_span = span.max(1);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    // Interaction
    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = stop;
        self
    }

    pub fn on_click(mut self, handler: impl Into<Handler>) -> Self {
        self.on_click = Some(handler.into());
        self
    }

    pub fn on_mouse_enter(mut self, handler: impl Into<Handler>) -> Self {
        self.on_mouse_enter = Some(handler.into());
        self
    }

    pub fn on_mouse_leave(mut self, handler: impl Into<Handler>) -> Self {
        self.on_mouse_leave = Some(handler.into());
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }

    pub fn child_elements(&self) -> &[Element] {
        self.content.children()
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(s) => s.clone(),
            Content::Children(children) => children
                .iter()
                .map(Element::text_content)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

//! # FragmentView Component
//!
//! Scrollable body of the current view: one or more sections, each an
//! optional heading over a rendered [`Fragment`].
//!
//! ## Architecture
//!
//! `FragmentView` is a transient component (created each frame) that wraps
//! `&'a mut FragmentViewState` (persistent state) and the fragments (props).
//! During render it records where every link landed, so mouse clicks and
//! keyboard selection can be resolved against the last frame.
//!
//! The scroll offset is owned by `App` (it resets on every view change); the
//! event loop copies it into `offset` before drawing and back afterwards.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::render::{Block, Fragment, Link};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

pub const LOADING_MESSAGE: &str = "Loading posts...";

/// Where a link was drawn, in content rows (before scrolling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRegion {
    pub link: Link,
    pub top: u16,
    pub height: u16,
}

#[derive(Default)]
pub struct FragmentViewState {
    pub scroll_state: ScrollViewState,
    /// Vertical scroll offset in content rows.
    pub offset: u16,
    /// Index into `links` of the keyboard-selected link.
    pub selected: Option<usize>,
    /// Links from the last render, in display order.
    pub links: Vec<LinkRegion>,
    pub viewport_height: u16,
    pub content_height: u16,
}

impl FragmentViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget selection; called when the visible view changes.
    pub fn reset(&mut self) {
        self.selected = None;
        self.links.clear();
    }

    /// The link drawn at content row `content_y`, if any.
    pub fn link_at(&self, content_y: u16) -> Option<&Link> {
        self.links
            .iter()
            .find(|r| content_y >= r.top && content_y < r.top + r.height)
            .map(|r| &r.link)
    }

    pub fn selected_link(&self) -> Option<&Link> {
        self.selected
            .and_then(|i| self.links.get(i))
            .map(|r| &r.link)
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.offset as i32 + delta).clamp(0, self.max_offset() as i32);
        self.offset = next as u16;
    }

    /// Scroll so the selected link is fully visible.
    fn scroll_to_selected(&mut self) {
        let Some(region) = self.selected.and_then(|i| self.links.get(i)) else {
            return;
        };
        let bottom = region.top + region.height;
        if region.top < self.offset {
            self.offset = region.top;
        } else if bottom > self.offset + self.viewport_height {
            self.offset = bottom.saturating_sub(self.viewport_height);
        }
    }
}

impl EventHandler for FragmentViewState {
    type Event = Link;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Link> {
        match event {
            TuiEvent::CursorUp if !self.links.is_empty() => {
                self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
                self.scroll_to_selected();
                None
            }
            TuiEvent::CursorDown if !self.links.is_empty() => {
                let last = self.links.len() - 1;
                self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
                self.scroll_to_selected();
                None
            }
            TuiEvent::ScrollUp => {
                self.scroll_by(-1);
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_by(1);
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_by(-(self.viewport_height.max(1) as i32));
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_by(self.viewport_height.max(1) as i32);
                None
            }
            TuiEvent::Activate => self.selected_link().cloned(),
            _ => None,
        }
    }
}

/// One titled container inside the view.
pub struct Section<'a> {
    pub heading: Option<&'static str>,
    pub fragment: &'a Fragment,
}

pub struct FragmentView<'a> {
    pub state: &'a mut FragmentViewState,
    pub sections: Vec<Section<'a>>,
    pub is_loading: bool,
}

impl<'a> FragmentView<'a> {
    pub fn new(state: &'a mut FragmentViewState, sections: Vec<Section<'a>>, is_loading: bool) -> Self {
        Self {
            state,
            sections,
            is_loading,
        }
    }
}

/// Row counts past `u16::MAX` saturate rather than wrap.
fn clamp_height(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX)
}

/// A laid-out paragraph and the link it belongs to, if any.
struct Piece {
    paragraph: Paragraph<'static>,
    height: u16,
    link: Option<Link>,
}

impl Piece {
    fn new(text: impl Into<Text<'static>>, width: u16, trim: bool) -> Self {
        let paragraph = Paragraph::new(text).wrap(Wrap { trim });
        let height = clamp_height(paragraph.line_count(width));
        Self {
            paragraph,
            height,
            link: None,
        }
    }

    fn spacer() -> Self {
        Self {
            paragraph: Paragraph::default(),
            height: 1,
            link: None,
        }
    }

    fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }
}

fn link_line(label: String, selected: bool) -> Line<'static> {
    let mut style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let marker = if selected { "▸ " } else { "  " };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(label, style),
    ])
}

fn muted(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Wrap `text` to `width` with a two-column hanging indent.
fn indented(text: &str, width: u16) -> Text<'static> {
    let options = textwrap::Options::new((width as usize).max(3))
        .initial_indent("  ")
        .subsequent_indent("  ");
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| Line::from(line.into_owned()))
        .collect()
}

/// Lay out one fragment. `next_link` is the index the fragment's first link gets.
fn fragment_pieces(fragment: &Fragment, width: u16, selected: Option<usize>, next_link: &mut usize) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut take_link = || {
        let index = *next_link;
        *next_link += 1;
        selected == Some(index)
    };

    for block in fragment.blocks() {
        match block {
            Block::Summary {
                id,
                title,
                date,
                summary,
            } => {
                let is_selected = take_link();
                pieces.push(
                    Piece::new(link_line(title.clone(), is_selected), width, true)
                        .with_link(Link::Post(id.clone())),
                );
                pieces.push(Piece::new(muted(format!("  {date}")), width, true));
                if !summary.is_empty() {
                    pieces.push(Piece::new(indented(summary, width), width, false));
                }
                pieces.push(Piece::spacer());
            }
            Block::Message(text) => {
                let line = Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ));
                pieces.push(Piece::new(line, width, true));
                pieces.push(Piece::spacer());
            }
            Block::Article {
                back,
                title,
                date,
                content,
            } => {
                let is_selected = take_link();
                pieces.push(
                    Piece::new(link_line(back.label.clone(), is_selected), width, true)
                        .with_link(Link::Back(back.target.clone())),
                );
                pieces.push(Piece::spacer());
                let heading = Line::from(Span::styled(
                    title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ));
                pieces.push(Piece::new(heading, width, true));
                pieces.push(Piece::new(muted(date.clone()), width, true));
                pieces.push(Piece::spacer());
                pieces.push(Piece::new(markdown::render(content, Color::White), width, false));
            }
        }
    }
    pieces
}

impl<'a> Component for FragmentView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let mut next_link = 0usize;
        let mut pieces = Vec::new();

        for section in &self.sections {
            if let Some(heading) = section.heading {
                let line = Line::from(Span::styled(
                    heading,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
                pieces.push(Piece::new(line, content_width, true));
                pieces.push(Piece::spacer());
            }
            if self.is_loading {
                pieces.push(Piece::new(muted(LOADING_MESSAGE.to_string()), content_width, true));
                pieces.push(Piece::spacer());
                continue;
            }
            pieces.extend(fragment_pieces(
                section.fragment,
                content_width,
                self.state.selected,
                &mut next_link,
            ));
        }

        // Record link positions and total height
        let mut links = Vec::new();
        let mut y: u16 = 0;
        for piece in &pieces {
            if let Some(link) = &piece.link {
                links.push(LinkRegion {
                    link: link.clone(),
                    top: y,
                    height: piece.height,
                });
            }
            y = y.saturating_add(piece.height);
        }
        self.state.links = links;
        self.state.content_height = y;
        self.state.viewport_height = area.height;
        if let Some(selected) = self.state.selected
            && selected >= self.state.links.len()
        {
            self.state.selected = None;
        }
        self.state.offset = self.state.offset.min(self.state.max_offset());

        let mut scroll_view = ScrollView::new(Size::new(content_width, y))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for piece in pieces {
            if piece.height > 0 {
                let rect = Rect::new(0, y_offset, content_width, piece.height);
                scroll_view.render_widget(piece.paragraph, rect);
            }
            y_offset = y_offset.saturating_add(piece.height);
        }

        self.state.scroll_state.set_offset(Position {
            x: 0,
            y: self.state.offset,
        });
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

//! # NavBar Component
//!
//! Single-line top bar: the blog name followed by the three nav links.
//! The active link is drawn bold, underlined and marked with `●`, the
//! terminal stand-in for an `aria-current="page"` link.
//!
//! Stateless: it receives the active link as a prop. Column positions are
//! exposed through [`NavBar::hit_test`] so mouse clicks can be routed.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::view::NavLink;
use crate::tui::component::Component;

const BRAND: &str = " Folio ";
const SEPARATOR: &str = "  ";

pub struct NavBar {
    pub active: Option<NavLink>,
}

impl NavBar {
    pub fn new(active: Option<NavLink>) -> Self {
        Self { active }
    }

    fn link_text(&self, link: NavLink) -> String {
        let index = NavLink::ALL.iter().position(|l| *l == link).unwrap_or(0) + 1;
        let marker = if self.active == Some(link) { "●" } else { " " };
        format!("{marker}[{index}] {}", link.label())
    }

    /// Column span `[start, end)` of each link, relative to the bar's left edge.
    fn link_columns(&self) -> Vec<(NavLink, u16, u16)> {
        let mut col = BRAND.width() as u16 + 1;
        NavLink::ALL
            .into_iter()
            .map(|link| {
                let width = self.link_text(link).width() as u16;
                let span = (link, col, col + width);
                col += width + SEPARATOR.width() as u16;
                span
            })
            .collect()
    }

    /// Which link, if any, sits at column `col` (relative to the bar).
    pub fn hit_test(&self, col: u16) -> Option<NavLink> {
        self.link_columns()
            .into_iter()
            .find(|(_, start, end)| (*start..*end).contains(&col))
            .map(|(link, _, _)| link)
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                BRAND,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];
        for (i, link) in NavLink::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(SEPARATOR));
            }
            let style = if self.active == Some(link) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(self.link_text(link), style));
        }
        Line::from(spans)
    }
}

impl Component for NavBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(nav: &mut NavBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| nav.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_all_links() {
        let text = rendered_text(&mut NavBar::new(Some(NavLink::Home)));
        assert!(text.contains("Folio"));
        assert!(text.contains("●[1] Home"));
        assert!(text.contains(" [2] Reviews"));
        assert!(text.contains(" [3] Chapters"));
    }

    #[test]
    fn test_no_active_link_has_no_marker() {
        let text = rendered_text(&mut NavBar::new(None));
        assert!(!text.contains('●'));
    }

    #[test]
    fn test_active_link_is_styled() {
        let nav = NavBar::new(Some(NavLink::Reviews));
        let line = nav.line();
        let reviews = line
            .spans
            .iter()
            .find(|s| s.content.contains("Reviews"))
            .unwrap();
        assert!(reviews.style.add_modifier.contains(Modifier::UNDERLINED));
        let home = line.spans.iter().find(|s| s.content.contains("Home")).unwrap();
        assert!(!home.style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_hit_test_matches_rendered_columns() {
        let nav = NavBar::new(Some(NavLink::Home));
        // " Folio " (7) + " " (1) → first link starts at column 8
        assert_eq!(nav.hit_test(0), None);
        assert_eq!(nav.hit_test(8), Some(NavLink::Home));
        let columns = nav.link_columns();
        let (_, chapters_start, chapters_end) = columns[2];
        assert_eq!(nav.hit_test(chapters_start), Some(NavLink::Chapters));
        assert_eq!(nav.hit_test(chapters_end), None);
        // Gap between links hits nothing
        let (_, _, home_end) = columns[0];
        assert_eq!(nav.hit_test(home_end), None);
    }
}

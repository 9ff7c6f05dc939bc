use crate::core::dispatch::Gesture;
use crate::core::render::Link;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FragmentView, NavBar, Section};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

const KEY_HINTS: &str = " 1/2/3 nav  ↑↓ select  ⏎ open  esc back  q quit";
const MAX_ERROR_HEIGHT: u16 = 6;

/// Screen regions for one frame.
struct Areas {
    nav: Rect,
    error: Rect,
    body: Rect,
    footer: Rect,
}

fn error_paragraph(message: &str) -> Paragraph<'_> {
    let style = Style::default().fg(Color::Red);
    Paragraph::new(message)
        .block(
            Block::bordered()
                .title("Error")
                .border_style(style)
                .title_style(style.add_modifier(Modifier::BOLD)),
        )
        .style(style)
        .wrap(Wrap { trim: true })
}

fn areas(frame_area: Rect, app: &App) -> Areas {
    use Constraint::{Length, Min};

    let error_height = app
        .error
        .as_deref()
        .map(|msg| (error_paragraph(msg).line_count(frame_area.width) as u16).min(MAX_ERROR_HEIGHT))
        .unwrap_or(0);
    let layout = Layout::vertical([Length(1), Length(error_height), Min(0), Length(1)]);
    let [nav, error, body, footer] = layout.areas(frame_area);
    Areas {
        nav,
        error,
        body,
        footer,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let areas = areas(frame.area(), app);

    NavBar::new(app.active_nav).render(frame, areas.nav);

    if let Some(message) = &app.error {
        frame.render_widget(error_paragraph(message), areas.error);
    }

    let sections = app
        .current_view
        .targets()
        .iter()
        .map(|target| Section {
            heading: target.heading(),
            fragment: app.container(*target),
        })
        .collect();
    FragmentView::new(&mut tui.body, sections, app.is_loading).render(frame, areas.body);

    draw_footer(frame, areas.footer, app);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    use Constraint::{Length, Min};

    let source = format!("{} ", app.source_label);
    let [hints_area, source_area] =
        Layout::horizontal([Min(0), Length(source.chars().count() as u16)]).areas(area);
    let muted = Style::default().fg(Color::DarkGray);
    frame.render_widget(Line::from(Span::styled(KEY_HINTS, muted)), hints_area);
    frame.render_widget(Line::from(Span::styled(source, muted)), source_area);
}

/// Resolve a left click at screen `(col, row)` into a gesture.
///
/// Uses the layout of the last drawn frame (link positions recorded by the
/// body component), so it must be called against the same `App` state.
pub fn hit_test(col: u16, row: u16, frame_area: Rect, app: &App, tui: &TuiState) -> Gesture {
    let areas = areas(frame_area, app);

    if row == areas.nav.y {
        let nav = NavBar::new(app.active_nav);
        return match nav.hit_test(col.saturating_sub(areas.nav.x)) {
            Some(link) => Gesture::Nav(link.id().to_string()),
            None => Gesture::Other,
        };
    }

    let body = areas.body;
    if row < body.y || row >= body.y + body.height || col >= body.x + body.width.saturating_sub(1) {
        return Gesture::Other;
    }

    let content_y = (row - body.y) + tui.body.offset;
    match tui.body.link_at(content_y) {
        Some(link) => link_gesture(link),
        None => Gesture::Other,
    }
}

/// The gesture produced by activating a rendered link.
pub fn link_gesture(link: &Link) -> Gesture {
    match link {
        Link::Post(id) => Gesture::PostTitle {
            id: Some(id.clone()),
        },
        Link::Back(target) => Gesture::Back {
            target: Some(target.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::core::action::{Action, update};
    use crate::test_support::{loaded_app, raw_post};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn draw(app: &App, tui: &mut TuiState) -> (String, Rect) {
        let backend = TestBackend::new(70, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut area = Rect::default();
        terminal
            .draw(|f| {
                area = f.area();
                draw_ui(f, app, tui);
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        (text, area)
    }

    fn sample_app() -> App {
        loaded_app(json!([
            raw_post("r1", "review", "2024-03-01"),
            raw_post("c1", "chapter", "2024-02-01"),
        ]))
    }

    #[test]
    fn test_draw_home() {
        let app = sample_app();
        let mut tui = TuiState::new();
        let (text, _) = draw(&app, &mut tui);
        assert!(text.contains("Recent Reviews"));
        assert!(text.contains("Recent Chapters"));
        assert!(text.contains("Title r1"));
        assert!(text.contains("Title c1"));
        assert!(!text.contains("Error"));
    }

    #[test]
    fn test_draw_loading() {
        let app = App::default();
        let mut tui = TuiState::new();
        let (text, _) = draw(&app, &mut tui);
        assert!(text.contains("Loading posts..."));
    }

    #[test]
    fn test_draw_error_banner() {
        let mut app = App::default();
        update(
            &mut app,
            Action::PostsLoaded(Err(FetchError::Status {
                status: 404,
                reason: "Not Found".to_string(),
            })),
        );
        let mut tui = TuiState::new();
        let (text, _) = draw(&app, &mut tui);
        assert!(text.contains("Error loading blog content"));
        assert!(!text.contains("Loading posts..."));
    }

    #[test]
    fn test_click_post_title() {
        let app = sample_app();
        let mut tui = TuiState::new();
        let (_, area) = draw(&app, &mut tui);
        let top = tui.body.links[0].top;
        // nav row, no error banner → body starts at row 1
        let gesture = hit_test(5, 1 + top, area, &app, &tui);
        assert_eq!(
            gesture,
            Gesture::PostTitle {
                id: Some("r1".to_string())
            }
        );
    }

    #[test]
    fn test_click_nav_and_empty_space() {
        let app = sample_app();
        let mut tui = TuiState::new();
        let (_, area) = draw(&app, &mut tui);
        assert_eq!(
            hit_test(8, 0, area, &app, &tui),
            Gesture::Nav("nav-home".to_string())
        );
        assert_eq!(hit_test(0, 0, area, &app, &tui), Gesture::Other);
        assert_eq!(hit_test(5, 29, area, &app, &tui), Gesture::Other);
    }

    #[test]
    fn test_click_back_link() {
        let mut app = sample_app();
        update(&mut app, Action::ShowSection(crate::core::post::PostKind::Review));
        update(&mut app, Action::ShowPost("r1".to_string()));
        let mut tui = TuiState::new();
        let (text, area) = draw(&app, &mut tui);
        assert!(text.contains("Back to reviews"));
        assert_eq!(
            hit_test(4, 1, area, &app, &tui),
            Gesture::Back {
                target: Some("reviews-view".to_string())
            }
        );
    }
}

//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core gestures.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event flow
//!
//! ```text
//! crossterm Event ─► TuiEvent ─┬─► Gesture ─► dispatch::classify ─► Action ─► update(App)
//!                              └─► FragmentViewState (selection, scrolling)
//! ```
//!
//! The posts document is fetched once on a background task; its result
//! arrives over an mpsc channel as `Action::PostsLoaded`.
//!
//! ## Redraw Strategy
//!
//! Frames are drawn only after an event or a background action arrives.
//! While posts are loading the loop wakes every ~100ms so the result shows
//! up promptly; once idle it sleeps up to 500ms between polls.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::api::{PostSource, build_source};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::{Gesture, classify};
use crate::core::render::Link;
use crate::core::state::App;
use crate::core::view::{Target, View};
use crate::tui::component::EventHandler;
use crate::tui::components::FragmentViewState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub body: FragmentViewState,
    /// `App::view_epoch` the body state was last reset for.
    pub seen_epoch: u64,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            body: FragmentViewState::new(),
            seen_epoch: 0,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Fetch the posts document in the background and report back as an action.
fn spawn_fetch(source: Box<dyn PostSource>, tx: mpsc::Sender<Action>) {
    info!("Fetching posts from {}", source.describe());
    tokio::spawn(async move {
        let result = source.fetch().await;
        match &result {
            Ok(_) => info!("Posts document fetched"),
            Err(e) => warn!("Failed to fetch posts: {}", e),
        }
        if tx.send(Action::PostsLoaded(result)).is_err() {
            warn!("Failed to send PostsLoaded: receiver dropped");
        }
    });
}

/// Forget per-view presentation state when the core switched views.
fn sync_view(app: &App, tui: &mut TuiState) {
    if app.view_epoch != tui.seen_epoch {
        tui.seen_epoch = app.view_epoch;
        tui.body.reset();
    }
    tui.body.offset = app.scroll_offset;
}

/// Gesture for the back key: the single-post view's back link, or the view
/// the post was opened from when the page has none (post not found).
fn back_gesture(app: &App) -> Gesture {
    if !app.is_visible(View::SinglePost) {
        return Gesture::Other;
    }
    let target = app
        .container(Target::SinglePost)
        .links()
        .into_iter()
        .find_map(|link| match link {
            Link::Back(target) => Some(target),
            Link::Post(_) => None,
        })
        .unwrap_or_else(|| app.previous_view.id().to_string());
    Gesture::Back {
        target: Some(target),
    }
}

/// Classify and apply a gesture. Returns true when the app should quit.
fn apply_gesture(app: &mut App, tui: &mut TuiState, gesture: Gesture) -> bool {
    let Some(action) = classify(gesture) else {
        return false;
    };
    debug!("Dispatching {:?}", action);
    let effect = update(app, action);
    sync_view(app, tui);
    effect == Effect::Quit
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel();

    let source_label = match build_source(&config) {
        Ok(source) => {
            let label = source.describe();
            spawn_fetch(source, tx.clone());
            label
        }
        Err(e) => {
            warn!("Invalid posts location '{}': {}", config.source, e);
            if tx.send(Action::PostsLoaded(Err(e))).is_err() {
                warn!("Failed to send PostsLoaded: receiver dropped");
            }
            config.source.clone()
        }
    };

    let mut app = App::from_config(&config, source_label);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            tui.body.offset = app.scroll_offset;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            // Rendering clamps the offset to the content height
            app.scroll_offset = tui.body.offset;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let gesture = match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => continue,
                TuiEvent::Quit => Gesture::Quit,
                TuiEvent::Nav(link) => Gesture::Nav(link.id().to_string()),
                TuiEvent::Back => back_gesture(&app),
                TuiEvent::MouseClick(col, row) => {
                    let frame_area = terminal.get_frame().area();
                    ui::hit_test(col, row, frame_area, &app, &tui)
                }
                TuiEvent::Activate => match tui.body.handle_event(&event) {
                    Some(link) => ui::link_gesture(&link),
                    None => continue,
                },
                TuiEvent::CursorUp
                | TuiEvent::CursorDown
                | TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.body.handle_event(&event);
                    app.scroll_offset = tui.body.offset;
                    continue;
                }
            };
            if apply_gesture(&mut app, &mut tui, gesture) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (the posts fetch)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            sync_view(&app, &mut tui);
            if effect == Effect::Quit {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!("Folio shutting down");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::post::PostKind;
    use crate::test_support::{loaded_app, raw_post};
    use serde_json::json;

    fn app() -> App {
        loaded_app(json!([
            raw_post("r1", "review", "2024-03-01"),
            raw_post("c1", "chapter", "2024-02-01"),
        ]))
    }

    #[test]
    fn test_back_gesture_outside_single_post_is_ignored() {
        assert_eq!(back_gesture(&app()), Gesture::Other);
    }

    #[test]
    fn test_back_gesture_uses_back_link_target() {
        let mut app = app();
        update(&mut app, Action::ShowSection(PostKind::Chapter));
        update(&mut app, Action::ShowPost("c1".to_string()));
        assert_eq!(
            back_gesture(&app),
            Gesture::Back {
                target: Some("chapters-view".to_string())
            }
        );
    }

    #[test]
    fn test_back_gesture_on_missing_post_returns_to_origin() {
        let mut app = app();
        update(&mut app, Action::ShowSection(PostKind::Review));
        update(&mut app, Action::ShowPost("missing".to_string()));
        assert_eq!(
            back_gesture(&app),
            Gesture::Back {
                target: Some("reviews-view".to_string())
            }
        );

        let mut tui = TuiState::new();
        let gesture = back_gesture(&app);
        apply_gesture(&mut app, &mut tui, gesture);
        assert!(app.is_visible(View::ReviewsList));
    }

    #[test]
    fn test_apply_gesture_resets_selection_on_view_change() {
        let mut app = app();
        let mut tui = TuiState::new();
        tui.seen_epoch = app.view_epoch;
        tui.body.selected = Some(0);

        let quit = apply_gesture(&mut app, &mut tui, Gesture::Nav("nav-reviews".to_string()));
        assert!(!quit);
        assert!(app.is_visible(View::ReviewsList));
        assert_eq!(tui.body.selected, None);
        assert_eq!(tui.seen_epoch, app.view_epoch);
    }

    #[test]
    fn test_apply_gesture_ignores_unclassified() {
        let mut app = app();
        let mut tui = TuiState::new();
        let epoch = app.view_epoch;
        assert!(!apply_gesture(&mut app, &mut tui, Gesture::Other));
        assert_eq!(app.view_epoch, epoch);
    }

    #[test]
    fn test_apply_gesture_quit() {
        let mut app = app();
        let mut tui = TuiState::new();
        assert!(apply_gesture(&mut app, &mut tui, Gesture::Quit));
    }
}

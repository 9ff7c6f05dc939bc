//! # Actions
//!
//! Everything that can happen in Folio becomes an `Action`.
//! User clicks "Reviews"? That's `Action::ShowSection(PostKind::Review)`.
//! The fetch finishes? That's `Action::PostsLoaded(result)`.
//!
//! The `update()` function takes the current state and an action, applies
//! the matching view-controller transition, and returns an `Effect` telling
//! the adapter whether anything beyond a redraw is needed.
//!
//! ```text
//! State + Action  →  update()  →  New State (+ Effect)
//! ```

use log::debug;
use serde_json::Value;

use crate::api::FetchError;
use crate::core::post::PostKind;
use crate::core::state::App;
use crate::core::view::View;

#[derive(Debug)]
pub enum Action {
    ShowHome,
    ShowSection(PostKind),
    ShowPost(String),
    /// Back affordance activated. `None` when it carried no target.
    GoBack(Option<String>),
    PostsLoaded(Result<Value, FetchError>),
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::ShowHome => app.show_home(),
        Action::ShowSection(kind) => app.show_section(kind),
        Action::ShowPost(id) => app.show_post(&id),
        Action::GoBack(target) => {
            let target = target.unwrap_or_else(|| View::Home.id().to_string());
            app.go_back_to(&target);
        }
        Action::PostsLoaded(result) => app.posts_loaded(result),
        Action::Quit => return Effect::Quit,
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::NavLink;
    use crate::test_support::{loaded_app, raw_post};
    use serde_json::json;

    fn app() -> App {
        loaded_app(json!([
            raw_post("a", "review", "2024-01-01"),
            raw_post("b", "chapter", "2024-06-01"),
        ]))
    }

    #[test]
    fn test_navigation_actions() {
        let mut app = app();
        assert_eq!(update(&mut app, Action::ShowSection(PostKind::Chapter)), Effect::None);
        assert_eq!(app.current_view, View::ChaptersList);
        assert_eq!(app.active_nav, Some(NavLink::Chapters));

        update(&mut app, Action::ShowPost("b".to_string()));
        assert_eq!(app.current_view, View::SinglePost);

        update(&mut app, Action::GoBack(Some("chapters-view".to_string())));
        assert_eq!(app.current_view, View::ChaptersList);

        update(&mut app, Action::ShowHome);
        assert_eq!(app.current_view, View::Home);
    }

    #[test]
    fn test_go_back_without_target_goes_home() {
        let mut app = app();
        update(&mut app, Action::ShowSection(PostKind::Review));
        update(&mut app, Action::ShowPost("a".to_string()));
        update(&mut app, Action::GoBack(None));
        assert_eq!(app.current_view, View::Home);
    }

    #[test]
    fn test_quit_returns_effect() {
        let mut app = app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
        assert_eq!(app.current_view, View::Home);
    }

    #[test]
    fn test_posts_loaded_action() {
        let mut app = App::default();
        update(
            &mut app,
            Action::PostsLoaded(Ok(json!([raw_post("z", "review", "2024-01-01")]))),
        );
        assert_eq!(app.store.len(), 1);
        assert!(!app.is_loading);
    }
}

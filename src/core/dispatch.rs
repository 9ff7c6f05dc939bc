//! # Input Dispatcher
//!
//! Classifies a user gesture into an [`Action`]. The adapter describes *what
//! was clicked* (a nav link by id, a post title with its attached id, a back
//! affordance with its attached target); this module owns the routing table.
//! Anything unrecognised classifies to `None` and is ignored.

use crate::core::action::Action;
use crate::core::post::PostKind;
use crate::core::view::NavLink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// A navigation affordance, identified by element id (`nav-home`, ...).
    Nav(String),
    /// A post title. `id` is the data attached to it.
    PostTitle { id: Option<String> },
    /// A back affordance. `target` is its recorded return view id.
    Back { target: Option<String> },
    Quit,
    /// A click that hit nothing interactive.
    Other,
}

pub fn classify(gesture: Gesture) -> Option<Action> {
    match gesture {
        Gesture::Nav(id) => match NavLink::from_id(&id)? {
            NavLink::Home => Some(Action::ShowHome),
            NavLink::Reviews => Some(Action::ShowSection(PostKind::Review)),
            NavLink::Chapters => Some(Action::ShowSection(PostKind::Chapter)),
        },
        Gesture::PostTitle { id } => id.filter(|id| !id.is_empty()).map(Action::ShowPost),
        Gesture::Back { target } => Some(Action::GoBack(target)),
        Gesture::Quit => Some(Action::Quit),
        Gesture::Other => None,
    }
}

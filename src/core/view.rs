//! # Views, nav links and render targets
//!
//! Names for the things the controller switches between. Each view and nav
//! link has a stable string id; the back affordance stores a view id as its
//! return target, so ids must round-trip through [`View::from_id`].

/// The four mutually exclusive display states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    ReviewsList,
    ChaptersList,
    SinglePost,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Home,
        View::ReviewsList,
        View::ChaptersList,
        View::SinglePost,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            View::Home => "home-view",
            View::ReviewsList => "reviews-view",
            View::ChaptersList => "chapters-view",
            View::SinglePost => "single-post-view",
        }
    }

    pub fn from_id(id: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.id() == id)
    }
}

/// Short display name of a view id: the segment before the first `-`.
///
/// `"home-view"` → `"home"`, `"reviews-view"` → `"reviews"`.
pub fn short_name(view_id: &str) -> &str {
    view_id.split('-').next().unwrap_or(view_id)
}

/// Top navigation affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavLink {
    Home,
    Reviews,
    Chapters,
}

impl NavLink {
    pub const ALL: [NavLink; 3] = [NavLink::Home, NavLink::Reviews, NavLink::Chapters];

    pub fn id(&self) -> &'static str {
        match self {
            NavLink::Home => "nav-home",
            NavLink::Reviews => "nav-reviews",
            NavLink::Chapters => "nav-chapters",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Home => "Home",
            NavLink::Reviews => "Reviews",
            NavLink::Chapters => "Chapters",
        }
    }

    pub fn from_id(id: &str) -> Option<NavLink> {
        NavLink::ALL.into_iter().find(|l| l.id() == id)
    }
}

/// Which nav link is marked active (and `aria-current`) for a view.
///
/// A single post highlights the section it was opened from. Opened from
/// Home, nothing is highlighted.
pub fn active_nav(current: View, previous: View) -> Option<NavLink> {
    match current {
        View::Home => Some(NavLink::Home),
        View::ReviewsList => Some(NavLink::Reviews),
        View::ChaptersList => Some(NavLink::Chapters),
        View::SinglePost => match previous {
            View::ReviewsList => Some(NavLink::Reviews),
            View::ChaptersList => Some(NavLink::Chapters),
            View::Home | View::SinglePost => None,
        },
    }
}

/// Named containers the renderer writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    RecentReviews,
    RecentChapters,
    AllReviews,
    AllChapters,
    SinglePost,
}

impl Target {
    /// The four list containers (everything except the single post).
    pub const LISTS: [Target; 4] = [
        Target::RecentReviews,
        Target::RecentChapters,
        Target::AllReviews,
        Target::AllChapters,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Target::RecentReviews => "reviews-list-home",
            Target::RecentChapters => "chapters-list-home",
            Target::AllReviews => "reviews-list-all",
            Target::AllChapters => "chapters-list-all",
            Target::SinglePost => "single-post-view",
        }
    }

    /// Section heading shown above the container, if any.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Target::RecentReviews => Some("Recent Reviews"),
            Target::RecentChapters => Some("Recent Chapters"),
            Target::AllReviews => Some("All Reviews"),
            Target::AllChapters => Some("All Chapters"),
            Target::SinglePost => None,
        }
    }
}

impl View {
    /// Containers shown inside this view, top to bottom.
    pub fn targets(&self) -> &'static [Target] {
        match self {
            View::Home => &[Target::RecentReviews, Target::RecentChapters],
            View::ReviewsList => &[Target::AllReviews],
            View::ChaptersList => &[Target::AllChapters],
            View::SinglePost => &[Target::SinglePost],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_ids_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_id(view.id()), Some(view));
        }
        assert_eq!(View::from_id("about-view"), None);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("home-view"), "home");
        assert_eq!(short_name("reviews-view"), "reviews");
        assert_eq!(short_name("single-post-view"), "single");
        assert_eq!(short_name("plain"), "plain");
        assert_eq!(short_name(""), "");
    }

    #[test]
    fn test_nav_link_ids() {
        assert_eq!(NavLink::from_id("nav-reviews"), Some(NavLink::Reviews));
        assert_eq!(NavLink::from_id("nav-about"), None);
    }

    #[test]
    fn test_list_views_highlight_themselves() {
        assert_eq!(active_nav(View::Home, View::ReviewsList), Some(NavLink::Home));
        assert_eq!(active_nav(View::ReviewsList, View::Home), Some(NavLink::Reviews));
        assert_eq!(active_nav(View::ChaptersList, View::Home), Some(NavLink::Chapters));
    }

    #[test]
    fn test_single_post_highlights_origin_section() {
        assert_eq!(
            active_nav(View::SinglePost, View::ReviewsList),
            Some(NavLink::Reviews)
        );
        assert_eq!(
            active_nav(View::SinglePost, View::ChaptersList),
            Some(NavLink::Chapters)
        );
        assert_eq!(active_nav(View::SinglePost, View::Home), None);
    }
}

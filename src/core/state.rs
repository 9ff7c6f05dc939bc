//! # Application State
//!
//! Core business state for Folio, and the view controller that moves it
//! between views. No TUI types here; the adapter reads this struct to decide
//! what to draw.
//!
//! ```text
//! App
//! ├── store: PostStore              // fetched posts, newest first
//! ├── current_view: View            // the one visible view
//! ├── previous_view: View           // where "back" goes; never SinglePost
//! ├── containers: Containers        // rendered fragments per target
//! ├── active_nav: Option<NavLink>   // highlighted nav link
//! ├── error: Option<String>         // error region text
//! ├── is_loading: bool              // loading indicators visible
//! ├── scroll_offset: u16            // content scroll, reset on every view change
//! ├── view_epoch: u64               // bumped on every view change
//! └── home_limit: usize             // posts per section on Home
//! ```
//!
//! Transitions happen through `update(state, action)` in action.rs, which
//! calls the `show_*` methods below.

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::FetchError;
use crate::core::config::{DEFAULT_HOME_LIMIT, ResolvedConfig};
use crate::core::post::PostKind;
use crate::core::render::{Fragment, render_list, render_single_post};
use crate::core::store::PostStore;
use crate::core::view::{NavLink, Target, View, active_nav};

/// Rendered output for each named target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Containers {
    recent_reviews: Fragment,
    recent_chapters: Fragment,
    all_reviews: Fragment,
    all_chapters: Fragment,
    single_post: Fragment,
}

impl Containers {
    pub fn get(&self, target: Target) -> &Fragment {
        match target {
            Target::RecentReviews => &self.recent_reviews,
            Target::RecentChapters => &self.recent_chapters,
            Target::AllReviews => &self.all_reviews,
            Target::AllChapters => &self.all_chapters,
            Target::SinglePost => &self.single_post,
        }
    }

    pub fn set(&mut self, target: Target, fragment: Fragment) {
        let slot = match target {
            Target::RecentReviews => &mut self.recent_reviews,
            Target::RecentChapters => &mut self.recent_chapters,
            Target::AllReviews => &mut self.all_reviews,
            Target::AllChapters => &mut self.all_chapters,
            Target::SinglePost => &mut self.single_post,
        };
        *slot = fragment;
    }
}

pub struct App {
    pub store: PostStore,
    pub current_view: View,
    pub previous_view: View,
    pub containers: Containers,
    pub active_nav: Option<NavLink>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub scroll_offset: u16,
    pub view_epoch: u64,
    pub home_limit: usize,
    /// Where the posts come from, for the footer.
    pub source_label: String,
}

impl App {
    pub fn new(home_limit: usize, source_label: String) -> Self {
        Self {
            store: PostStore::new(),
            current_view: View::Home,
            previous_view: View::Home,
            containers: Containers::default(),
            active_nav: Some(NavLink::Home),
            error: None,
            is_loading: true,
            scroll_offset: 0,
            view_epoch: 0,
            home_limit,
            source_label,
        }
    }

    pub fn from_config(config: &ResolvedConfig, source_label: String) -> Self {
        Self::new(config.home_limit, source_label)
    }

    pub fn is_visible(&self, view: View) -> bool {
        self.current_view == view
    }

    /// Fragment currently held by `target`.
    pub fn container(&self, target: Target) -> &Fragment {
        self.containers.get(target)
    }

    // ------------------------------------------------------------------
    // View controller
    // ------------------------------------------------------------------

    /// Recent reviews and chapters → Home.
    pub fn show_home(&mut self) {
        self.clear_error();
        let reviews = render_list(
            &self.store.recent(PostKind::Review, self.home_limit),
            "No reviews posted yet.",
        );
        let chapters = render_list(
            &self.store.recent(PostKind::Chapter, self.home_limit),
            "No chapters posted yet.",
        );
        self.containers.set(Target::RecentReviews, reviews);
        self.containers.set(Target::RecentChapters, chapters);
        self.enter(View::Home);
    }

    /// Every post of `kind` → ReviewsList / ChaptersList.
    ///
    /// Kinds without a list view are ignored.
    pub fn show_section(&mut self, kind: PostKind) {
        let (target, view, empty_message) = match kind {
            PostKind::Review => (Target::AllReviews, View::ReviewsList, "No reviews found."),
            PostKind::Chapter => (Target::AllChapters, View::ChaptersList, "No chapters found."),
            PostKind::Other => {
                debug!("No section view for kind '{}'", kind.as_str());
                return;
            }
        };
        self.clear_error();
        let fragment = render_list(&self.store.filter_by_type(kind), empty_message);
        self.containers.set(target, fragment);
        self.enter(view);
    }

    /// The post with `id` (or a not-found message) → SinglePost.
    pub fn show_post(&mut self, id: &str) {
        self.clear_error();
        if self.current_view != View::SinglePost {
            self.previous_view = self.current_view;
        }
        let post = self.store.find_by_id(id);
        if post.is_none() {
            info!("Post '{}' not found", id);
        }
        let fragment = render_single_post(post, self.previous_view.id());
        self.containers.set(Target::SinglePost, fragment);
        self.enter(View::SinglePost);
    }

    /// Return to the view that was active before the current post.
    pub fn go_back(&mut self) {
        let target = self.previous_view.id();
        self.go_back_to(target);
    }

    /// Return to the view named by `target_id`, re-rendering its lists.
    /// Unknown ids go Home.
    pub fn go_back_to(&mut self, target_id: &str) {
        match View::from_id(target_id) {
            Some(View::ReviewsList) => self.show_section(PostKind::Review),
            Some(View::ChaptersList) => self.show_section(PostKind::Chapter),
            Some(View::Home) => self.show_home(),
            _ => {
                debug!("Unknown back target '{}', going home", target_id);
                self.show_home();
            }
        }
    }

    /// Completion of the initial fetch. Either way the app ends up on Home
    /// with the loading indicators hidden.
    pub fn posts_loaded(&mut self, result: Result<Value, FetchError>) {
        let loaded = result.and_then(|raw| self.store.load(raw).map(|posts| posts.len()));
        match loaded {
            Ok(count) => {
                info!("Loaded {} posts", count);
                self.show_home();
            }
            Err(e) => self.fetch_failed(&e),
        }
        self.is_loading = false;
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        warn!("Could not fetch or process posts: {}", error);
        self.enter(View::Home);
        for target in Target::LISTS {
            self.containers.set(target, Fragment::empty());
        }
        self.error = Some(format!(
            "Error loading blog content: {error}. Please check the file path or network connection and try again later."
        ));
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    /// Reveal `view`, hiding every other one.
    fn enter(&mut self, view: View) {
        self.clear_error();
        self.current_view = view;
        self.active_nav = active_nav(self.current_view, self.previous_view);
        self.scroll_offset = 0;
        self.view_epoch = self.view_epoch.wrapping_add(1);
        debug!(
            "Entered {} (previous: {}, nav: {:?})",
            view.id(),
            self.previous_view.id(),
            self.active_nav
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_LIMIT, String::new())
    }
}

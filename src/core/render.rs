//! # Renderer
//!
//! Pure functions from posts to [`Fragment`]s. A fragment is plain data: the
//! TUI decides how it looks, the core only decides what it says and which
//! parts are clickable.

use crate::core::post::{Post, PostDate};
use crate::core::view::short_name;

pub const INVALID_DATE: &str = "Invalid Date";
pub const NOT_FOUND_MESSAGE: &str = "Sorry, the requested post could not be found.";

/// One displayable unit inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A post in a list: clickable title plus date and summary.
    Summary {
        id: String,
        title: String,
        date: String,
        summary: String,
    },
    /// A full post with its back affordance.
    Article {
        back: BackLink,
        title: String,
        date: String,
        content: String,
    },
    /// Plain text: empty-state and not-found messages.
    Message(String),
}

/// The "← Back to reviews" affordance. `target` is a view id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLink {
    pub target: String,
    pub label: String,
}

/// A clickable part of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Post(String),
    Back(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    blocks: Vec<Block>,
}

impl Fragment {
    /// An empty container (what a cleared target holds).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::Message(text.into())],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Clickable affordances in display order.
    pub fn links(&self) -> Vec<Link> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Summary { id, .. } => Some(Link::Post(id.clone())),
                Block::Article { back, .. } => Some(Link::Back(back.target.clone())),
                Block::Message(_) => None,
            })
            .collect()
    }
}

/// `"January 5, 2024"`, or [`INVALID_DATE`].
pub fn format_date(date: &PostDate) -> String {
    match date.value() {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

pub fn render_summary(post: &Post) -> Fragment {
    Fragment {
        blocks: vec![Block::Summary {
            id: post.id.clone(),
            title: post.title.clone(),
            date: format_date(&post.date),
            summary: post.summary.clone(),
        }],
    }
}

/// Summaries for every post, or a single empty-state message.
pub fn render_list(posts: &[&Post], empty_message: &str) -> Fragment {
    if posts.is_empty() {
        return Fragment::message(empty_message);
    }
    Fragment {
        blocks: posts
            .iter()
            .flat_map(|post| render_summary(post).blocks)
            .collect(),
    }
}

/// The full post with a back affordance to `return_target` (a view id), or
/// the not-found message.
pub fn render_single_post(post: Option<&Post>, return_target: &str) -> Fragment {
    let Some(post) = post else {
        return Fragment::message(NOT_FOUND_MESSAGE);
    };
    Fragment {
        blocks: vec![Block::Article {
            back: BackLink {
                target: return_target.to_string(),
                label: format!("← Back to {}", short_name(return_target)),
            },
            title: post.title.clone(),
            date: format!("Published on {}", format_date(&post.date)),
            content: post.content.clone(),
        }],
    }
}

//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use serde_json::{Value, json};

use crate::core::post::{Post, PostDate, PostKind};
use crate::core::state::App;

/// A raw JSON post record as it would appear in `posts.json`.
pub fn raw_post(id: &str, kind: &str, date: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Title {id}"),
        "date": date,
        "summary": format!("Summary of {id}"),
        "content": format!("Content of {id}"),
        "type": kind,
    })
}

/// A decoded post with the same field conventions as [`raw_post`].
pub fn post(id: &str, kind: PostKind, date: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Title {id}"),
        date: PostDate::parse(date),
        summary: format!("Summary of {id}"),
        content: format!("Content of {id}"),
        kind,
    }
}

/// An App whose initial fetch returned `raw`.
pub fn loaded_app(raw: Value) -> App {
    let mut app = App::default();
    app.posts_loaded(Ok(raw));
    app
}

//! # Post Store
//!
//! The in-memory copy of every fetched post, newest first.
//!
//! The store starts empty, is filled by `load()` once a fetch succeeds, and is
//! replaced wholesale if `load()` runs again. Individual posts are never
//! edited after loading.

use std::cmp::Ordering;

use log::{debug, warn};
use serde_json::Value;

use crate::api::FetchError;
use crate::core::post::{Post, PostKind};

#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `raw` as an array of post records, sort it, and replace the
    /// store's contents with it.
    ///
    /// On error the previous contents are left untouched.
    pub fn load(&mut self, raw: Value) -> Result<&[Post], FetchError> {
        let Value::Array(records) = raw else {
            return Err(FetchError::Decode(
                "expected an array of post records".to_string(),
            ));
        };

        let mut posts = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let post = Post::from_value(record).map_err(|e| {
                warn!("Rejecting posts document: record {index}: {e}");
                FetchError::Decode(format!("record {index}: {e}"))
            })?;
            posts.push(post);
        }

        sort_newest_first(&mut posts);
        debug!("Loaded {} posts", posts.len());
        self.posts = posts;
        Ok(&self.posts)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn filter_by_type(&self, kind: PostKind) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.kind == kind).collect()
    }

    pub fn recent(&self, kind: PostKind, limit: usize) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.kind == kind)
            .take(limit)
            .collect()
    }
}

/// Newest first; unparsable dates go last and keep their input order.
fn sort_newest_first(posts: &mut [Post]) {
    // `sort_by` is stable, so equal-ranked posts stay in input order.
    posts.sort_by(|a, b| match (a.date.value(), b.date.value()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::raw_post;
    use serde_json::json;

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_store_starts_empty() {
        let store = PostStore::new();
        assert!(store.is_empty());
        assert!(store.find_by_id("a").is_none());
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let mut store = PostStore::new();
        let sorted = store
            .load(json!([
                raw_post("old", "review", "2023-01-01"),
                raw_post("new", "review", "2024-06-01"),
                raw_post("mid", "chapter", "2024-01-01"),
            ]))
            .unwrap();
        assert_eq!(ids(sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_invalid_dates_sort_last_in_input_order() {
        let mut store = PostStore::new();
        store
            .load(json!([
                raw_post("bad1", "review", "not a date"),
                raw_post("good1", "review", "2022-01-01"),
                raw_post("bad2", "chapter", ""),
                raw_post("good2", "chapter", "2024-01-01"),
                raw_post("bad3", "review", "soon"),
            ]))
            .unwrap();
        assert_eq!(
            ids(store.posts()),
            vec!["good2", "good1", "bad1", "bad2", "bad3"]
        );
    }

    #[test]
    fn test_sorted_output_is_non_increasing() {
        let dates = [
            "2021-03-04",
            "2024-12-31",
            "junk",
            "2020-01-01T10:00:00Z",
            "2024-12-31",
            "2019-07-07",
        ];
        let raw: Vec<Value> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| raw_post(&i.to_string(), "review", d))
            .collect();
        let mut store = PostStore::new();
        let sorted = store.load(Value::Array(raw)).unwrap();

        let valid: Vec<_> = sorted.iter().filter_map(|p| p.date.value()).collect();
        assert!(valid.windows(2).all(|w| w[0] >= w[1]));
        let first_invalid = sorted.iter().position(|p| !p.date.is_valid()).unwrap();
        assert!(sorted[first_invalid..].iter().all(|p| !p.date.is_valid()));
        // Equal dates keep input order
        assert_eq!(ids(&sorted[..2]), vec!["1", "4"]);
    }

    #[test]
    fn test_load_rejects_non_array() {
        let mut store = PostStore::new();
        let err = store.load(json!({ "posts": [] })).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_non_object_record_and_keeps_old_contents() {
        let mut store = PostStore::new();
        store.load(json!([raw_post("a", "review", "2024-01-01")])).unwrap();
        let err = store
            .load(json!([raw_post("b", "review", "2024-01-01"), 7]))
            .unwrap_err();
        assert!(err.to_string().contains("record 1"));
        assert_eq!(ids(store.posts()), vec!["a"]);
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let mut store = PostStore::new();
        store.load(json!([raw_post("a", "review", "2024-01-01")])).unwrap();
        store.load(json!([raw_post("b", "chapter", "2024-01-01")])).unwrap();
        assert_eq!(ids(store.posts()), vec!["b"]);
        assert!(store.find_by_id("a").is_none());
    }

    #[test]
    fn test_filter_and_recent_preserve_store_order() {
        let mut store = PostStore::new();
        store
            .load(json!([
                raw_post("r1", "review", "2024-05-01"),
                raw_post("c1", "chapter", "2024-04-01"),
                raw_post("r2", "review", "2024-03-01"),
                raw_post("r3", "review", "2024-02-01"),
                raw_post("r4", "review", "2024-01-01"),
            ]))
            .unwrap();

        let reviews: Vec<&str> = store
            .filter_by_type(PostKind::Review)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(reviews, vec!["r1", "r2", "r3", "r4"]);

        let recent: Vec<&str> = store
            .recent(PostKind::Review, 3)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(recent, vec!["r1", "r2", "r3"]);

        // Fewer than the limit only when fewer exist
        assert_eq!(store.recent(PostKind::Chapter, 3).len(), 1);
        assert!(store.recent(PostKind::Other, 3).is_empty());
        assert!(store.recent(PostKind::Review, 0).is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let mut store = PostStore::new();
        store
            .load(json!([raw_post("a", "review", "2024-01-01"), { "id": 9 }]))
            .unwrap();
        assert_eq!(store.find_by_id("a").unwrap().kind, PostKind::Review);
        assert!(store.find_by_id("9").is_some());
        assert!(store.find_by_id("missing").is_none());
    }
}

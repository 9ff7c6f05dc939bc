//! # Posts
//!
//! A `Post` is one blog entry as it arrives in `posts.json`. Records are
//! decoded leniently: a missing or `null` field becomes an empty string, a
//! numeric id is kept as its decimal text, and an unknown `type` becomes
//! [`PostKind::Other`]. Nothing here rejects a record for being incomplete.
//!
//! Dates keep their raw text alongside the parsed value so the renderer can
//! fall back to "Invalid Date" without losing the original.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Category of a post. Only reviews and chapters get their own list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    Review,
    Chapter,
    /// Any other or missing `type` value. Never shown in a section.
    Other,
}

impl PostKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "review" => PostKind::Review,
            "chapter" => PostKind::Chapter,
            _ => PostKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Review => "review",
            PostKind::Chapter => "chapter",
            PostKind::Other => "other",
        }
    }
}

/// A calendar date that may not have parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDate {
    raw: String,
    parsed: Option<NaiveDateTime>,
}

/// Date-only layouts tried after the timestamp layouts, in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

impl PostDate {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: parse_date(raw.trim()),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed instant (UTC), or `None` when the text was unparsable.
    pub fn value(&self) -> Option<NaiveDateTime> {
        self.parsed
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

/// Dates without an offset are taken as UTC; dates with one are normalised to UTC.
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub date: PostDate,
    pub summary: String,
    /// Markdown, optionally mixed with inline HTML.
    pub content: String,
    pub kind: PostKind,
}

/// Wire shape of one record. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct PostRecord {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    title: String,
    #[serde(deserialize_with = "lenient_string")]
    date: String,
    #[serde(deserialize_with = "lenient_string")]
    summary: String,
    #[serde(deserialize_with = "lenient_string")]
    content: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    kind: String,
}

/// Accepts strings, numbers and booleans; anything else decodes as "".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

impl Post {
    /// Decode one record. Fails only when the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        // Derived struct visitors also accept sequences; a post must be an object.
        if !value.is_object() {
            return Err(de::Error::custom(format!(
                "expected a post object, found {}",
                json_type_name(&value)
            )));
        }
        let record: PostRecord = serde_json::from_value(value)?;
        Ok(Self {
            date: PostDate::parse(&record.date),
            kind: PostKind::from_tag(&record.kind),
            id: record.id,
            title: record.title,
            summary: record.summary,
            content: record.content,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

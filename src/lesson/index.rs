//! Index discovery.
//!
//! The top-level `/content/index.yaml` may list lessons directly
//! (`lessons: [{group, topic}]`), name groups (`groups: [..]`), or both. Each
//! named group has its own `/content/{group}/index.yaml` with
//! `topics: [..]` and/or `lessons: [{topic}]`.
//!
//! Parsing is lenient: only YAML syntax errors fail. Fields of the wrong
//! shape are ignored and malformed entries are skipped.

use super::model::{compare_meta, LessonMeta, CONTENT_ROOT};
use serde_yaml::Value;
use std::collections::HashSet;

pub const TOP_INDEX_PATH: &str = "/content/index.yaml";

/// What the top-level index document names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopIndex {
    pub lessons: Vec<LessonMeta>,
    pub groups: Vec<String>,
}

pub fn group_index_path(group: &str) -> String {
    format!("{CONTENT_ROOT}/{group}/index.yaml")
}

pub fn parse_top_index(text: &str) -> Result<TopIndex, serde_yaml::Error> {
    let doc = parse_document(text)?;

    let lessons = sequence(&doc, "lessons")
        .filter_map(|entry| {
            let group = scalar(entry.get("group")?)?;
            let topic = scalar(entry.get("topic")?)?;
            Some(LessonMeta { group, topic })
        })
        .collect();
    let groups = sequence(&doc, "groups").filter_map(scalar).collect();

    Ok(TopIndex { lessons, groups })
}

/// Lessons listed by a group's own index document.
pub fn parse_group_index(group: &str, text: &str) -> Result<Vec<LessonMeta>, serde_yaml::Error> {
    let doc = parse_document(text)?;

    let from_lessons = sequence(&doc, "lessons").filter_map(|entry| scalar(entry.get("topic")?));
    let from_topics = sequence(&doc, "topics").filter_map(scalar);

    Ok(from_lessons
        .chain(from_topics)
        .map(|topic| LessonMeta::new(group, topic))
        .collect())
}

/// De-duplicate by key (first occurrence wins) and sort by group, then topic.
pub fn merge_index(entries: impl IntoIterator<Item = LessonMeta>) -> Vec<LessonMeta> {
    let mut seen = HashSet::new();
    let mut merged: Vec<LessonMeta> = entries
        .into_iter()
        .filter(|meta| seen.insert(meta.key()))
        .collect();
    merged.sort_by(compare_meta);
    merged
}

fn parse_document(text: &str) -> Result<Value, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text)
}

fn sequence<'a>(doc: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> {
    doc.get(field)
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

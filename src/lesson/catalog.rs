use super::model::{collate, LessonMeta};
use std::collections::BTreeMap;

/// One branch of the lesson browser tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub group: String,
    pub topics: Vec<String>,
}

/// Group the index for browsing, keeping entries whose group or topic
/// contains `query` (case-insensitive). An empty query keeps everything.
pub fn group_catalog(index: &[LessonMeta], query: &str) -> Vec<CatalogGroup> {
    let query = query.trim().to_lowercase();

    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for meta in index {
        if !query.is_empty()
            && !meta.topic.to_lowercase().contains(&query)
            && !meta.group.to_lowercase().contains(&query)
        {
            continue;
        }
        groups
            .entry(meta.group.as_str())
            .or_default()
            .push(meta.topic.clone());
    }

    let mut catalog: Vec<CatalogGroup> = groups
        .into_iter()
        .map(|(group, mut topics)| {
            topics.sort_by(|a, b| collate(a, b));
            CatalogGroup {
                group: group.to_string(),
                topics,
            }
        })
        .collect();
    catalog.sort_by(|a, b| collate(&a.group, &b.group));
    catalog
}

//! Lesson catalog and content.
//!
//! Content is described by YAML documents under `/content`:
//!
//! ```text
//! /content/index.yaml                  lessons: [{group, topic}], groups: [..]
//! /content/{group}/index.yaml          topics: [..], lessons: [{topic}]
//! /content/{group}/{topic}/content.yaml
//! /content/{group}/{topic}/{general,practic}.{mp3,png}
//! ```
//!
//! [`LessonStore`] discovers the index and lazily fetches per-topic content
//! through a [`ContentSource`], caching it by `"{group}/{topic}"` key.

mod catalog;
mod index;
mod model;
mod source;
mod store;

pub use catalog::{group_catalog, CatalogGroup};
pub use index::{
    group_index_path, merge_index, parse_group_index, parse_top_index, TopIndex, TOP_INDEX_PATH,
};
pub use model::{
    collate, compare_meta, LessonAssets, LessonContent, LessonDocument, LessonMeta, LessonStatus,
    LessonsState, CONTENT_ROOT,
};
pub use source::{ContentSource, FsContentSource, HttpContentSource};
pub use store::LessonStore;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Root of all content paths.
pub const CONTENT_ROOT: &str = "/content";

/// Identifies a lesson by its group and topic folder names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonMeta {
    pub group: String,
    pub topic: String,
}

impl LessonMeta {
    pub fn new(group: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            topic: topic.into(),
        }
    }

    /// The composite `"{group}/{topic}"` key.
    ///
    /// Keys are persisted and used as cache keys, so the format is fixed.
    pub fn key(&self) -> String {
        format!("{}/{}", self.group, self.topic)
    }

    /// Split a key at its first `/`. The topic keeps any further slashes.
    pub fn from_key(key: &str) -> Option<Self> {
        let (group, topic) = key.split_once('/')?;
        if group.is_empty() || topic.is_empty() {
            return None;
        }
        Some(Self::new(group, topic))
    }
}

impl fmt::Display for LessonMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.topic)
    }
}

/// Case-insensitive ordering with a byte-order tie-break.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Index order: by group, then by topic.
pub fn compare_meta(a: &LessonMeta, b: &LessonMeta) -> Ordering {
    collate(&a.group, &b.group).then_with(|| collate(&a.topic, &b.topic))
}

/// Paths of a lesson's files, all under `/content/{group}/{topic}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonAssets {
    pub yaml_path: String,
    pub general_audio_path: String,
    pub general_img_path: String,
    pub practice_audio_path: String,
    pub practice_img_path: String,
}

impl LessonAssets {
    pub fn for_lesson(meta: &LessonMeta) -> Self {
        let base = format!("{CONTENT_ROOT}/{}/{}", meta.group, meta.topic);
        Self {
            yaml_path: format!("{base}/content.yaml"),
            general_audio_path: format!("{base}/general.mp3"),
            general_img_path: format!("{base}/general.png"),
            practice_audio_path: format!("{base}/practic.mp3"),
            practice_img_path: format!("{base}/practic.png"),
        }
    }
}

/// The per-topic `content.yaml` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonDocument {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub general_md_content: String,
    #[serde(default)]
    pub practic_md_content: String,
    #[serde(default)]
    pub general_img_promt: Option<String>,
    #[serde(default)]
    pub practic_img_promt: Option<String>,
}

/// A fully resolved lesson. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonContent {
    pub group: String,
    pub topic: String,
    pub general_audio_path: String,
    pub general_img_path: String,
    pub general_md_content: String,
    pub practice_audio_path: String,
    pub practice_img_path: String,
    pub practice_md_content: String,
    /// Prompts the images were generated from, when recorded.
    pub general_img_prompt: Option<String>,
    pub practice_img_prompt: Option<String>,
}

impl LessonContent {
    /// Merge a fetched document with the lesson's derived asset paths.
    pub fn resolve(meta: &LessonMeta, doc: LessonDocument) -> Self {
        let assets = LessonAssets::for_lesson(meta);
        Self {
            group: meta.group.clone(),
            topic: doc.topic.unwrap_or_else(|| meta.topic.clone()),
            general_audio_path: assets.general_audio_path,
            general_img_path: assets.general_img_path,
            general_md_content: doc.general_md_content,
            practice_audio_path: assets.practice_audio_path,
            practice_img_path: assets.practice_img_path,
            practice_md_content: doc.practic_md_content,
            general_img_prompt: doc.general_img_promt,
            practice_img_prompt: doc.practic_img_promt,
        }
    }
}

/// Everything the lesson store knows.
///
/// A key is in at most one of `loading_keys`, `lessons_by_key` and
/// `errors_by_key` at a time.
#[derive(Debug, Clone, Default)]
pub struct LessonsState {
    pub index: Vec<LessonMeta>,
    pub lessons_by_key: HashMap<String, Arc<LessonContent>>,
    pub errors_by_key: HashMap<String, String>,
    pub loading_keys: HashSet<String>,
}

impl LessonsState {
    pub fn status(&self, key: &str) -> LessonStatus {
        if let Some(content) = self.lessons_by_key.get(key) {
            LessonStatus::Ready(Arc::clone(content))
        } else if self.loading_keys.contains(key) {
            LessonStatus::Loading
        } else if let Some(message) = self.errors_by_key.get(key) {
            LessonStatus::Failed(message.clone())
        } else {
            LessonStatus::Idle
        }
    }
}

/// Per-key view of [`LessonsState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonStatus {
    Idle,
    Loading,
    Ready(Arc<LessonContent>),
    Failed(String),
}

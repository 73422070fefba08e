use super::index::{
    group_index_path, merge_index, parse_group_index, parse_top_index, TOP_INDEX_PATH,
};
use super::model::{
    LessonAssets, LessonContent, LessonDocument, LessonMeta, LessonStatus, LessonsState,
};
use super::source::ContentSource;
use crate::error::ContentError;
use crate::store::{Selector, Store, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Lesson catalog and per-topic content cache.
///
/// Cloning is cheap; clones share state, source and in-flight tracking.
///
/// Fetches run on their own tokio task. Dropping a caller's future stops it
/// from observing the result but never abandons a fetch half way, so the
/// loading markers are always cleared.
#[derive(Clone)]
pub struct LessonStore {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ContentSource>,
    state: Store<LessonsState>,
    index_loaded: AtomicBool,
    // Held by the task running an index load started by `ensure_index_loaded`.
    index_gate: Mutex<()>,
}

impl LessonStore {
    /// Create an empty store reading from `source`.
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Store::new(LessonsState::default()),
                index_loaded: AtomicBool::new(false),
                index_gate: Mutex::new(()),
            }),
        }
    }

    /// Register `listener` for every state change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LessonsState) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(listener)
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> Arc<LessonsState> {
        self.inner.state.get()
    }

    /// Whether an index load has completed, even one that found nothing.
    pub fn is_index_loaded(&self) -> bool {
        self.inner.index_loaded.load(Ordering::SeqCst)
    }

    /// Status of one lesson key right now.
    pub fn status(&self, key: &str) -> LessonStatus {
        self.inner.state.read(|state| state.status(key))
    }

    /// Track the status of one key as the store changes.
    pub fn watch_status(&self, key: impl Into<String>) -> Selector<LessonStatus> {
        let key = key.into();
        self.inner.state.select(move |state| state.status(&key))
    }

    /// Discover all lessons and replace the index.
    ///
    /// A missing or unparsable top-level document counts as empty; a failing
    /// group document skips that group only. Subscribers are notified even
    /// when the result is empty.
    pub async fn load_index_from_yaml(&self) -> Vec<LessonMeta> {
        let source = &self.inner.source;

        let top = match source.fetch_text(TOP_INDEX_PATH).await {
            Ok(text) => parse_top_index(&text).unwrap_or_else(|err| {
                warn!(path = TOP_INDEX_PATH, error = %err, "Ignoring unparsable index");
                Default::default()
            }),
            Err(err) => {
                warn!(error = %err, "Top-level index unavailable");
                Default::default()
            }
        };

        let mut entries = top.lessons;
        for group in &top.groups {
            let path = group_index_path(group);
            let parsed = match source.fetch_text(&path).await {
                Ok(text) => parse_group_index(group, &text).map_err(|source| ContentError::Parse {
                    path: path.clone(),
                    source,
                }),
                Err(err) => Err(err),
            };
            match parsed {
                Ok(metas) => entries.extend(metas),
                Err(err) => warn!(group = %group, error = %err, "Skipping group index"),
            }
        }

        let index = merge_index(entries);
        info!(lessons = index.len(), "Lesson index loaded");

        self.inner.state.update(|state| state.index = index.clone());
        self.inner.index_loaded.store(true, Ordering::SeqCst);
        index
    }

    /// Load the index at most once.
    ///
    /// Concurrent callers wait on the same load. A load that found nothing
    /// still counts as loaded; there is no automatic retry.
    pub async fn ensure_index_loaded(&self) -> Vec<LessonMeta> {
        if self.is_index_loaded() {
            return self.get_state().index.clone();
        }

        let this = self.clone();
        let task = tokio::spawn(async move {
            let _gate = this.inner.index_gate.lock().await;
            if this.is_index_loaded() {
                return this.get_state().index.clone();
            }
            this.load_index_from_yaml().await
        });

        match task.await {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "Lesson index load interrupted");
                self.get_state().index.clone()
            }
        }
    }

    /// Fetch and cache the content of one lesson.
    ///
    /// Returns the cached content right away when present. When a fetch for
    /// the same key is already running, returns `None` without starting
    /// another. Failures are recorded in `errors_by_key`.
    pub async fn ensure_loaded(&self, meta: &LessonMeta) -> Option<Arc<LessonContent>> {
        let key = meta.key();

        let mut cached = None;
        let started = self.inner.state.try_update(|state| {
            if let Some(content) = state.lessons_by_key.get(&key) {
                cached = Some(Arc::clone(content));
                return None;
            }
            if state.loading_keys.contains(&key) {
                return None;
            }
            let mut next = state.clone();
            next.errors_by_key.remove(&key);
            next.loading_keys.insert(key.clone());
            Some(next)
        });
        if !started {
            return cached;
        }

        debug!(key = %key, "Loading lesson");
        let this = self.clone();
        let task_meta = meta.clone();
        let task = tokio::spawn(async move {
            let result = this.fetch_lesson(&task_meta).await;
            this.finish_loading(&task_meta.key(), result);
        });
        if let Err(source) = task.await {
            self.finish_loading(
                &key,
                Err(ContentError::Interrupted {
                    key: key.clone(),
                    source,
                }),
            );
        }

        self.inner.state.read(|state| state.lessons_by_key.get(&key).cloned())
    }

    fn finish_loading(&self, key: &str, result: Result<LessonContent, ContentError>) {
        self.inner.state.update(|state| {
            state.loading_keys.remove(key);
            match result {
                Ok(content) => {
                    state.lessons_by_key.insert(key.to_string(), Arc::new(content));
                    state.errors_by_key.remove(key);
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "Failed to load lesson");
                    state.errors_by_key.insert(key.to_string(), err.to_string());
                }
            }
        });
    }

    async fn fetch_lesson(&self, meta: &LessonMeta) -> Result<LessonContent, ContentError> {
        let path = LessonAssets::for_lesson(meta).yaml_path;
        let text = self.inner.source.fetch_text(&path).await?;
        if text.trim().is_empty() {
            return Err(ContentError::EmptyDocument { path });
        }
        let doc: LessonDocument =
            serde_yaml::from_str(&text).map_err(|source| ContentError::Parse { path, source })?;
        Ok(LessonContent::resolve(meta, doc))
    }
}

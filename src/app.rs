use crate::config::Config;
use crate::feed::LearningQueue;
use crate::lesson::{ContentSource, LessonStore};
use crate::storage::{FileStorage, KeyValueStorage};
use crate::translate::TranslationHistory;
use crate::user::{HardLessons, UserStore};
use std::sync::Arc;
use tracing::info;

/// All application stores, constructed once and handed to whatever needs
/// them.
#[derive(Clone)]
pub struct AppContext {
    /// The configuration the context was built from, when built by
    /// [`AppContext::from_config`].
    pub config: Option<Config>,
    pub lessons: LessonStore,
    pub user: UserStore,
    pub hard: HardLessons,
    pub history: TranslationHistory,
}

impl AppContext {
    /// Wire the stores to an explicit content source and storage.
    pub fn new(source: Arc<dyn ContentSource>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            config: None,
            lessons: LessonStore::new(source),
            user: UserStore::new(Arc::clone(&storage)),
            hard: HardLessons::new(Arc::clone(&storage)),
            history: TranslationHistory::new(storage),
        }
    }

    /// Content from the configured location, learner records under
    /// `data_dir`.
    pub fn from_config(config: &Config) -> Self {
        info!(
            content = ?config.content,
            data_dir = %config.data_dir.display(),
            "Building application context"
        );
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self {
            config: Some(config.clone()),
            ..Self::new(config.content_source(), storage)
        }
    }

    pub fn learning_queue(&self) -> LearningQueue {
        LearningQueue::new(self.lessons.clone(), self.user.clone())
    }
}

//! # Jeels
//!
//! Client-side state for the Jeels Japanese course.
//!
//! Every piece of state lives in an observable [`Store`]: subscribers
//! register a listener, mutations swap the state snapshot wholesale, and
//! listeners run once the new snapshot is visible.
//!
//! ## Lessons
//!
//! [`LessonStore`] discovers the lesson index from YAML documents and lazily
//! fetches per-topic content, caching it by `"{group}/{topic}"` key:
//! - the index loads at most once, however many callers ask concurrently
//! - each key has at most one fetch in flight
//! - failures are recorded per key and never affect other keys
//!
//! ## Learner state
//!
//! [`UserStore`], [`HardLessons`] and [`TranslationHistory`] persist to a
//! [`KeyValueStorage`] after every mutation and fall back to defaults when
//! the stored record is missing or corrupt.
//!
//! [`AppContext`] wires all of them together.

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod lesson;
pub mod storage;
pub mod store;
pub mod translate;
pub mod user;

// Re-export main types for convenience
pub use app::AppContext;
pub use config::Config;
pub use error::{ConfigError, ContentError, StorageError, TranslateError};
pub use lesson::{ContentSource, LessonContent, LessonMeta, LessonStatus, LessonStore, LessonsState};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{Selector, Store, Subscription};
pub use translate::{TranslationHistory, Translator};
pub use user::{HardLessons, UserState, UserStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::new(0);
        assert_eq!(*store.get(), 0);
        store.set(42);
        assert_eq!(*store.get(), 42);
    }
}

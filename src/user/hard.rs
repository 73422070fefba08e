use crate::storage::{load_json, save_json, KeyValueStorage};
use crate::store::{Store, Subscription};
use std::sync::Arc;

pub const HARD_STORAGE_KEY: &str = "jeels.hard.v1";

/// Lessons the learner flagged as hard, persisted as a JSON array of keys.
#[derive(Clone)]
pub struct HardLessons {
    keys: Store<Vec<String>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl HardLessons {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let keys =
            load_json::<Vec<String>>(storage.as_ref(), HARD_STORAGE_KEY).unwrap_or_default();
        Self {
            keys: Store::new(keys),
            storage,
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<String>) + Send + Sync + 'static,
    {
        self.keys.subscribe(listener)
    }

    pub fn keys(&self) -> Arc<Vec<String>> {
        self.keys.get()
    }

    pub fn is_hard(&self, key: &str) -> bool {
        self.keys.read(|keys| keys.iter().any(|k| k == key))
    }

    /// Flip the flag for `key` and return its new value.
    pub fn toggle(&self, key: &str) -> bool {
        self.keys.try_update_with(
            |keys| {
                let mut next = keys.clone();
                if next.iter().any(|k| k == key) {
                    next.retain(|k| k != key);
                } else {
                    next.push(key.to_string());
                }
                Some(next)
            },
            |next| save_json(self.storage.as_ref(), HARD_STORAGE_KEY, next),
        );
        self.is_hard(key)
    }
}

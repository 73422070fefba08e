use crate::storage::{load_json, save_json, KeyValueStorage};
use crate::store::{Store, Subscription};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub const USER_STORAGE_KEY: &str = "jeels.currentUser.v1";

const DEFAULT_USER_ID: &str = "local";
const DEFAULT_USER_NAME: &str = "Local User";

/// The current learner.
///
/// `learning_lesson_keys` is ordered by when each lesson was added and never
/// holds the same key twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub id: String,
    pub name: String,
    pub learning_lesson_keys: Vec<String>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            id: DEFAULT_USER_ID.to_string(),
            name: DEFAULT_USER_NAME.to_string(),
            learning_lesson_keys: Vec::new(),
        }
    }
}

impl UserState {
    pub fn is_learning(&self, key: &str) -> bool {
        self.learning_lesson_keys.iter().any(|k| k == key)
    }

    /// Rebuild a user from a stored record.
    ///
    /// The record must carry a string `id`. Anything else that is malformed
    /// is coerced: a bad name becomes the default, a bad key list becomes
    /// empty, non-string keys and repeats are dropped.
    fn from_stored(value: &Value) -> Option<Self> {
        let id = value.get("id")?.as_str()?.to_string();
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_USER_NAME)
            .to_string();

        let mut seen = HashSet::new();
        let learning_lesson_keys: Vec<String> = value
            .get("learningLessonKeys")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .filter(|key| seen.insert(key.to_string()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id,
            name,
            learning_lesson_keys,
        })
    }
}

/// Persisted learner state.
#[derive(Clone)]
pub struct UserStore {
    state: Store<UserState>,
    storage: Arc<dyn KeyValueStorage>,
}

impl UserStore {
    /// Load the user from storage, or start from the default user.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = load_json::<Value>(storage.as_ref(), USER_STORAGE_KEY)
            .and_then(|value| UserState::from_stored(&value))
            .unwrap_or_default();
        debug!(
            user = %initial.id,
            learning = initial.learning_lesson_keys.len(),
            "User state loaded"
        );

        Self {
            state: Store::new(initial),
            storage,
        }
    }

    /// Register `listener` for every change to the user.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UserState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    /// Current user snapshot.
    pub fn get_state(&self) -> Arc<UserState> {
        self.state.get()
    }

    /// Replace the display name.
    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.mutate(|user| {
            Some(UserState {
                name,
                ..user.clone()
            })
        });
    }

    /// Append `key` to the learning list. No-op when already present.
    pub fn add_lesson(&self, key: &str) -> bool {
        self.mutate(|user| {
            if user.is_learning(key) {
                return None;
            }
            let mut next = user.clone();
            next.learning_lesson_keys.push(key.to_string());
            Some(next)
        })
    }

    /// Remove `key` from the learning list. No-op when absent.
    pub fn remove_lesson(&self, key: &str) -> bool {
        self.mutate(|user| {
            if !user.is_learning(key) {
                return None;
            }
            let mut next = user.clone();
            next.learning_lesson_keys.retain(|k| k != key);
            Some(next)
        })
    }

    // Persists before subscribers hear about the change.
    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&UserState) -> Option<UserState>,
    {
        self.state.try_update_with(f, |next| {
            save_json(self.storage.as_ref(), USER_STORAGE_KEY, next);
        })
    }
}

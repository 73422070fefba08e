//! Shared test fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use jeels::ContentError;
use jeels::ContentSource;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory content that counts fetches per path.
///
/// Every fetch yields once before answering so concurrent callers overlap.
/// Paths given a delay sleep instead.
#[derive(Default)]
pub struct MockSource {
    docs: Mutex<HashMap<String, String>>,
    fetches: Mutex<HashMap<String, usize>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, text: &str) -> Self {
        self.insert(path, text);
        self
    }

    pub fn with_delay(self, path: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
        self
    }

    pub fn insert(&self, path: &str, text: &str) {
        self.docs
            .lock()
            .unwrap()
            .insert(path.to_string(), text.to_string());
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_text(&self, path: &str) -> Result<String, ContentError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default() += 1;

        let delay = self.delays.lock().unwrap().get(path).copied();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.docs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::Status {
                url: path.to_string(),
                status: 404,
            })
    }
}

pub const LESSON_X: &str = "\
topic: x
general_md_content: |
  Line one.
  Line two.
practic_md_content: Practice it. Again!
general_img_promt: a cat waiting
";

pub const LESSON_Y: &str = "\
general_md_content: 待ちます。
practic_md_content: 探します。
";

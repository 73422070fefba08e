use super::lang::{detect_lang, LanguageCode};
use crate::error::TranslateError;
use crate::storage::{load_json, save_json, KeyValueStorage};
use crate::store::{Store, Subscription};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const HISTORY_STORAGE_KEY: &str = "jeels.translate.history.v1";

/// The translation model. It runs outside this crate.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> Result<String, TranslateError>;
}

/// One exchange in the translator conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTurn {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub source_text: String,
    pub source_lang: LanguageCode,
    pub target_text: String,
    pub target_lang: LanguageCode,
}

struct Translation {
    text: String,
    source: LanguageCode,
    target: LanguageCode,
}

async fn run_translation(
    translator: &dyn Translator,
    text: &str,
) -> Result<Translation, TranslateError> {
    let source = detect_lang(text);
    let target = source.target();
    debug!(source = source.code(), target = target.code(), "Translating");
    let text = translator.translate(text, source, target).await?;
    Ok(Translation {
        text,
        source,
        target,
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Persisted translator conversation.
#[derive(Clone)]
pub struct TranslationHistory {
    turns: Store<Vec<TranslateTurn>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl TranslationHistory {
    /// Load saved turns. Non-array records load as empty and entries that do
    /// not decode are dropped.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let turns = load_json::<Vec<Value>>(storage.as_ref(), HISTORY_STORAGE_KEY)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(turn) => Some(turn),
                Err(err) => {
                    warn!(error = %err, "Dropping unreadable translation turn");
                    None
                }
            })
            .collect();

        Self {
            turns: Store::new(turns),
            storage,
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<TranslateTurn>) + Send + Sync + 'static,
    {
        self.turns.subscribe(listener)
    }

    pub fn turns(&self) -> Arc<Vec<TranslateTurn>> {
        self.turns.get()
    }

    /// Translate `raw` and append the result as a new turn.
    ///
    /// Blank input is ignored and returns `Ok(None)`.
    pub async fn send(
        &self,
        translator: &dyn Translator,
        raw: &str,
    ) -> Result<Option<TranslateTurn>, TranslateError> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let translation = run_translation(translator, text).await?;
        let turn = TranslateTurn {
            id: format!("t-{}", uuid::Uuid::new_v4()),
            created_at: now_millis(),
            source_text: text.to_string(),
            source_lang: translation.source,
            target_text: translation.text,
            target_lang: translation.target,
        };

        let appended = turn.clone();
        self.mutate(move |turns| {
            let mut next = turns.clone();
            next.push(appended);
            Some(next)
        });
        Ok(Some(turn))
    }

    /// Re-translate an existing turn with new source text.
    ///
    /// Returns `Ok(false)` without changes for blank text or an unknown id.
    pub async fn edit(
        &self,
        translator: &dyn Translator,
        id: &str,
        new_source: &str,
    ) -> Result<bool, TranslateError> {
        let text = new_source.trim();
        if text.is_empty() || !self.turns.read(|turns| turns.iter().any(|t| t.id == id)) {
            return Ok(false);
        }

        let translation = run_translation(translator, text).await?;
        Ok(self.mutate(|turns| {
            let position = turns.iter().position(|t| t.id == id)?;
            let mut next = turns.clone();
            let turn = &mut next[position];
            turn.source_text = text.to_string();
            turn.source_lang = translation.source;
            turn.target_text = translation.text;
            turn.target_lang = translation.target;
            Some(next)
        }))
    }

    pub fn remove(&self, id: &str) -> bool {
        self.mutate(|turns| {
            if !turns.iter().any(|t| t.id == id) {
                return None;
            }
            Some(turns.iter().filter(|t| t.id != id).cloned().collect())
        })
    }

    pub fn clear(&self) -> bool {
        self.mutate(|turns| (!turns.is_empty()).then(Vec::new))
    }

    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&Vec<TranslateTurn>) -> Option<Vec<TranslateTurn>>,
    {
        self.turns.try_update_with(f, |next| {
            save_json(self.storage.as_ref(), HISTORY_STORAGE_KEY, next);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the input tagged with the target language.
    #[derive(Default)]
    struct EchoTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(
            &self,
            text: &str,
            _source: LanguageCode,
            target: LanguageCode,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}] {}", target.code(), text))
        }
    }

    struct BrokenTranslator;

    #[async_trait]
    impl Translator for BrokenTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: LanguageCode,
            _target: LanguageCode,
        ) -> Result<String, TranslateError> {
            Err(TranslateError::Model("weights missing".to_string()))
        }
    }

    #[tokio::test]
    async fn send_appends_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let history = TranslationHistory::new(storage.clone());
        let translator = EchoTranslator::default();

        let turn = history
            .send(&translator, "  こんにちは ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(turn.source_text, "こんにちは");
        assert_eq!(turn.source_lang, LanguageCode::Japanese);
        assert_eq!(turn.target_lang, LanguageCode::Russian);
        assert_eq!(turn.target_text, "[rus_Cyrl] こんにちは");

        let reopened = TranslationHistory::new(storage);
        assert_eq!(*reopened.turns(), vec![turn]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let history = TranslationHistory::new(Arc::new(MemoryStorage::new()));
        let translator = EchoTranslator::default();

        assert_eq!(history.send(&translator, "   ").await.unwrap(), None);
        assert!(history.turns().is_empty());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edit_retranslates_in_place() {
        let history = TranslationHistory::new(Arc::new(MemoryStorage::new()));
        let translator = EchoTranslator::default();
        let first = history.send(&translator, "Привет").await.unwrap().unwrap();
        let second = history.send(&translator, "Пока").await.unwrap().unwrap();

        assert!(history.edit(&translator, &first.id, "先生").await.unwrap());
        assert!(!history.edit(&translator, "missing", "x").await.unwrap());
        assert!(!history.edit(&translator, &first.id, " ").await.unwrap());

        let turns = history.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].id, first.id);
        assert_eq!(turns[0].source_text, "先生");
        assert_eq!(turns[0].source_lang, LanguageCode::Japanese);
        assert_eq!(turns[0].target_text, "[rus_Cyrl] 先生");
        assert_eq!(turns[1], second);
    }

    #[tokio::test]
    async fn failed_translation_leaves_history_alone() {
        let history = TranslationHistory::new(Arc::new(MemoryStorage::new()));

        let err = history.send(&BrokenTranslator, "Привет").await.unwrap_err();
        assert_eq!(err.to_string(), "Translation model failed: weights missing");
        assert!(history.turns().is_empty());
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let history = TranslationHistory::new(Arc::new(MemoryStorage::new()));
        let translator = EchoTranslator::default();
        let turn = history.send(&translator, "один").await.unwrap().unwrap();
        history.send(&translator, "два").await.unwrap();

        assert!(history.remove(&turn.id));
        assert!(!history.remove(&turn.id));
        assert_eq!(history.turns().len(), 1);

        assert!(history.clear());
        assert!(!history.clear());
    }

    #[test]
    fn tolerates_corrupt_records() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(HISTORY_STORAGE_KEY, "{\"not\": \"a list\"}").unwrap();
        assert!(TranslationHistory::new(storage.clone()).turns().is_empty());

        storage
            .set_item(
                HISTORY_STORAGE_KEY,
                r#"[null, {"id": "t-1", "createdAt": 1, "sourceText": "a",
                    "sourceLang": "rus_Cyrl", "targetText": "b", "targetLang": "jpn_Jpan"}]"#,
            )
            .unwrap();
        let turns = TranslationHistory::new(storage).turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].id, "t-1");
    }
}

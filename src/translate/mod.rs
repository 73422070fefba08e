//! Russian ⇄ Japanese translator support.
//!
//! The model itself sits behind the [`Translator`] trait. This module owns
//! language detection and the persisted conversation history.

mod history;
mod lang;

pub use history::{TranslateTurn, TranslationHistory, Translator, HISTORY_STORAGE_KEY};
pub use lang::{detect_lang, LanguageCode};

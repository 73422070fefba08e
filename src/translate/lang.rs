use serde::{Deserialize, Serialize};

/// Languages the translator works between, in the model's own codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "rus_Cyrl")]
    Russian,
    #[serde(rename = "jpn_Jpan")]
    Japanese,
}

impl LanguageCode {
    pub fn code(self) -> &'static str {
        match self {
            Self::Russian => "rus_Cyrl",
            Self::Japanese => "jpn_Jpan",
        }
    }

    /// The language a text in `self` gets translated into.
    pub fn target(self) -> Self {
        match self {
            Self::Russian => Self::Japanese,
            Self::Japanese => Self::Russian,
        }
    }
}

fn is_japanese(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30ff}' | '\u{3400}'..='\u{4dbf}' | '\u{4e00}'..='\u{9fff}')
}

/// Guess the language of `text`.
///
/// Any kana or kanji makes it Japanese, even mixed with Cyrillic. Everything
/// else, including text in neither script, is treated as Russian.
pub fn detect_lang(text: &str) -> LanguageCode {
    if text.chars().any(is_japanese) {
        LanguageCode::Japanese
    } else {
        LanguageCode::Russian
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_scripts() {
        assert_eq!(detect_lang("こんにちは"), LanguageCode::Japanese);
        assert_eq!(detect_lang("漢字"), LanguageCode::Japanese);
        assert_eq!(detect_lang("Привет"), LanguageCode::Russian);
        assert_eq!(detect_lang("Привет, 先生"), LanguageCode::Japanese);
        assert_eq!(detect_lang("hello"), LanguageCode::Russian);
        assert_eq!(detect_lang(""), LanguageCode::Russian);
    }

    #[test]
    fn targets_the_other_language() {
        assert_eq!(LanguageCode::Russian.target(), LanguageCode::Japanese);
        assert_eq!(LanguageCode::Japanese.target(), LanguageCode::Russian);
    }

    #[test]
    fn serializes_model_codes() {
        assert_eq!(
            serde_json::to_string(&LanguageCode::Japanese).unwrap(),
            "\"jpn_Jpan\""
        );
        assert_eq!(LanguageCode::Russian.code(), "rus_Cyrl");
    }
}

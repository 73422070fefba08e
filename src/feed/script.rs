use crate::lesson::LessonContent;

const SENTENCE_END: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Break lesson text into subtitle lines.
///
/// Multi-line text is split on line breaks. Single-line text is split on the
/// whitespace that follows sentence-ending punctuation; punctuation not
/// followed by whitespace does not split.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");

    let parts: Vec<&str> = if normalized.contains('\n') {
        normalized.split('\n').collect()
    } else {
        split_after_punctuation(&normalized)
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_after_punctuation(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() && prev.is_some_and(|p| SENTENCE_END.contains(&p)) {
            parts.push(&text[start..i]);
            start = i;
        }
        prev = Some(c);
    }
    parts.push(&text[start..]);
    parts
}

/// Subtitle lines for a lesson: the general part followed by the practice part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonScript {
    pub general: Vec<String>,
    pub practice: Vec<String>,
}

impl LessonScript {
    pub fn from_content(content: &LessonContent) -> Self {
        Self {
            general: split_into_sentences(&content.general_md_content),
            practice: split_into_sentences(&content.practice_md_content),
        }
    }

    pub fn len(&self) -> usize {
        self.general.len() + self.practice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All lines in display order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.general
            .iter()
            .chain(self.practice.iter())
            .map(String::as_str)
    }
}

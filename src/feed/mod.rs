//! The auto-playing lesson feed.
//!
//! Lesson text becomes subtitle lines ([`LessonScript`]), audio time maps to
//! the highlighted line ([`PlaybackSync`]), and [`LearningQueue`] decides
//! which lesson plays.

mod playback;
mod queue;
mod script;

pub use playback::{Part, PlaybackPosition, PlaybackSync};
pub use queue::{pick_current_lesson, LearningQueue};
pub use script::{split_into_sentences, LessonScript};

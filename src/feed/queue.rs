use crate::lesson::{LessonMeta, LessonStore, LessonsState};
use crate::user::{UserState, UserStore};

/// Pick the lesson the feed should show: the first one being learned, or
/// failing that the first lesson in the index.
pub fn pick_current_lesson(user: &UserState, lessons: &LessonsState) -> Option<LessonMeta> {
    match user.learning_lesson_keys.first() {
        Some(key) => LessonMeta::from_key(key),
        None => lessons.index.first().cloned(),
    }
}

/// The feed's view of the learning list.
#[derive(Clone)]
pub struct LearningQueue {
    lessons: LessonStore,
    user: UserStore,
}

impl LearningQueue {
    pub fn new(lessons: LessonStore, user: UserStore) -> Self {
        Self { lessons, user }
    }

    pub fn current(&self) -> Option<LessonMeta> {
        pick_current_lesson(&self.user.get_state(), &self.lessons.get_state())
    }

    /// Finish a lesson: drop it from the learning list and move on.
    pub fn mark_done(&self, meta: &LessonMeta) -> Option<LessonMeta> {
        self.user.remove_lesson(&meta.key());
        self.current()
    }

    /// Send a lesson to the back of the learning list. Lessons not being
    /// learned are left alone.
    pub fn skip(&self, meta: &LessonMeta) -> Option<LessonMeta> {
        let key = meta.key();
        if self.user.get_state().is_learning(&key) {
            self.user.remove_lesson(&key);
            self.user.add_lesson(&key);
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(keys: &[&str]) -> UserState {
        UserState {
            learning_lesson_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..UserState::default()
        }
    }

    #[test]
    fn prefers_learning_list_over_index() {
        let lessons = LessonsState {
            index: vec![LessonMeta::new("A", "x")],
            ..LessonsState::default()
        };

        assert_eq!(
            pick_current_lesson(&user_with(&["B/y/z"]), &lessons),
            Some(LessonMeta::new("B", "y/z"))
        );
        assert_eq!(
            pick_current_lesson(&user_with(&[]), &lessons),
            Some(LessonMeta::new("A", "x"))
        );
        assert_eq!(
            pick_current_lesson(&user_with(&[]), &LessonsState::default()),
            None
        );
    }

    #[test]
    fn malformed_first_key_yields_nothing() {
        let lessons = LessonsState {
            index: vec![LessonMeta::new("A", "x")],
            ..LessonsState::default()
        };
        assert_eq!(pick_current_lesson(&user_with(&["broken"]), &lessons), None);
    }
}

use super::script::LessonScript;

/// The two audio tracks of a lesson, played back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    General,
    Practice,
}

/// Where playback is, in subtitle terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPosition {
    pub part: Part,
    /// Index into [`LessonScript::lines`]. `None` when the playing part has no
    /// lines of its own and nothing before it.
    pub active_index: Option<usize>,
    /// Overall progress across both tracks, 0-100.
    pub progress: u8,
}

/// Maps audio time to the highlighted subtitle line.
///
/// Each track's lines are spread evenly over its duration.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackSync {
    general_lines: usize,
    practice_lines: usize,
    general_duration: f64,
    practice_duration: f64,
    part: Part,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl PlaybackSync {
    pub fn new(script: &LessonScript) -> Self {
        Self {
            general_lines: script.general.len(),
            practice_lines: script.practice.len(),
            general_duration: 0.0,
            practice_duration: 0.0,
            part: Part::General,
        }
    }

    pub fn part(&self) -> Part {
        self.part
    }

    /// Record a track's duration once its metadata is known.
    pub fn set_duration(&mut self, part: Part, seconds: f64) {
        let seconds = finite_or_zero(seconds);
        match part {
            Part::General => self.general_duration = seconds,
            Part::Practice => self.practice_duration = seconds,
        }
    }

    /// The general track finished; practice plays next.
    pub fn on_general_ended(&mut self) -> Part {
        self.part = Part::Practice;
        self.part
    }

    /// Handle a time update from `part`'s track.
    ///
    /// `element_duration` is used when no duration was recorded for the
    /// track. Returns `None` while the duration is unknown or the script is
    /// empty.
    pub fn on_time_update(
        &mut self,
        part: Part,
        current_time: f64,
        element_duration: f64,
    ) -> Option<PlaybackPosition> {
        let (known, lines, offset, before, after) = match part {
            Part::General => (
                self.general_duration,
                self.general_lines,
                0,
                0.0,
                self.practice_duration,
            ),
            Part::Practice => (
                self.practice_duration,
                self.practice_lines,
                self.general_lines,
                self.general_duration,
                0.0,
            ),
        };
        let duration = if known > 0.0 {
            known
        } else {
            finite_or_zero(element_duration)
        };
        if duration <= 0.0 || self.general_lines + self.practice_lines == 0 {
            return None;
        }

        let current = finite_or_zero(current_time);
        let ratio = (current / duration).clamp(0.0, 1.0);

        let active_index = if lines == 0 {
            offset.checked_sub(1)
        } else {
            let local = ((ratio * lines as f64).floor() as usize).min(lines - 1);
            Some(offset + local)
        };

        let total = before + duration + after;
        let percent = if total > 0.0 {
            ((before + current) / total * 100.0).round()
        } else {
            (ratio * 100.0).round()
        };

        self.part = part;
        Some(PlaybackPosition {
            part,
            active_index,
            progress: percent.clamp(0.0, 100.0) as u8,
        })
    }
}

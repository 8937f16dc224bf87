use crate::foundation::core::{FrameIndex, FrameInterval, ObjectId};

/// Per-object typewriter reveal, evaluated on every frame change.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypewriterState {
    pub target: ObjectId,
    full_text: String,
    window: FrameInterval,
    frames_per_char: i64,
    char_count: usize,
}

impl TypewriterState {
    /// `None` for empty text or a zero-length window; the object then keeps its full text.
    pub fn new(target: ObjectId, full_text: &str, window: FrameInterval) -> Option<Self> {
        let char_count = full_text.chars().count();
        let duration = window.len_frames();
        if char_count == 0 || duration <= 0 {
            return None;
        }
        let frames_per_char = (duration / char_count as i64).max(1);
        Some(Self {
            target,
            full_text: full_text.to_string(),
            window,
            frames_per_char,
            char_count,
        })
    }

    pub fn frames_per_char(&self) -> i64 {
        self.frames_per_char
    }

    pub fn window(&self) -> FrameInterval {
        self.window
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Number of characters shown at `frame`.
    pub fn visible_chars(&self, frame: FrameIndex) -> usize {
        if frame < self.window.start {
            0
        } else if frame <= self.window.end {
            let step = (frame.0 - self.window.start.0) / self.frames_per_char + 1;
            usize::try_from(step).map_or(self.char_count, |n| n.min(self.char_count))
        } else {
            self.char_count
        }
    }

    /// Text body to show at `frame`.
    pub fn visible_at(&self, frame: FrameIndex) -> &str {
        let n = self.visible_chars(frame);
        match self.full_text.char_indices().nth(n) {
            Some((byte, _)) => &self.full_text[..byte],
            None => &self.full_text,
        }
    }

    /// Past the window; the task can be dropped after applying this frame.
    pub fn is_finished(&self, frame: FrameIndex) -> bool {
        frame > self.window.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/typewriter.rs"]
mod tests;

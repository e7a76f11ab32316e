use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("animation must have at least one frame")]
    Empty,
}

/// A named frame sequence advanced by elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: &'static [&'static str],
    frame_interval_ms: f32,
    elapsed_ms: f32,
    steps: usize,
    looping: bool,
}

impl Animation {
    pub fn looping(
        frames: &'static [&'static str],
        frame_interval_ms: f32,
    ) -> Result<Self, AnimationError> {
        Self::build(frames, frame_interval_ms, true)
    }

    /// Plays through once and then holds the last frame.
    pub fn once(
        frames: &'static [&'static str],
        frame_interval_ms: f32,
    ) -> Result<Self, AnimationError> {
        Self::build(frames, frame_interval_ms, false)
    }

    fn build(
        frames: &'static [&'static str],
        frame_interval_ms: f32,
        looping: bool,
    ) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::Empty);
        }
        Ok(Self {
            frames,
            frame_interval_ms: frame_interval_ms.max(0.0),
            elapsed_ms: 0.0,
            steps: 0,
            looping,
        })
    }

    /// Returns true when the visible frame changed.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if !self.looping && self.is_after_last_frame() {
            return false;
        }
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
        if self.elapsed_ms < self.frame_interval_ms {
            return false;
        }
        self.elapsed_ms = 0.0;
        self.steps = self.steps.saturating_add(1);
        true
    }

    pub fn current_frame(&self) -> &'static str {
        self.frames[self.frame_index()]
    }

    pub fn frame_index(&self) -> usize {
        if self.looping {
            self.steps % self.frames.len()
        } else {
            self.steps.min(self.frames.len() - 1)
        }
    }

    /// True once a full pass over the frames has completed.
    pub fn is_after_last_frame(&self) -> bool {
        self.steps >= self.frames.len()
    }

    pub fn rewind(&mut self) {
        self.elapsed_ms = 0.0;
        self.steps = 0;
    }

    pub fn duration_ms(&self) -> f32 {
        self.frame_interval_ms * self.frames.len() as f32
    }
}

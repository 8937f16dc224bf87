use crate::foundation::error::{CaptionError, CaptionResult};

pub use kurbo::Vec2;

/// Signed frame index on the scene timeline.
///
/// Signed because visibility windows key the frame before a start frame, which is `-1` for
/// content starting at `0s`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub i64);

impl FrameIndex {
    pub fn offset(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

/// Opaque handle to an object allocated by the scene host.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integral frame rate of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameRate(u32);

impl FrameRate {
    pub fn new(fps: u32) -> CaptionResult<Self> {
        if fps == 0 {
            return Err(CaptionError::config("frame rate must be > 0"));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(24)
    }
}

/// A `[start, end]` span in seconds as authored in the manifests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeInterval {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TimeInterval {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            start_seconds,
            end_seconds,
        }
    }
}

// Manifests encode intervals as a two-element `[start, end]` array.
impl serde::Serialize for TimeInterval {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        (self.start_seconds, self.end_seconds).serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for TimeInterval {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let (start_seconds, end_seconds) = <(f64, f64)>::deserialize(d)?;
        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }
}

/// Inclusive frame span `[start, end]` derived from a [`TimeInterval`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameInterval {
    pub start: FrameIndex,
    pub end: FrameIndex, // inclusive
}

impl FrameInterval {
    pub fn new(start: FrameIndex, end: FrameIndex) -> Self {
        Self { start, end }
    }

    /// `end - start`, the window length used by the effect schedulers.
    pub fn len_frames(self) -> i64 {
        self.end.0 - self.start.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start <= f && f <= self.end
    }
}

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

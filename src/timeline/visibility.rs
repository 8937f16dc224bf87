use crate::{
    animation::keyframe::{Interpolation, KeyValue, KeyframeEvent, PropertyPath},
    foundation::core::{FrameIndex, FrameInterval, FrameRate, ObjectId, TimeInterval},
};

/// Seconds to frame index, truncating toward zero (never rounding).
pub fn to_frame(seconds: f64, frame_rate: FrameRate) -> FrameIndex {
    FrameIndex((seconds * frame_rate.as_f64()) as i64)
}

impl FrameInterval {
    pub fn from_interval(interval: TimeInterval, frame_rate: FrameRate) -> Self {
        Self::new(
            to_frame(interval.start_seconds, frame_rate),
            to_frame(interval.end_seconds, frame_rate),
        )
    }
}

/// Visibility flags keyed by every visibility window.
pub const VISIBILITY_PATHS: [PropertyPath; 2] = [PropertyPath::HideViewport, PropertyPath::HideRender];

/// Hard on/off cut for one visibility property: hidden at `start-1`, shown on `[start, end]`,
/// hidden again at `end+1`. All keys hold (constant interpolation).
pub fn visibility_window(
    target: ObjectId,
    property: PropertyPath,
    window: FrameInterval,
) -> [KeyframeEvent; 4] {
    let key = |frame: FrameIndex, hidden: f64| {
        KeyframeEvent::new(
            target,
            property,
            frame,
            KeyValue::Scalar(hidden),
            Interpolation::Constant,
        )
    };
    [
        key(window.start.offset(-1), 1.0),
        key(window.start, 0.0),
        key(window.end, 0.0),
        key(window.end.offset(1), 1.0),
    ]
}

/// Visibility windows for both the viewport and the render flag.
pub fn visibility_schedule(target: ObjectId, window: FrameInterval) -> Vec<KeyframeEvent> {
    VISIBILITY_PATHS
        .iter()
        .flat_map(|&p| visibility_window(target, p, window))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/visibility.rs"]
mod tests;

use crate::{
    animation::keyframe::{Interpolation, KeyValue, KeyframeEvent, PropertyPath},
    compositing::uv_fit::UvFitTransform,
    foundation::core::{FrameIndex, FrameInterval, ObjectId, Vec2},
    manifest::visual::ElementKind,
};

/// Horizontal pan distance of pan-and-zoom, in texture units.
pub const PAN_DISTANCE: f64 = 0.1;
/// Corner offset magnitude of the corner-to-corner pan.
pub const CORNER_OFFSET: f64 = 0.1;

fn key(target: ObjectId, property: PropertyPath, frame: FrameIndex, value: KeyValue) -> KeyframeEvent {
    KeyframeEvent::new(target, property, frame, value, Interpolation::Linear)
}

/// Mix factor from fully transparent at `start` to opaque `fade_frames` later.
pub fn fade_in(target: ObjectId, start: FrameIndex, fade_frames: i64) -> Vec<KeyframeEvent> {
    vec![
        key(target, PropertyPath::MixFactor, start, KeyValue::Scalar(1.0)),
        key(
            target,
            PropertyPath::MixFactor,
            start.offset(fade_frames),
            KeyValue::Scalar(0.0),
        ),
    ]
}

/// End-of-window pan offset and scale factor per element kind.
///
/// Background and overlay move in opposite directions for parallax; main planes hold still.
pub fn pan_and_zoom_target(kind: ElementKind) -> (Vec2, f64) {
    match kind {
        ElementKind::Background => (Vec2::new(PAN_DISTANCE, 0.0), 0.9),
        ElementKind::Overlay => (Vec2::new(-PAN_DISTANCE, 0.0), 1.1),
        ElementKind::Main => (Vec2::ZERO, 1.0),
    }
}

/// Offset and scale keys at both window ends, starting from the material's resting mapping.
pub fn pan_and_zoom(
    target: ObjectId,
    window: FrameInterval,
    kind: ElementKind,
    base: UvFitTransform,
) -> Vec<KeyframeEvent> {
    let (pan, zoom) = pan_and_zoom_target(kind);
    let start_offset = base.offset();
    let start_scale = base.scale();
    vec![
        key(target, PropertyPath::UvOffset, window.start, KeyValue::Vec2(start_offset)),
        key(target, PropertyPath::UvScale, window.start, KeyValue::Vec2(start_scale)),
        key(
            target,
            PropertyPath::UvOffset,
            window.end,
            KeyValue::Vec2(start_offset + pan),
        ),
        key(
            target,
            PropertyPath::UvScale,
            window.end,
            KeyValue::Vec2(start_scale * zoom),
        ),
    ]
}

/// Offset moves linearly from one corner to the opposite one across the window.
pub fn corner_to_corner_pan(
    target: ObjectId,
    window: FrameInterval,
    base: UvFitTransform,
) -> Vec<KeyframeEvent> {
    let corner = Vec2::new(CORNER_OFFSET, CORNER_OFFSET);
    vec![
        key(
            target,
            PropertyPath::UvOffset,
            window.start,
            KeyValue::Vec2(base.offset() - corner),
        ),
        key(
            target,
            PropertyPath::UvOffset,
            window.end,
            KeyValue::Vec2(base.offset() + corner),
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion.rs"]
mod tests;

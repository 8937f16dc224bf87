use super::*;

fn ev(property: PropertyPath, frame: i64, v: f64, interpolation: Interpolation) -> KeyframeEvent {
    KeyframeEvent::new(
        ObjectId(1),
        property,
        FrameIndex(frame),
        KeyValue::Scalar(v),
        interpolation,
    )
}

#[test]
fn insert_keeps_frames_sorted() {
    let mut s = KeyframeSchedule::new();
    s.insert(&ev(PropertyPath::MixFactor, 10, 0.0, Interpolation::Linear));
    s.insert(&ev(PropertyPath::MixFactor, 0, 1.0, Interpolation::Linear));
    s.insert(&ev(PropertyPath::MixFactor, 5, 0.5, Interpolation::Linear));
    let frames: Vec<i64> = s
        .keys(PropertyPath::MixFactor)
        .iter()
        .map(|k| k.frame.0)
        .collect();
    assert_eq!(frames, vec![0, 5, 10]);
}

#[test]
fn same_frame_is_last_writer_wins() {
    let mut s = KeyframeSchedule::new();
    assert!(!s.insert(&ev(PropertyPath::HideRender, 3, 1.0, Interpolation::Constant)));
    assert!(s.insert(&ev(PropertyPath::HideRender, 3, 0.0, Interpolation::Constant)));
    assert_eq!(s.keys(PropertyPath::HideRender).len(), 1);
    assert_eq!(
        s.sample(PropertyPath::HideRender, FrameIndex(3)),
        Some(KeyValue::Scalar(0.0))
    );
}

#[test]
fn constant_holds_and_linear_blends() {
    let mut s = KeyframeSchedule::new();
    s.insert(&ev(PropertyPath::HideViewport, 0, 1.0, Interpolation::Constant));
    s.insert(&ev(PropertyPath::HideViewport, 10, 0.0, Interpolation::Constant));
    s.insert(&ev(PropertyPath::MixFactor, 0, 1.0, Interpolation::Linear));
    s.insert(&ev(PropertyPath::MixFactor, 10, 0.0, Interpolation::Linear));

    assert_eq!(
        s.sample(PropertyPath::HideViewport, FrameIndex(9)),
        Some(KeyValue::Scalar(1.0))
    );
    assert_eq!(
        s.sample(PropertyPath::MixFactor, FrameIndex(5)),
        Some(KeyValue::Scalar(0.5))
    );
    assert_eq!(
        s.sample(PropertyPath::MixFactor, FrameIndex(-4)),
        Some(KeyValue::Scalar(1.0))
    );
    assert_eq!(
        s.sample(PropertyPath::MixFactor, FrameIndex(99)),
        Some(KeyValue::Scalar(0.0))
    );
    assert_eq!(s.sample(PropertyPath::UvScale, FrameIndex(0)), None);
}

#[test]
fn vec2_values_blend_componentwise() {
    let mut s = KeyframeSchedule::new();
    let mk = |frame, x, y| {
        KeyframeEvent::new(
            ObjectId(2),
            PropertyPath::UvOffset,
            FrameIndex(frame),
            KeyValue::Vec2(Vec2::new(x, y)),
            Interpolation::Linear,
        )
    };
    s.extend(&[mk(0, -0.1, -0.1), mk(20, 0.1, 0.1)]);
    let mid = s
        .sample(PropertyPath::UvOffset, FrameIndex(10))
        .and_then(KeyValue::as_vec2)
        .unwrap();
    assert!(mid.x.abs() < 1e-12 && mid.y.abs() < 1e-12);
    assert_eq!(s.key_count(), 2);
}

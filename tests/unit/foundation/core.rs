use super::*;

#[test]
fn frame_rate_rejects_zero() {
    assert!(FrameRate::new(0).is_err());
    assert_eq!(FrameRate::new(24).unwrap().get(), 24);
}

#[test]
fn frame_interval_contains_both_boundaries() {
    let w = FrameInterval::new(FrameIndex(2), FrameIndex(5));
    assert!(!w.contains(FrameIndex(1)));
    assert!(w.contains(FrameIndex(2)));
    assert!(w.contains(FrameIndex(5)));
    assert!(!w.contains(FrameIndex(6)));
    assert_eq!(w.len_frames(), 3);
}

#[test]
fn time_interval_serializes_as_pair() {
    let t = TimeInterval::new(1.5, 3.0);
    let s = serde_json::to_string(&t).unwrap();
    assert_eq!(s, "[1.5,3.0]");
    let de: TimeInterval = serde_json::from_str(&s).unwrap();
    assert_eq!(de, t);
}

#[test]
fn rgba_validity() {
    assert!(Rgba::WHITE.is_valid());
    assert!(!Rgba::new(1.2, 0.0, 0.0, 1.0).is_valid());
    assert!(!Rgba::new(f64::NAN, 0.0, 0.0, 1.0).is_valid());
}

use super::*;

fn fps(n: u32) -> FrameRate {
    FrameRate::new(n).unwrap()
}

#[test]
fn to_frame_truncates() {
    assert_eq!(to_frame(1.99, fps(24)), FrameIndex(47));
    assert_eq!(to_frame(2.0, fps(24)), FrameIndex(48));
    assert_eq!(to_frame(0.0, fps(30)), FrameIndex(0));
    assert_eq!(to_frame(0.041, fps(24)), FrameIndex(0));
}

#[test]
fn to_frame_is_monotonic() {
    for rate in [1u32, 24, 25, 30, 60] {
        let mut prev = to_frame(0.0, fps(rate));
        let mut s = 0.0;
        while s < 20.0 {
            s += 0.013;
            let f = to_frame(s, fps(rate));
            assert!(f >= prev, "rate {rate} s {s}");
            prev = f;
        }
    }
}

#[test]
fn window_emits_four_constant_keys() {
    let w = FrameInterval::new(FrameIndex(24), FrameIndex(72));
    let keys = visibility_window(ObjectId(3), PropertyPath::HideRender, w);
    let frames: Vec<i64> = keys.iter().map(|k| k.frame.0).collect();
    let values: Vec<f64> = keys.iter().filter_map(|k| k.value.as_scalar()).collect();
    assert_eq!(frames, vec![23, 24, 72, 73]);
    assert_eq!(values, vec![1.0, 0.0, 0.0, 1.0]);
    assert!(
        keys.iter()
            .all(|k| k.interpolation == Interpolation::Constant && k.target == ObjectId(3))
    );
}

#[test]
fn window_at_zero_keys_frame_minus_one() {
    let w = FrameInterval::from_interval(TimeInterval::new(0.0, 1.0), fps(24));
    let keys = visibility_window(ObjectId(0), PropertyPath::HideViewport, w);
    assert_eq!(keys[0].frame, FrameIndex(-1));
    assert_eq!(keys[3].frame, FrameIndex(25));
}

#[test]
fn schedule_covers_viewport_and_render() {
    let w = FrameInterval::new(FrameIndex(0), FrameIndex(10));
    let events = visibility_schedule(ObjectId(9), w);
    assert_eq!(events.len(), 8);
    assert_eq!(
        events
            .iter()
            .filter(|e| e.property == PropertyPath::HideViewport)
            .count(),
        4
    );
}

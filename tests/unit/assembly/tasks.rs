use super::*;
use crate::foundation::core::{FrameInterval, FrameRate, Vec2};
use crate::host::recording::{PlannedShape, RecordingHost};

fn body(host: &RecordingHost, id: ObjectId) -> String {
    match &host.plan().object(id).unwrap().shape {
        PlannedShape::Text { body, .. } => body.clone(),
        PlannedShape::Plane { .. } => panic!("text expected"),
    }
}

fn setup() -> (RecordingHost, FrameTaskRegistry, ObjectId, ObjectId) {
    let mut host = RecordingHost::new(".", FrameRate::default(), Vec2::new(1.0, 1.0));
    let a = host.create_text_object("TextObject_0", "ABCD", 1.0).unwrap();
    let b = host.create_text_object("TextObject_1", "xy", 1.0).unwrap();

    let mut reg = FrameTaskRegistry::new();
    let win = |s, e| FrameInterval::new(FrameIndex(s), FrameIndex(e));
    reg.register(TypewriterState::new(a, "ABCD", win(0, 40)).unwrap(), &mut host)
        .unwrap();
    reg.register(TypewriterState::new(b, "xy", win(10, 20)).unwrap(), &mut host)
        .unwrap();
    (host, reg, a, b)
}

#[test]
fn each_object_runs_independently() {
    let (mut host, mut reg, a, b) = setup();
    assert_eq!(host.plan().frame_callbacks, vec![a, b]);

    assert_eq!(reg.on_frame(FrameIndex(5), &mut host).unwrap(), 2);
    assert_eq!(body(&host, a), "A");
    assert_eq!(body(&host, b), "");

    reg.on_frame(FrameIndex(25), &mut host).unwrap();
    assert_eq!(body(&host, a), "ABC");
    assert_eq!(body(&host, b), "xy");
}

#[test]
fn tasks_deregister_after_their_window() {
    let (mut host, mut reg, a, b) = setup();
    reg.on_frame(FrameIndex(21), &mut host).unwrap();
    assert_eq!(reg.targets().collect::<Vec<_>>(), vec![a]);
    assert!(reg.get(b).is_none());
    assert_eq!(host.plan().frame_callbacks, vec![a]);

    reg.on_frame(FrameIndex(41), &mut host).unwrap();
    assert!(reg.is_empty());
    assert!(host.plan().frame_callbacks.is_empty());
    assert_eq!(body(&host, a), "ABCD");

    // Nothing left to drive; bodies keep their final state.
    assert_eq!(reg.on_frame(FrameIndex(0), &mut host).unwrap(), 0);
    assert_eq!(body(&host, a), "ABCD");
}

#[test]
fn re_registering_replaces_the_task() {
    let (mut host, mut reg, a, _) = setup();
    let longer = TypewriterState::new(
        a,
        "ABCD",
        FrameInterval::new(FrameIndex(0), FrameIndex(80)),
    )
    .unwrap();
    reg.register(longer, &mut host).unwrap();
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get(a).unwrap().frames_per_char(), 20);
}

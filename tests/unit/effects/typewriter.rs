use super::*;

fn state(text: &str, start: i64, end: i64) -> Option<TypewriterState> {
    TypewriterState::new(
        ObjectId(1),
        text,
        FrameInterval::new(FrameIndex(start), FrameIndex(end)),
    )
}

#[test]
fn reveals_one_char_per_step() {
    let tw = state("ABCD", 0, 40).unwrap();
    assert_eq!(tw.frames_per_char(), 10);
    assert_eq!(tw.visible_at(FrameIndex(-1)), "");
    assert_eq!(tw.visible_at(FrameIndex(0)), "A");
    assert_eq!(tw.visible_at(FrameIndex(9)), "A");
    assert_eq!(tw.visible_at(FrameIndex(10)), "AB");
    assert_eq!(tw.visible_at(FrameIndex(25)), "ABC");
    assert_eq!(tw.visible_at(FrameIndex(40)), "ABCD");
    assert_eq!(tw.visible_at(FrameIndex(41)), "ABCD");
}

#[test]
fn short_windows_clamp_to_one_frame_per_char() {
    let tw = state("abcdefgh", 100, 104).unwrap();
    assert_eq!(tw.frames_per_char(), 1);
    assert_eq!(tw.visible_at(FrameIndex(102)), "abc");
    assert_eq!(tw.visible_at(FrameIndex(104)), "abcde");
    assert_eq!(tw.visible_at(FrameIndex(105)), "abcdefgh");
}

#[test]
fn multibyte_text_is_cut_on_char_boundaries() {
    let tw = state("héllo", 0, 5).unwrap();
    assert_eq!(tw.visible_at(FrameIndex(1)), "hé");
    assert_eq!(tw.visible_at(FrameIndex(4)), "héllo");
}

#[test]
fn empty_text_or_zero_window_is_a_noop() {
    assert!(state("", 0, 40).is_none());
    assert!(state("ABCD", 12, 12).is_none());
}

#[test]
fn finishes_after_window_end() {
    let tw = state("ABCD", 0, 40).unwrap();
    assert!(!tw.is_finished(FrameIndex(40)));
    assert!(tw.is_finished(FrameIndex(41)));
}

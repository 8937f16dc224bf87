use super::*;

#[test]
fn entries_keep_raise_order_and_format() {
    let mut d = Diagnostics::new();
    assert!(d.is_empty());
    d.warn(Stage::Validate, "$.visual_elements[1]", "element skipped");
    d.warn(Stage::Effect, "TextObject_0: bold", format_args!("no {} font", "bold"));

    assert_eq!(d.len(), 2);
    assert_eq!(
        d.entries()[0].to_string(),
        "[validate] $.visual_elements[1]: element skipped"
    );
    assert_eq!(d.entries()[1].message, "no bold font");
    assert_eq!(d.in_stage(Stage::Effect).count(), 1);
}

#[test]
fn append_and_serialize_as_list() {
    let mut a = Diagnostics::new();
    a.warn(Stage::Parse, "t.json", "bad");
    let mut b = Diagnostics::new();
    b.warn(Stage::Finalize, "frame_range", "clamped");
    a.append(b);

    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[1]["stage"], "finalize");
}

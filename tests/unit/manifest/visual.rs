use super::*;
use serde_json::json;

fn validate(v: Value) -> (Vec<VisualElement>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let out = validate_visual_elements(&v, 100, &mut diags);
    (out, diags)
}

#[test]
fn invalid_type_is_skipped_and_others_kept() {
    let (els, diags) = validate(json!({
        "visual_elements": [
            { "file_path": "bg.png", "type": "background", "media": "image", "timestamp": [0, 5] },
            { "file_path": "side.png", "type": "sidebar", "media": "image", "timestamp": [0, 5] },
            { "file_path": "fx.mp4", "type": "overlay", "media": "video", "timestamp": [1, 4], "effects": ["zoom_in"] }
        ]
    }));
    assert_eq!(els.len(), 2);
    assert_eq!(els[0].file_path, "bg.png");
    assert_eq!(els[1].kind, ElementKind::Overlay);
    assert_eq!(els[1].effects, vec![EffectName::ZoomIn]);
    assert_eq!(diags.len(), 1);
    let d = &diags.entries()[0];
    assert_eq!(d.subject, "$.visual_elements[1]");
    assert!(d.message.contains("sidebar"));
}

#[test]
fn missing_keys_and_bad_media_are_skipped() {
    let (els, diags) = validate(json!({
        "visual_elements": [
            { "type": "background", "media": "image", "timestamp": [0, 5] },
            { "file_path": "a.gif", "type": "main", "media": "gif", "timestamp": [0, 5] },
            { "file_path": "a.png", "type": "main", "media": "image", "timestamp": [5] },
            { "file_path": "a.png", "type": "main", "media": "image", "timestamp": [5, 2] },
            "not an object"
        ]
    }));
    assert!(els.is_empty());
    assert_eq!(diags.len(), 5);
    assert!(diags.entries()[0].message.contains("file_path"));
}

#[test]
fn effects_default_to_empty_and_unknown_names_are_dropped() {
    let (els, diags) = validate(json!({
        "visual_elements": [
            { "file_path": "a.png", "type": "main", "media": "image", "timestamp": [0, 2] },
            { "file_path": "b.png", "type": "main", "media": "image", "timestamp": [0, 2],
              "effects": ["spin", "corner_to_corner_pan", 7] },
            { "file_path": "c.png", "type": "main", "media": "image", "timestamp": [0, 2],
              "effects": "pan_and_zoom" }
        ]
    }));
    assert_eq!(els.len(), 3);
    assert!(els[0].effects.is_empty());
    assert_eq!(els[1].effects, vec![EffectName::CornerToCornerPan]);
    assert!(els[2].effects.is_empty());
    assert_eq!(diags.len(), 3);
    assert_eq!(diags.entries()[0].subject, "$.visual_elements[1].effects[0]");
}

#[test]
fn missing_list_yields_nothing() {
    let (els, diags) = validate(json!({ "elements": [] }));
    assert!(els.is_empty());
    assert_eq!(diags.len(), 1);
}

#[test]
fn entry_bound_truncates_with_diagnostic() {
    let item = json!({ "file_path": "a.png", "type": "main", "media": "image", "timestamp": [0, 2] });
    let v = json!({ "visual_elements": [item.clone(), item.clone(), item] });
    let mut diags = Diagnostics::new();
    let els = validate_visual_elements(&v, 2, &mut diags);
    assert_eq!(els.len(), 2);
    assert_eq!(diags.len(), 1);
}

#[test]
fn reparse_of_serialized_manifest_is_identical() {
    let (els, _) = validate(json!({
        "visual_elements": [
            { "file_path": "bg.png", "type": "background", "media": "image", "timestamp": [0, 5.5],
              "effects": ["pan_and_zoom", "zoom_out"] },
            { "file_path": "k.mp4", "type": "main", "media": "video", "timestamp": [2, 9] }
        ]
    }));
    let manifest = VisualElementsManifest {
        visual_elements: els.clone(),
    };
    let text = serde_json::to_string_pretty(&manifest).unwrap();
    let mut diags = Diagnostics::new();
    let again = parse_visual_elements(&text, Path::new("roundtrip.json"), 100, &mut diags);
    assert_eq!(again, els);
    assert!(diags.is_empty());
}

#[test]
fn malformed_json_and_missing_file_degrade_to_empty() {
    let mut diags = Diagnostics::new();
    assert!(parse_visual_elements("{", Path::new("v.json"), 10, &mut diags).is_empty());
    assert!(
        load_visual_elements(Path::new("target/definitely/missing.json"), 10, &mut diags)
            .is_empty()
    );
    assert_eq!(diags.len(), 2);
    assert!(diags.entries().iter().all(|d| d.stage == Stage::Parse));
}

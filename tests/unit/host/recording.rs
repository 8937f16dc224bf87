use super::*;
use crate::animation::keyframe::{Interpolation, KeyValue, PropertyPath};
use crate::compositing::{material::MaterialSpec, uv_fit::UvFitTransform};
use crate::foundation::core::Rgba;

fn host() -> RecordingHost {
    RecordingHost::new(
        "target/unit_recording",
        FrameRate::default(),
        Vec2::new(2.8125, 5.0),
    )
}

#[test]
fn objects_get_sequential_ids_and_unique_names() {
    let mut h = host();
    let a = h.create_text_object("TextObject_0", "hi", 1.0).unwrap();
    let b = h.create_plane("Background_bg.png", -1, h.camera_view_bounds()).unwrap();
    assert_eq!((a, b), (ObjectId(0), ObjectId(1)));
    assert!(h.create_plane("Background_bg.png", -1, Vec2::new(1.0, 1.0)).is_err());
    assert_eq!(h.plan().object_named("Background_bg.png").unwrap().id, b);
}

#[test]
fn registered_media_bypasses_probe() {
    let mut h = host();
    h.register_media("clips/key.mp4", 1080, 1920);
    let img = h.load_image(Path::new("clips/key.mp4"), MediaKind::Video).unwrap();
    assert_eq!((img.width, img.height), (1080, 1920));
    assert_eq!(img.path, PathBuf::from("target/unit_recording/clips/key.mp4"));

    let err = h.load_image(Path::new("clips/missing.png"), MediaKind::Image).unwrap_err();
    assert!(matches!(err, CaptionError::AssetNotFound { .. }));
}

#[test]
fn material_keys_need_a_material() {
    let mut h = host();
    let t = h.create_text_object("TextObject_0", "hi", 1.0).unwrap();
    let ev = KeyframeEvent::new(
        t,
        PropertyPath::MixFactor,
        FrameIndex(3),
        KeyValue::Scalar(1.0),
        Interpolation::Linear,
    );
    assert!(h.insert_keyframe(&ev).is_err());

    h.set_material(t, MaterialSpec::fade_mix("Material_TextObject_0", Rgba::WHITE))
        .unwrap();
    h.insert_keyframe(&ev).unwrap();
    let obj = h.plan().object(t).unwrap();
    assert_eq!(obj.keyframes.keys(PropertyPath::MixFactor).len(), 1);
}

#[test]
fn text_measurement_scales_with_size_and_lines() {
    let mut h = host();
    let t = h.create_text_object("TextObject_0", "abcd\nab", 2.0).unwrap();
    assert_eq!(h.measure_text(t).unwrap(), Vec2::new(4.0, 4.0));

    let p = h.create_plane("Main_a.png", 0, Vec2::new(1.0, 1.0)).unwrap();
    assert!(h.measure_text(p).is_err());
    assert!(h.set_text_body(p, "x").is_err());
}

#[test]
fn fonts_must_exist_before_use() {
    let mut h = host();
    let t = h.create_text_object("TextObject_0", "hi", 1.0).unwrap();
    let err = h
        .register_font(FontRole::Bold, Path::new("target/unit_recording/none.ttf"))
        .unwrap_err();
    assert!(matches!(err, CaptionError::AssetNotFound { .. }));
    assert!(h.set_font(t, FontRole::Bold).is_err());

    let dir = Path::new("target/unit_recording_fonts");
    std::fs::create_dir_all(dir).unwrap();
    let font = dir.join("Bold.ttf");
    std::fs::write(&font, b"not really a font").unwrap();
    h.register_font(FontRole::Bold, &font).unwrap();
    h.set_font(t, FontRole::Bold).unwrap();
    let PlannedShape::Text { font, .. } = &h.plan().object(t).unwrap().shape else {
        panic!("text shape expected");
    };
    assert_eq!(*font, FontRole::Bold);
}

#[test]
fn plan_serializes_with_materials_and_range() {
    let mut h = host();
    let p = h.create_plane("Main_a.png", 0, Vec2::new(1.0, 1.0)).unwrap();
    let media = ImageRef {
        path: PathBuf::from("a.png"),
        media: MediaKind::Image,
        width: 4,
        height: 2,
    };
    h.set_material(p, MaterialSpec::textured("Main_a.png_Material", &media, UvFitTransform::IDENTITY))
        .unwrap();
    h.set_frame_range(FrameIndex(1), FrameIndex(48)).unwrap();
    assert!(h.set_frame_range(FrameIndex(10), FrameIndex(2)).is_err());
    h.register_frame_callback(p).unwrap();
    h.register_frame_callback(p).unwrap();
    h.unregister_frame_callback(ObjectId(99)).unwrap();

    let plan = h.into_plan();
    assert_eq!(plan.frame_callbacks, vec![p]);
    let json = plan.to_json_pretty().unwrap();
    let back: ScenePlan = serde_json::from_str(&json).unwrap();
    assert_eq!(back, plan);
}

use super::*;
use crate::foundation::core::FrameIndex;
use crate::foundation::math::Rng64;

fn ctx(subject: EffectSubject<'_>) -> EffectContext<'_> {
    EffectContext {
        target: ObjectId(5),
        window: FrameInterval::new(FrameIndex(0), FrameIndex(40)),
        frame_rate: FrameRate::default(),
        subject,
    }
}

fn plane(kind: ElementKind) -> EffectSubject<'static> {
    EffectSubject::Plane {
        kind,
        base: UvFitTransform::IDENTITY,
    }
}

#[test]
fn names_parse_leniently() {
    assert_eq!(EffectName::parse("fade_in").unwrap(), EffectName::FadeIn);
    assert_eq!(EffectName::parse(" Typewriter_Effect ").unwrap(), EffectName::Typewriter);
    assert_eq!(EffectName::parse("bold_effect").unwrap(), EffectName::Bold);
    for name in EffectName::ALL {
        assert_eq!(EffectName::parse(name.as_str()).unwrap(), name);
    }
    let err = EffectName::parse("spin").unwrap_err();
    assert!(matches!(err, CaptionError::UnknownEffect(ref n) if n == "spin"));
}

#[test]
fn serde_names_match_manifest_spelling() {
    let v = serde_json::to_value(EffectName::CornerToCornerPan).unwrap();
    assert_eq!(v, serde_json::json!("corner_to_corner_pan"));
}

#[test]
fn dispatch_routes_each_effect() {
    let params = EffectParams::default();
    let mut rng = Rng64::new(0);
    let text = EffectSubject::Text { body: "ABCD" };

    let plan = schedule_effect(&Effect::from_name(EffectName::FadeIn, &params), &ctx(text), &mut rng);
    let EffectPlan::FadeIn(keys) = plan else {
        panic!("fade_in must key the mix factor");
    };
    assert_eq!(keys[1].frame, FrameIndex(10));

    let plan = schedule_effect(&Effect::Bold, &ctx(text), &mut rng);
    assert_eq!(plan, EffectPlan::Font(FontRole::Bold));

    let plan = schedule_effect(&Effect::Typewriter, &ctx(text), &mut rng);
    let EffectPlan::Typewriter(tw) = plan else {
        panic!("typewriter must register a reveal");
    };
    assert_eq!(tw.frames_per_char(), 10);

    let plan = schedule_effect(
        &Effect::PanAndZoom,
        &ctx(plane(ElementKind::Background)),
        &mut rng,
    );
    assert!(matches!(plan, EffectPlan::Keyframes(ref k) if k.len() == 4));

    let plan = schedule_effect(
        &Effect::from_name(EffectName::ZoomOut, &params),
        &ctx(plane(ElementKind::Overlay)),
        &mut rng,
    );
    // 40 frames is far below one cycle: rest keys only.
    assert!(matches!(plan, EffectPlan::Keyframes(ref k) if k.len() == 4));
}

#[test]
fn empty_text_typewriter_is_noop() {
    let plan = schedule_effect(
        &Effect::Typewriter,
        &ctx(EffectSubject::Text { body: "" }),
        &mut Rng64::new(0),
    );
    assert_eq!(plan, EffectPlan::Noop);
}

#[test]
fn mismatched_targets_are_skipped() {
    let mut rng = Rng64::new(0);
    let plan = schedule_effect(
        &Effect::CornerToCornerPan,
        &ctx(EffectSubject::Text { body: "hi" }),
        &mut rng,
    );
    assert!(matches!(plan, EffectPlan::Skipped(_)));

    let plan = schedule_effect(&Effect::Bold, &ctx(plane(ElementKind::Main)), &mut rng);
    assert!(matches!(plan, EffectPlan::Skipped(ref m) if m.contains("bold")));
}

#[test]
fn effect_round_trips_its_name() {
    let params = EffectParams::default();
    for name in EffectName::ALL {
        assert_eq!(Effect::from_name(name, &params).name(), name);
    }
}

use crate::{
    animation::keyframe::KeyframeEvent,
    compositing::uv_fit::UvFitTransform,
    effects::{
        motion,
        pulse::{self, PulseParams, ZoomDirection},
        typewriter::TypewriterState,
    },
    foundation::core::{FrameInterval, FrameRate, ObjectId},
    foundation::error::{CaptionError, CaptionResult},
    foundation::math::RandomSource,
    host::scene_host::FontRole,
    manifest::visual::ElementKind,
};

/// Closed set of effect names accepted in manifests and configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectName {
    PanAndZoom,
    ZoomIn,
    ZoomOut,
    CornerToCornerPan,
    Bold,
    FadeIn,
    Typewriter,
}

impl EffectName {
    pub const ALL: [Self; 7] = [
        Self::PanAndZoom,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::CornerToCornerPan,
        Self::Bold,
        Self::FadeIn,
        Self::Typewriter,
    ];

    /// Parse a manifest or config name. Case-insensitive; the historic `_effect` suffix
    /// (`fade_in_effect`) is accepted.
    pub fn parse(s: &str) -> CaptionResult<Self> {
        let norm = s.trim().to_ascii_lowercase();
        let name = norm.strip_suffix("_effect").unwrap_or(&norm);
        match name {
            "pan_and_zoom" => Ok(Self::PanAndZoom),
            "zoom_in" => Ok(Self::ZoomIn),
            "zoom_out" => Ok(Self::ZoomOut),
            "corner_to_corner_pan" => Ok(Self::CornerToCornerPan),
            "bold" => Ok(Self::Bold),
            "fade_in" => Ok(Self::FadeIn),
            "typewriter" => Ok(Self::Typewriter),
            _ => Err(CaptionError::UnknownEffect(s.trim().to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PanAndZoom => "pan_and_zoom",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::CornerToCornerPan => "corner_to_corner_pan",
            Self::Bold => "bold",
            Self::FadeIn => "fade_in",
            Self::Typewriter => "typewriter",
        }
    }

    pub fn applies_to(self, target: TargetKind) -> bool {
        match self {
            Self::Bold | Self::FadeIn | Self::Typewriter => target == TargetKind::Text,
            Self::PanAndZoom | Self::ZoomIn | Self::ZoomOut | Self::CornerToCornerPan => {
                target == TargetKind::Plane
            }
        }
    }
}

impl std::fmt::Display for EffectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Text,
    Plane,
}

/// Tunables shared by every effect instance of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectParams {
    /// Length of the fade-in ramp in frames.
    pub fade_frames: i64,
    pub pulse: PulseParams,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            fade_frames: 10,
            pulse: PulseParams::default(),
        }
    }
}

/// An effect with its parameter payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    FadeIn { fade_frames: i64 },
    Typewriter,
    Bold,
    PanAndZoom,
    ZoomPulse {
        direction: ZoomDirection,
        params: PulseParams,
    },
    CornerToCornerPan,
}

impl Effect {
    pub fn from_name(name: EffectName, params: &EffectParams) -> Self {
        match name {
            EffectName::FadeIn => Self::FadeIn {
                fade_frames: params.fade_frames,
            },
            EffectName::Typewriter => Self::Typewriter,
            EffectName::Bold => Self::Bold,
            EffectName::PanAndZoom => Self::PanAndZoom,
            EffectName::ZoomIn => Self::ZoomPulse {
                direction: ZoomDirection::In,
                params: params.pulse,
            },
            EffectName::ZoomOut => Self::ZoomPulse {
                direction: ZoomDirection::Out,
                params: params.pulse,
            },
            EffectName::CornerToCornerPan => Self::CornerToCornerPan,
        }
    }

    pub fn name(&self) -> EffectName {
        match self {
            Self::FadeIn { .. } => EffectName::FadeIn,
            Self::Typewriter => EffectName::Typewriter,
            Self::Bold => EffectName::Bold,
            Self::PanAndZoom => EffectName::PanAndZoom,
            Self::ZoomPulse {
                direction: ZoomDirection::In,
                ..
            } => EffectName::ZoomIn,
            Self::ZoomPulse {
                direction: ZoomDirection::Out,
                ..
            } => EffectName::ZoomOut,
            Self::CornerToCornerPan => EffectName::CornerToCornerPan,
        }
    }
}

/// What an effect is applied to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectSubject<'a> {
    Text { body: &'a str },
    /// A media plane and the mapping its material rests at.
    Plane {
        kind: ElementKind,
        base: UvFitTransform,
    },
}

impl EffectSubject<'_> {
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Self::Text { .. } => TargetKind::Text,
            Self::Plane { .. } => TargetKind::Plane,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EffectContext<'a> {
    pub target: ObjectId,
    pub window: FrameInterval,
    pub frame_rate: FrameRate,
    pub subject: EffectSubject<'a>,
}

/// Instructions an effect hands back to the assembler.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectPlan {
    /// Keys on the object's current material.
    Keyframes(Vec<KeyframeEvent>),
    /// Keys on the mix factor; the object needs a fade-mix material first.
    FadeIn(Vec<KeyframeEvent>),
    Font(FontRole),
    /// A per-frame text reveal driven by the frame-task registry.
    Typewriter(TypewriterState),
    /// Nothing to do (empty text, zero-length window).
    Noop,
    /// Not applicable to this subject.
    Skipped(String),
}

/// Schedule one effect. Pure except for draws from `rng`.
pub fn schedule_effect(
    effect: &Effect,
    ctx: &EffectContext<'_>,
    rng: &mut dyn RandomSource,
) -> EffectPlan {
    let name = effect.name();
    if !name.applies_to(ctx.subject.target_kind()) {
        return EffectPlan::Skipped(format!(
            "'{name}' does not apply to {} objects",
            match ctx.subject.target_kind() {
                TargetKind::Text => "text",
                TargetKind::Plane => "plane",
            }
        ));
    }

    match (*effect, ctx.subject) {
        (Effect::FadeIn { fade_frames }, _) => {
            EffectPlan::FadeIn(motion::fade_in(ctx.target, ctx.window.start, fade_frames))
        }
        (Effect::Bold, _) => EffectPlan::Font(FontRole::Bold),
        (Effect::Typewriter, EffectSubject::Text { body }) => {
            match TypewriterState::new(ctx.target, body, ctx.window) {
                Some(state) => EffectPlan::Typewriter(state),
                None => EffectPlan::Noop,
            }
        }
        (Effect::PanAndZoom, EffectSubject::Plane { kind, base }) => {
            EffectPlan::Keyframes(motion::pan_and_zoom(ctx.target, ctx.window, kind, base))
        }
        (Effect::CornerToCornerPan, EffectSubject::Plane { base, .. }) => {
            EffectPlan::Keyframes(motion::corner_to_corner_pan(ctx.target, ctx.window, base))
        }
        (Effect::ZoomPulse { params, .. }, EffectSubject::Plane { base, .. }) => {
            let pulse =
                pulse::zoom_pulse(ctx.target, ctx.window, ctx.frame_rate, base, &params, rng);
            tracing::debug!(target_id = %ctx.target, cycles = pulse.cycles, "zoom pulse scheduled");
            EffectPlan::Keyframes(pulse.events)
        }
        (Effect::Typewriter, EffectSubject::Plane { .. })
        | (
            Effect::PanAndZoom | Effect::CornerToCornerPan | Effect::ZoomPulse { .. },
            EffectSubject::Text { .. },
        ) => EffectPlan::Skipped(format!("'{name}' does not apply to this object")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/kind.rs"]
mod tests;

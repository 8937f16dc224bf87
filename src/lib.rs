//! captionreel turns a timed transcript and a list of visual elements into a captioned,
//! vertical-format video scene.
//!
//! The crate does not render anything itself. It drives a [`SceneHost`] (the 3D runtime that
//! owns objects, materials and animation curves) through a small set of instructions.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: `transcript.json` and `visual_elements.json` become [`ContentChunk`] and
//!    [`VisualElement`] records. Transcript problems are fatal; element problems are
//!    collected as [`Diagnostics`] and the element is skipped.
//! 2. **Create**: one text object per chunk and one full-view plane per element, each with
//!    its own [`MaterialSpec`] and a hard visibility window.
//! 3. **Schedule**: effects are resolved through [`schedule_effect`] into keyframes, font
//!    switches or per-frame typewriter tasks ([`FrameTaskRegistry`]).
//! 4. **Finalize**: the host frame range is set to the latest end frame and render settings
//!    are handed over.
//!
//! [`RecordingHost`] is an in-memory host that records every instruction into a
//! serializable [`ScenePlan`]; the `captionreel` binary uses it to emit plans as JSON.
#![forbid(unsafe_code)]

pub mod animation;
pub mod assembly;
pub mod assets;
pub mod compositing;
pub mod effects;
pub mod foundation;
pub mod host;
pub mod manifest;
pub mod timeline;

pub use animation::keyframe::{
    Interpolation, Key, KeyValue, KeyframeEvent, KeyframeSchedule, PropertyPath,
};
pub use assembly::config::{AssemblyConfig, CameraSettings, Projection, RenderSettings};
pub use assembly::diagnostics::{Diagnostic, Diagnostics, Stage};
pub use assembly::orchestrator::{AssemblyReport, AssemblyStage, PlacedObject, SceneAssembler};
pub use assembly::tasks::FrameTaskRegistry;
pub use assets::media::{ImageRef, probe_media, resolve_media_path};
pub use compositing::material::{ChromaKey, MaterialSpec, MaterialVariant, chroma_key_fit};
pub use compositing::uv_fit::UvFitTransform;
pub use effects::kind::{
    Effect, EffectContext, EffectName, EffectParams, EffectPlan, EffectSubject, TargetKind,
    schedule_effect,
};
pub use effects::pulse::{PulseParams, PulseSchedule, ZoomDirection, zoom_pulse};
pub use effects::typewriter::TypewriterState;
pub use foundation::core::{
    FrameIndex, FrameInterval, FrameRate, ObjectId, Rgba, TimeInterval, Vec2,
};
pub use foundation::error::{CaptionError, CaptionResult};
pub use foundation::math::{RandomSource, Rng64};
pub use host::recording::{PlannedObject, PlannedShape, RecordingHost, ScenePlan};
pub use host::scene_host::{FontRole, SceneHost};
pub use manifest::transcript::{
    ContentChunk, TranscriptManifest, load_transcript, parse_transcript,
};
pub use manifest::visual::{
    ElementKind, MediaKind, VisualElement, VisualElementsManifest, load_visual_elements,
    parse_visual_elements,
};
pub use timeline::visibility::{to_frame, visibility_schedule, visibility_window};

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::Value;

use crate::{
    animation::keyframe::{KeyframeEvent, PropertyPath},
    assembly::{
        config::AssemblyConfig,
        diagnostics::{Diagnostics, Stage},
        tasks::FrameTaskRegistry,
    },
    compositing::{
        material::{MaterialSpec, MaterialVariant},
        uv_fit::UvFitTransform,
    },
    effects::kind::{
        Effect, EffectContext, EffectName, EffectParams, EffectPlan, EffectSubject, schedule_effect,
    },
    foundation::core::{FrameIndex, FrameInterval, ObjectId, Vec2},
    foundation::error::{CaptionError, CaptionResult},
    foundation::math::{Rng64, object_seed},
    host::scene_host::{FontRole, SceneHost},
    manifest::{
        transcript::{ContentChunk, load_transcript},
        visual::{
            ElementKind, MediaKind, VisualElement, read_visual_elements, validate_visual_elements,
        },
    },
    timeline::visibility::visibility_schedule,
};

/// Position of a run in the assembly state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyStage {
    ParseManifests,
    ValidateElements,
    CreateTextObjects,
    ScheduleTextEffects,
    CreateVisualElementObjects,
    ScheduleVisualEffects,
    Finalize,
    Done,
    /// The transcript produced no usable chunks; nothing was created.
    AbortedNoData,
}

/// A scene object created by the assembler.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub name: String,
    pub window: FrameInterval,
    /// Effects that were applied, in application order.
    pub effects: Vec<EffectName>,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct AssemblyReport {
    pub stage: AssemblyStage,
    pub text_objects: Vec<PlacedObject>,
    pub visual_objects: Vec<PlacedObject>,
    pub frame_end: FrameIndex,
    pub diagnostics: Diagnostics,
    /// Typewriter tasks still waiting for frame notifications.
    pub tasks: FrameTaskRegistry,
}

// Per-object state kept while its effects are applied.
struct Slot {
    placed: PlacedObject,
    material: Option<MaterialSpec>,
    subject: SlotSubject,
    /// Property -> effect that last keyed it.
    touched: BTreeMap<PropertyPath, EffectName>,
}

enum SlotSubject {
    Text { body: String },
    Plane { kind: ElementKind, effects: Vec<EffectName> },
}

enum ElementSource<'e> {
    /// Decoded manifest, validated in the `ValidateElements` stage.
    Manifest(Option<&'e Value>),
    Parsed(&'e [VisualElement]),
}

/// Drives one scene assembly against a [`SceneHost`].
pub struct SceneAssembler<'a> {
    config: &'a AssemblyConfig,
    stage: AssemblyStage,
    diags: Diagnostics,
    tasks: FrameTaskRegistry,
    fonts: BTreeSet<FontRole>,
    names: BTreeSet<String>,
}

impl<'a> SceneAssembler<'a> {
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self {
            config,
            stage: AssemblyStage::ParseManifests,
            diags: Diagnostics::new(),
            tasks: FrameTaskRegistry::new(),
            fonts: BTreeSet::new(),
            names: BTreeSet::new(),
        }
    }

    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diags
    }

    fn enter(&mut self, stage: AssemblyStage) {
        tracing::info!(?stage, "assembly stage");
        self.stage = stage;
    }

    /// Load both manifests from disk, then assemble.
    ///
    /// Any transcript failure aborts the run. The visual-elements manifest is optional and
    /// its problems only produce diagnostics.
    #[tracing::instrument(skip(self, host))]
    pub fn run(
        &mut self,
        transcript: &Path,
        visual_elements: Option<&Path>,
        host: &mut dyn SceneHost,
    ) -> CaptionResult<AssemblyReport> {
        self.enter(AssemblyStage::ParseManifests);
        let chunks = match load_transcript(transcript, self.config.max_manifest_entries) {
            Ok(chunks) => chunks,
            Err(e) => {
                self.enter(AssemblyStage::AbortedNoData);
                return Err(e);
            }
        };

        let raw = visual_elements.and_then(|path| read_visual_elements(path, &mut self.diags));

        self.build(&chunks, ElementSource::Manifest(raw.as_ref()), host)
    }

    /// Assemble already parsed records. An empty `chunks` aborts with
    /// [`CaptionError::NoTranscriptData`].
    #[tracing::instrument(skip_all, fields(chunks = chunks.len(), elements = elements.len()))]
    pub fn assemble(
        &mut self,
        chunks: &[ContentChunk],
        elements: &[VisualElement],
        host: &mut dyn SceneHost,
    ) -> CaptionResult<AssemblyReport> {
        self.build(chunks, ElementSource::Parsed(elements), host)
    }

    /// Only transcript and text-object failures are returned. A visual element or effect the
    /// host rejects is skipped with a diagnostic.
    fn build(
        &mut self,
        chunks: &[ContentChunk],
        source: ElementSource<'_>,
        host: &mut dyn SceneHost,
    ) -> CaptionResult<AssemblyReport> {
        if chunks.is_empty() {
            self.enter(AssemblyStage::AbortedNoData);
            return Err(CaptionError::NoTranscriptData);
        }

        self.enter(AssemblyStage::ValidateElements);
        let validated;
        let elements: &[VisualElement] = match source {
            ElementSource::Manifest(Some(root)) => {
                let max = self.config.max_manifest_entries;
                validated = validate_visual_elements(root, max, &mut self.diags);
                &validated
            }
            ElementSource::Manifest(None) => &[],
            ElementSource::Parsed(elements) => elements,
        };
        let text_effects = self.text_effect_names();

        self.enter(AssemblyStage::CreateTextObjects);
        self.register_fonts(host);
        let mut text_slots = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            text_slots.push(self.create_text_object(i, chunk, host)?);
        }

        self.enter(AssemblyStage::ScheduleTextEffects);
        for slot in &mut text_slots {
            self.apply_effects(slot, &text_effects, host);
        }

        self.enter(AssemblyStage::CreateVisualElementObjects);
        let mut plane_slots = Vec::with_capacity(elements.len());
        for el in elements {
            if let Some(slot) = self.create_visual_object(el, host) {
                plane_slots.push(slot);
            }
        }

        self.enter(AssemblyStage::ScheduleVisualEffects);
        for slot in &mut plane_slots {
            let effects = match &slot.subject {
                SlotSubject::Plane { effects, .. } => effects.clone(),
                SlotSubject::Text { .. } => Vec::new(),
            };
            let effects = self.bounded(&slot.placed.name, effects);
            self.apply_effects(slot, &effects, host);
        }

        self.enter(AssemblyStage::Finalize);
        let frame_end = text_slots
            .iter()
            .chain(&plane_slots)
            .map(|s| s.placed.window.end)
            .max()
            .unwrap_or(FrameIndex(1));
        let range_end = if frame_end < FrameIndex(1) {
            self.diags.warn(
                Stage::Finalize,
                "frame_range",
                format!("timeline ends at frame {}; clamped to 1", frame_end.0),
            );
            FrameIndex(1)
        } else {
            frame_end
        };
        host.set_frame_range(FrameIndex(1), range_end)?;
        host.configure_render(&self.config.render_settings())?;

        self.enter(AssemblyStage::Done);
        tracing::info!(
            text_objects = text_slots.len(),
            visual_objects = plane_slots.len(),
            frame_end = frame_end.0,
            diagnostics = self.diags.len(),
            "scene assembled"
        );

        Ok(AssemblyReport {
            stage: self.stage,
            text_objects: text_slots.into_iter().map(|s| s.placed).collect(),
            visual_objects: plane_slots.into_iter().map(|s| s.placed).collect(),
            frame_end,
            diagnostics: std::mem::take(&mut self.diags),
            tasks: std::mem::take(&mut self.tasks),
        })
    }

    fn text_effect_names(&mut self) -> Vec<EffectName> {
        let mut out = Vec::with_capacity(self.config.text_effects.len());
        for (i, raw) in self.config.text_effects.iter().enumerate() {
            match EffectName::parse(raw) {
                Ok(name) => out.push(name),
                Err(e) => self.diags.warn(
                    Stage::Config,
                    format!("text_effects[{i}]"),
                    format!("{e}; ignored"),
                ),
            }
        }
        self.bounded("text_effects", out)
    }

    fn bounded(&mut self, subject: &str, mut effects: Vec<EffectName>) -> Vec<EffectName> {
        let max = self.config.max_effects_per_object;
        if effects.len() > max {
            self.diags.warn(
                Stage::Effect,
                subject,
                format!(
                    "{} effects requested; only the first {max} are applied",
                    effects.len()
                ),
            );
            effects.truncate(max);
        }
        effects
    }

    fn register_fonts(&mut self, host: &mut dyn SceneHost) {
        let config = self.config;
        let fonts = [
            (FontRole::Default, &config.default_font),
            (FontRole::Bold, &config.bold_font),
        ];
        for (role, file) in fonts {
            let path = config.font_path(file);
            match host.register_font(role, &path) {
                Ok(()) => {
                    self.fonts.insert(role);
                }
                Err(e) => self.diags.warn(
                    Stage::Text,
                    format!("font {role:?}"),
                    format!("{e}; using the host's current font"),
                ),
            }
        }
    }

    fn unique_name(&mut self, base: String) -> String {
        if self.names.insert(base.clone()) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}.{n:03}");
            if self.names.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn create_text_object(
        &mut self,
        index: usize,
        chunk: &ContentChunk,
        host: &mut dyn SceneHost,
    ) -> CaptionResult<Slot> {
        let name = self.unique_name(format!("TextObject_{index}"));
        let window = FrameInterval::from_interval(chunk.interval, host.frame_rate());

        let id = host.create_text_object(&name, &chunk.text, self.config.text_size)?;
        if self.fonts.contains(&FontRole::Default) {
            host.set_font(id, FontRole::Default)?;
        }

        let material = MaterialSpec::emission(format!("Material_{name}"), self.config.text_color);
        host.set_material(id, material.clone())?;

        let scale = self.text_fit_scale(host.measure_text(id)?, &*host);
        host.set_scale(id, scale)?;

        for ev in visibility_schedule(id, window) {
            host.insert_keyframe(&ev)?;
        }
        tracing::debug!(%name, start = window.start.0, end = window.end.0, scale, "text object");

        Ok(Slot {
            placed: PlacedObject {
                id,
                name,
                window,
                effects: Vec::new(),
            },
            material: Some(material),
            subject: SlotSubject::Text {
                body: chunk.text.clone(),
            },
            touched: BTreeMap::new(),
        })
    }

    /// Uniform scale that fits the text into the camera view without upscaling.
    fn text_fit_scale(&self, size: Vec2, host: &dyn SceneHost) -> f64 {
        let view = host.camera_view_bounds();
        let ratio = |view: f64, extent: f64| if extent > 0.0 { view / extent } else { 1.0 };
        let fit = ratio(view.x, size.x).min(ratio(view.y, size.y)).min(1.0);
        fit * self.config.max_scale * self.config.scale_padding
    }

    fn create_visual_object(&mut self, el: &VisualElement, host: &mut dyn SceneHost) -> Option<Slot> {
        let base_name = Path::new(&el.file_path)
            .file_name()
            .map_or_else(|| el.file_path.clone(), |n| n.to_string_lossy().into_owned());
        let subject = format!("{}_{base_name}", el.kind.label());

        let image = match host.load_image(Path::new(&el.file_path), el.media) {
            Ok(image) => image,
            Err(e) => {
                self.diags
                    .warn(Stage::Visual, subject, format!("{e}; element skipped"));
                return None;
            }
        };

        let size = host.camera_view_bounds();
        let fit = match UvFitTransform::cover(
            f64::from(image.width),
            f64::from(image.height),
            size.x,
            size.y,
        ) {
            Ok(fit) => fit,
            Err(e) => {
                self.diags
                    .warn(Stage::Material, subject, format!("{e}; element skipped"));
                return None;
            }
        };

        let name = self.unique_name(subject);
        let material = match el.media {
            MediaKind::Video => MaterialSpec::chroma_key(
                format!("{name}_ChromaKey_Material"),
                &image,
                fit,
                self.config.chroma_key,
            ),
            MediaKind::Image => MaterialSpec::textured(format!("{name}_Material"), &image, fit),
        };

        let window = FrameInterval::from_interval(el.interval, host.frame_rate());
        let id = match place_plane(&name, el.kind.z_layer(), size, &material, window, host) {
            Ok(id) => id,
            Err(e) => {
                self.diags
                    .warn(Stage::Visual, name, format!("{e}; element skipped"));
                return None;
            }
        };
        tracing::debug!(%name, start = window.start.0, end = window.end.0, "visual element");

        Some(Slot {
            placed: PlacedObject {
                id,
                name,
                window,
                effects: Vec::new(),
            },
            material: Some(material),
            subject: SlotSubject::Plane {
                kind: el.kind,
                effects: el.effects.clone(),
            },
            touched: BTreeMap::new(),
        })
    }

    /// Apply `names` in order. An effect the host rejects is skipped with a diagnostic; keys it
    /// inserted before the rejection stay on the object.
    fn apply_effects(&mut self, slot: &mut Slot, names: &[EffectName], host: &mut dyn SceneHost) {
        if names.is_empty() {
            return;
        }
        let params: EffectParams = self.config.effect_params();
        let mut rng = Rng64::new(object_seed(self.config.seed, &slot.placed.name));

        for &name in names {
            let subject = match &slot.subject {
                SlotSubject::Text { body } => EffectSubject::Text {
                    body: body.as_str(),
                },
                SlotSubject::Plane { kind, .. } => {
                    let base = match slot.material.as_ref().map(MaterialSpec::mapping_base) {
                        Some(Ok(base)) => base,
                        Some(Err(e)) => {
                            self.diags.warn(
                                Stage::Effect,
                                format!("{}: {name}", slot.placed.name),
                                format!("{e}; effect skipped"),
                            );
                            continue;
                        }
                        None => UvFitTransform::IDENTITY,
                    };
                    EffectSubject::Plane { kind: *kind, base }
                }
            };
            let ctx = EffectContext {
                target: slot.placed.id,
                window: slot.placed.window,
                frame_rate: host.frame_rate(),
                subject,
            };
            let plan = schedule_effect(&Effect::from_name(name, &params), &ctx, &mut rng);

            match self.apply_plan(slot, name, plan, host) {
                Ok(true) => slot.placed.effects.push(name),
                Ok(false) => {}
                Err(e) => self.diags.warn(
                    Stage::Effect,
                    format!("{}: {name}", slot.placed.name),
                    format!("{e}; effect skipped"),
                ),
            }
        }
    }

    fn apply_plan(
        &mut self,
        slot: &mut Slot,
        name: EffectName,
        plan: EffectPlan,
        host: &mut dyn SceneHost,
    ) -> CaptionResult<bool> {
        let applied = match plan {
            EffectPlan::Keyframes(events) => {
                self.insert_effect_keys(slot, name, &events, host)?;
                true
            }
            EffectPlan::FadeIn(events) => {
                if slot.material.as_ref().map(|m| m.variant) != Some(MaterialVariant::FadeMix) {
                    let mix = MaterialSpec::fade_mix(
                        format!("Material_{}", slot.placed.name),
                        self.config.text_color,
                    );
                    host.set_material(slot.placed.id, mix.clone())?;
                    slot.material = Some(mix);
                }
                self.insert_effect_keys(slot, name, &events, host)?;
                true
            }
            EffectPlan::Font(role) => {
                if self.fonts.contains(&role) {
                    host.set_font(slot.placed.id, role)?;
                    true
                } else {
                    self.diags.warn(
                        Stage::Effect,
                        format!("{}: {name}", slot.placed.name),
                        format!("no {role:?} font registered; keeping the current font"),
                    );
                    false
                }
            }
            EffectPlan::Typewriter(state) => {
                self.tasks.register(state, host)?;
                true
            }
            EffectPlan::Noop => {
                tracing::debug!(
                    object = %slot.placed.name,
                    effect = %name,
                    "effect has nothing to do"
                );
                false
            }
            EffectPlan::Skipped(reason) => {
                self.diags.warn(
                    Stage::Effect,
                    format!("{}: {name}", slot.placed.name),
                    format!("{reason}; skipped"),
                );
                false
            }
        };
        Ok(applied)
    }

    fn insert_effect_keys(
        &mut self,
        slot: &mut Slot,
        name: EffectName,
        events: &[KeyframeEvent],
        host: &mut dyn SceneHost,
    ) -> CaptionResult<()> {
        let props: BTreeSet<PropertyPath> = events.iter().map(|e| e.property).collect();
        // Missing nodes are caught before the first key goes in.
        for node in props.iter().filter_map(|p| p.material_node()) {
            match &slot.material {
                Some(material) => {
                    material.node(node)?;
                }
                None => {
                    return Err(CaptionError::host(format!(
                        "'{}' has no material",
                        slot.placed.name
                    )));
                }
            }
        }
        for prop in props {
            if let Some(prev) = slot.touched.insert(prop, name) {
                self.diags.warn(
                    Stage::Effect,
                    format!("{}: {prop}", slot.placed.name),
                    format!("'{name}' keys this property after '{prev}'; later keys win"),
                );
            }
        }
        for ev in events {
            host.insert_keyframe(ev)?;
        }
        Ok(())
    }
}

fn place_plane(
    name: &str,
    z_layer: i32,
    size: Vec2,
    material: &MaterialSpec,
    window: FrameInterval,
    host: &mut dyn SceneHost,
) -> CaptionResult<ObjectId> {
    let id = host.create_plane(name, z_layer, size)?;
    host.set_material(id, material.clone())?;
    for ev in visibility_schedule(id, window) {
        host.insert_keyframe(&ev)?;
    }
    Ok(id)
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/orchestrator.rs"]
mod tests;

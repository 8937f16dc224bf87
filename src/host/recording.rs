use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    animation::keyframe::{KeyframeEvent, KeyframeSchedule},
    assembly::{config::RenderSettings, diagnostics::Diagnostics},
    assets::media::{ImageRef, probe_media, resolve_media_path},
    compositing::material::MaterialSpec,
    foundation::core::{FrameIndex, FrameRate, ObjectId, Vec2},
    foundation::error::{CaptionError, CaptionResult},
    host::scene_host::{FontRole, SceneHost},
    manifest::visual::MediaKind,
};

/// Approximate advance of one glyph relative to the text size.
const GLYPH_ADVANCE: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedShape {
    Text {
        /// Body as currently set (the typewriter rewrites it per frame).
        body: String,
        size: f64,
        font: FontRole,
    },
    Plane {
        z_layer: i32,
        size: Vec2,
    },
}

/// One object as the host would hold it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: PlannedShape,
    pub scale: f64,
    pub material: Option<MaterialSpec>,
    pub keyframes: KeyframeSchedule,
}

/// Everything recorded for a scene, serializable as the CLI's plan output.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenePlan {
    pub frame_rate: FrameRate,
    pub objects: Vec<PlannedObject>,
    pub fonts: BTreeMap<FontRole, PathBuf>,
    pub frame_range: Option<(FrameIndex, FrameIndex)>,
    pub frame_callbacks: Vec<ObjectId>,
    pub render: Option<RenderSettings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ScenePlan {
    pub fn object(&self, id: ObjectId) -> Option<&PlannedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_named(&self, name: &str) -> Option<&PlannedObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Attach run diagnostics to the plan output.
    pub fn attach_diagnostics(&mut self, diags: &Diagnostics) {
        self.diagnostics = diags.entries().iter().map(ToString::to_string).collect();
    }

    pub fn to_json_pretty(&self) -> CaptionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CaptionError::Other(anyhow::Error::new(e).context("serialize scene plan")))
    }
}

/// In-memory [`SceneHost`] that records every instruction into a [`ScenePlan`].
///
/// Media is probed from disk relative to `asset_root` unless a size was registered with
/// [`RecordingHost::register_media`].
#[derive(Debug)]
pub struct RecordingHost {
    asset_root: PathBuf,
    view: Vec2,
    current_frame: FrameIndex,
    media: BTreeMap<PathBuf, (u32, u32)>,
    plan: ScenePlan,
}

impl RecordingHost {
    pub fn new(asset_root: impl Into<PathBuf>, frame_rate: FrameRate, view: Vec2) -> Self {
        Self {
            asset_root: asset_root.into(),
            view,
            current_frame: FrameIndex(1),
            media: BTreeMap::new(),
            plan: ScenePlan {
                frame_rate,
                ..ScenePlan::default()
            },
        }
    }

    /// Known pixel size for `source`, bypassing the probe (and any file check).
    pub fn register_media(&mut self, source: impl AsRef<Path>, width: u32, height: u32) {
        let path = resolve_media_path(&self.asset_root, &source.as_ref().to_string_lossy());
        self.media.insert(path, (width, height));
    }

    pub fn set_current_frame(&mut self, frame: FrameIndex) {
        self.current_frame = frame;
    }

    pub fn plan(&self) -> &ScenePlan {
        &self.plan
    }

    pub fn into_plan(self) -> ScenePlan {
        self.plan
    }

    fn object_mut(&mut self, id: ObjectId) -> CaptionResult<&mut PlannedObject> {
        self.plan
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CaptionError::host(format!("unknown object {id}")))
    }

    fn text_mut(&mut self, id: ObjectId) -> CaptionResult<(&mut String, &mut FontRole)> {
        let obj = self.object_mut(id)?;
        match &mut obj.shape {
            PlannedShape::Text { body, font, .. } => Ok((body, font)),
            PlannedShape::Plane { .. } => Err(CaptionError::host(format!(
                "object '{}' is not a text object",
                obj.name
            ))),
        }
    }

    fn push_object(&mut self, name: &str, shape: PlannedShape) -> CaptionResult<ObjectId> {
        if self.plan.objects.iter().any(|o| o.name == name) {
            return Err(CaptionError::host(format!("object name '{name}' already in use")));
        }
        let id = ObjectId(self.plan.objects.len() as u64);
        self.plan.objects.push(PlannedObject {
            id,
            name: name.to_string(),
            shape,
            scale: 1.0,
            material: None,
            keyframes: KeyframeSchedule::new(),
        });
        Ok(id)
    }
}

impl SceneHost for RecordingHost {
    fn frame_rate(&self) -> FrameRate {
        self.plan.frame_rate
    }

    fn current_frame(&self) -> FrameIndex {
        self.current_frame
    }

    fn camera_view_bounds(&self) -> Vec2 {
        self.view
    }

    fn create_text_object(
        &mut self,
        name: &str,
        content: &str,
        size: f64,
    ) -> CaptionResult<ObjectId> {
        self.push_object(
            name,
            PlannedShape::Text {
                body: content.to_string(),
                size,
                font: FontRole::Default,
            },
        )
    }

    fn create_plane(&mut self, name: &str, z_layer: i32, size: Vec2) -> CaptionResult<ObjectId> {
        self.push_object(name, PlannedShape::Plane { z_layer, size })
    }

    fn load_image(&mut self, path: &Path, media: MediaKind) -> CaptionResult<ImageRef> {
        let resolved = resolve_media_path(&self.asset_root, &path.to_string_lossy());
        if let Some(&(width, height)) = self.media.get(&resolved) {
            return Ok(ImageRef {
                path: resolved,
                media,
                width,
                height,
            });
        }
        probe_media(&resolved, media)
    }

    fn set_material(&mut self, target: ObjectId, material: MaterialSpec) -> CaptionResult<()> {
        material.validate()?;
        self.object_mut(target)?.material = Some(material);
        Ok(())
    }

    fn insert_keyframe(&mut self, event: &KeyframeEvent) -> CaptionResult<()> {
        let obj = self.object_mut(event.target)?;
        if event.property.is_material_path() && obj.material.is_none() {
            return Err(CaptionError::host(format!(
                "'{}' keys '{}' but has no material",
                obj.name, event.property
            )));
        }
        obj.keyframes.insert(event);
        Ok(())
    }

    fn register_frame_callback(&mut self, target: ObjectId) -> CaptionResult<()> {
        self.object_mut(target)?;
        if !self.plan.frame_callbacks.contains(&target) {
            self.plan.frame_callbacks.push(target);
        }
        Ok(())
    }

    fn unregister_frame_callback(&mut self, target: ObjectId) -> CaptionResult<()> {
        self.plan.frame_callbacks.retain(|&id| id != target);
        Ok(())
    }

    fn register_font(&mut self, role: FontRole, path: &Path) -> CaptionResult<()> {
        if !path.is_file() {
            return Err(CaptionError::asset_not_found(path));
        }
        self.plan.fonts.insert(role, path.to_path_buf());
        Ok(())
    }

    fn set_font(&mut self, target: ObjectId, role: FontRole) -> CaptionResult<()> {
        if !self.plan.fonts.contains_key(&role) {
            return Err(CaptionError::host(format!("no font registered for {role:?}")));
        }
        *self.text_mut(target)?.1 = role;
        Ok(())
    }

    fn measure_text(&self, target: ObjectId) -> CaptionResult<Vec2> {
        let obj = self
            .plan
            .object(target)
            .ok_or_else(|| CaptionError::host(format!("unknown object {target}")))?;
        match &obj.shape {
            PlannedShape::Text { body, size, .. } => {
                let longest = body.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let lines = body.lines().count();
                Ok(Vec2::new(
                    longest as f64 * size * GLYPH_ADVANCE,
                    lines as f64 * size,
                ))
            }
            PlannedShape::Plane { .. } => Err(CaptionError::host(format!(
                "object '{}' is not a text object",
                obj.name
            ))),
        }
    }

    fn set_scale(&mut self, target: ObjectId, scale: f64) -> CaptionResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptionError::host(format!("invalid scale {scale}")));
        }
        self.object_mut(target)?.scale = scale;
        Ok(())
    }

    fn set_text_body(&mut self, target: ObjectId, body: &str) -> CaptionResult<()> {
        let (current, _) = self.text_mut(target)?;
        current.clear();
        current.push_str(body);
        Ok(())
    }

    fn set_frame_range(&mut self, start: FrameIndex, end: FrameIndex) -> CaptionResult<()> {
        if end < start {
            return Err(CaptionError::host(format!(
                "frame range end {} precedes start {}",
                end.0, start.0
            )));
        }
        self.plan.frame_range = Some((start, end));
        Ok(())
    }

    fn configure_render(&mut self, settings: &RenderSettings) -> CaptionResult<()> {
        self.plan.render = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/recording.rs"]
mod tests;

use std::path::Path;

use crate::{
    animation::keyframe::KeyframeEvent,
    assembly::config::RenderSettings,
    assets::media::ImageRef,
    compositing::material::MaterialSpec,
    foundation::core::{FrameIndex, FrameRate, ObjectId, Vec2},
    foundation::error::CaptionResult,
    manifest::visual::MediaKind,
};

/// Font slot a text object can be switched to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Default,
    Bold,
}

/// Capabilities the assembler needs from the 3D runtime that owns the scene.
///
/// Every call is an instruction; the host owns the created objects, materials and curves.
/// Implementations report rejected instructions as [`crate::CaptionError::Host`].
pub trait SceneHost {
    fn frame_rate(&self) -> FrameRate;

    fn current_frame(&self) -> FrameIndex;

    /// Visible world-space `(width, height)` of the scene camera at the content plane.
    fn camera_view_bounds(&self) -> Vec2;

    fn create_text_object(&mut self, name: &str, content: &str, size: f64)
    -> CaptionResult<ObjectId>;

    /// Full-bitmap plane of `size` at depth `z_layer`.
    fn create_plane(&mut self, name: &str, z_layer: i32, size: Vec2) -> CaptionResult<ObjectId>;

    fn load_image(&mut self, path: &Path, media: MediaKind) -> CaptionResult<ImageRef>;

    /// Replace the object's material.
    fn set_material(&mut self, target: ObjectId, material: MaterialSpec) -> CaptionResult<()>;

    fn insert_keyframe(&mut self, event: &KeyframeEvent) -> CaptionResult<()>;

    /// Ask to be notified on frame changes on behalf of `target`.
    fn register_frame_callback(&mut self, target: ObjectId) -> CaptionResult<()>;

    /// Stop notifying on behalf of `target`. Releasing an unknown target is a no-op.
    fn unregister_frame_callback(&mut self, target: ObjectId) -> CaptionResult<()>;

    fn register_font(&mut self, role: FontRole, path: &Path) -> CaptionResult<()>;

    fn set_font(&mut self, target: ObjectId, role: FontRole) -> CaptionResult<()>;

    /// World-space `(width, height)` of a text object at scale 1.
    fn measure_text(&self, target: ObjectId) -> CaptionResult<Vec2>;

    fn set_scale(&mut self, target: ObjectId, scale: f64) -> CaptionResult<()>;

    fn set_text_body(&mut self, target: ObjectId, body: &str) -> CaptionResult<()>;

    fn set_frame_range(&mut self, start: FrameIndex, end: FrameIndex) -> CaptionResult<()>;

    fn configure_render(&mut self, settings: &RenderSettings) -> CaptionResult<()>;
}

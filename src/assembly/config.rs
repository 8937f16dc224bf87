use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{
    compositing::material::ChromaKey,
    effects::{kind::EffectParams, pulse::PulseParams},
    foundation::core::{FrameRate, Rgba, Vec2},
    foundation::error::{CaptionError, CaptionResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Orthographic,
    Perspective,
}

/// Scene camera, placed on the view axis looking at the origin.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub projection: Projection,
    /// Distance from the camera to the text plane.
    pub distance: f64,
    pub focal_length_mm: f64,
    /// Visible height of an orthographic camera.
    pub ortho_scale: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            projection: Projection::Orthographic,
            distance: 10.0,
            focal_length_mm: 50.0,
            ortho_scale: 5.0,
        }
    }
}

impl CameraSettings {
    /// Sensor size along the fitted axis, in millimetres.
    pub const SENSOR_MM: f64 = 36.0;

    /// Visible `(width, height)` at the content plane for a `width × height` output.
    ///
    /// The camera fits its larger output dimension, so portrait output fits vertically.
    pub fn view_bounds(&self, resolution: [u32; 2]) -> Vec2 {
        let aspect = f64::from(resolution[0]) / f64::from(resolution[1]);
        let extent = match self.projection {
            Projection::Orthographic => self.ortho_scale,
            Projection::Perspective => self.distance * Self::SENSOR_MM / self.focal_length_mm,
        };
        if aspect >= 1.0 {
            Vec2::new(extent, extent / aspect)
        } else {
            Vec2::new(extent * aspect, extent)
        }
    }
}

/// Output encoding handed to the host's renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub output_path: PathBuf,
    pub resolution: [u32; 2],
    pub frame_rate: FrameRate,
    /// World background behind every layer.
    pub background_color: Rgba,
    pub container: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output/video.mp4"),
            resolution: [1080, 1920],
            frame_rate: FrameRate::default(),
            background_color: Rgba::BLACK,
            container: "mpeg4".to_string(),
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate_kbps: 192,
        }
    }
}

/// Run configuration. Every field has a default, so a partial JSON file is enough.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub frame_rate: FrameRate,
    /// Output `[width, height]` in pixels (portrait by default).
    pub resolution: [u32; 2],
    pub output_path: PathBuf,
    pub background_color: Rgba,
    pub text_color: Rgba,
    pub text_size: f64,
    pub font_dir: PathBuf,
    pub default_font: String,
    pub bold_font: String,
    pub camera: CameraSettings,
    /// Upper bound on the text fit scale.
    pub max_scale: f64,
    /// Fraction of the fitted size actually used.
    pub scale_padding: f64,
    /// Effects applied to every text object, in application order.
    pub text_effects: Vec<String>,
    pub chroma_key: ChromaKey,
    pub fade_frames: i64,
    /// Run seed for randomized schedules.
    pub seed: u64,
    pub pulse: PulseParams,
    pub max_effects_per_object: usize,
    pub max_manifest_entries: usize,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        let render = RenderSettings::default();
        Self {
            frame_rate: FrameRate::default(),
            resolution: render.resolution,
            output_path: render.output_path,
            background_color: render.background_color,
            text_color: Rgba::WHITE,
            text_size: 1.0,
            font_dir: PathBuf::from("assets/fonts"),
            default_font: "BebasNeue-Regular.ttf".to_string(),
            bold_font: "Roboto-Bold.ttf".to_string(),
            camera: CameraSettings::default(),
            max_scale: 1.0,
            scale_padding: 0.75,
            text_effects: vec![
                "bold".to_string(),
                "fade_in".to_string(),
                "typewriter".to_string(),
            ],
            chroma_key: ChromaKey::default(),
            fade_frames: 10,
            seed: 0,
            pulse: PulseParams::default(),
            max_effects_per_object: 16,
            max_manifest_entries: 10_000,
            audio_codec: render.audio_codec,
            audio_bitrate_kbps: render.audio_bitrate_kbps,
        }
    }
}

impl AssemblyConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> CaptionResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CaptionError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CaptionError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> CaptionResult<()> {
        if self.frame_rate.get() == 0 {
            return Err(CaptionError::config("frame_rate must be > 0"));
        }
        if self.resolution[0] == 0 || self.resolution[1] == 0 {
            return Err(CaptionError::config("resolution must be non-zero"));
        }
        for (name, v) in [
            ("text_size", self.text_size),
            ("max_scale", self.max_scale),
            ("scale_padding", self.scale_padding),
            ("camera.distance", self.camera.distance),
            ("camera.focal_length_mm", self.camera.focal_length_mm),
            ("camera.ortho_scale", self.camera.ortho_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CaptionError::config(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        for (name, c) in [
            ("background_color", self.background_color),
            ("text_color", self.text_color),
            ("chroma_key.key_color", self.chroma_key.key_color),
        ] {
            if !c.is_valid() {
                return Err(CaptionError::config(format!(
                    "{name} components must be within [0, 1]"
                )));
            }
        }
        if !self.chroma_key.threshold.is_finite() || self.chroma_key.threshold < 0.0 {
            return Err(CaptionError::config("chroma_key.threshold must be finite and >= 0"));
        }
        if self.fade_frames < 0 {
            return Err(CaptionError::config("fade_frames must be >= 0"));
        }
        let p = &self.pulse;
        let ranges_ok = [p.wait_secs, p.hold_secs]
            .iter()
            .all(|&(lo, hi)| lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi);
        if !ranges_ok || !(p.ramp_secs.is_finite() && p.ramp_secs >= 0.0) {
            return Err(CaptionError::config(
                "pulse durations must be finite, positive and ordered",
            ));
        }
        if self.max_manifest_entries == 0 {
            return Err(CaptionError::config("max_manifest_entries must be > 0"));
        }
        Ok(())
    }

    pub fn effect_params(&self) -> EffectParams {
        EffectParams {
            fade_frames: self.fade_frames,
            pulse: self.pulse,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            output_path: self.output_path.clone(),
            resolution: self.resolution,
            frame_rate: self.frame_rate,
            background_color: self.background_color,
            audio_codec: self.audio_codec.clone(),
            audio_bitrate_kbps: self.audio_bitrate_kbps,
            ..RenderSettings::default()
        }
    }

    pub fn font_path(&self, file: &str) -> PathBuf {
        self.font_dir.join(file)
    }

    pub fn view_bounds(&self) -> Vec2 {
        self.camera.view_bounds(self.resolution)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/config.rs"]
mod tests;

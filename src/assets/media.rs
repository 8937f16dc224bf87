use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{CaptionError, CaptionResult},
    manifest::visual::MediaKind,
};

/// Loaded media reference with its pixel dimensions.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageRef {
    pub path: PathBuf,
    pub media: MediaKind,
    pub width: u32,
    pub height: u32,
}

impl ImageRef {
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Resolve `source` against `root` unless it is already absolute.
pub fn resolve_media_path(root: &Path, source: &str) -> PathBuf {
    let p = Path::new(source);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Probe pixel dimensions of an image or video file.
pub fn probe_media(path: &Path, media: MediaKind) -> CaptionResult<ImageRef> {
    if !path.is_file() {
        return Err(CaptionError::asset_not_found(path));
    }

    let (width, height) = match media {
        MediaKind::Image => image::image_dimensions(path)
            .map_err(|e| CaptionError::asset_load(path, format!("decode image header: {e}")))?,
        MediaKind::Video => probe_video_dimensions(path)?,
    };
    if width == 0 || height == 0 {
        return Err(CaptionError::asset_load(
            path,
            format!("media has degenerate size {width}x{height}"),
        ));
    }

    Ok(ImageRef {
        path: path.to_path_buf(),
        media,
        width,
        height,
    })
}

#[cfg(feature = "media-ffmpeg")]
fn probe_video_dimensions(source_path: &Path) -> CaptionResult<(u32, u32)> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| CaptionError::asset_load(source_path, format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CaptionError::asset_load(
            source_path,
            format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|e| {
        CaptionError::asset_load(source_path, format!("ffprobe json parse failed: {e}"))
    })?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CaptionError::asset_load(source_path, "no video stream found"))?;
    match (stream.width, stream.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(CaptionError::asset_load(
            source_path,
            "missing video dimensions from ffprobe",
        )),
    }
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_video_dimensions(source_path: &Path) -> CaptionResult<(u32, u32)> {
    Err(CaptionError::asset_load(
        source_path,
        "video probing requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;

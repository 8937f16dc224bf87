use std::path::Path;

use serde_json::Value;

use crate::{
    assembly::diagnostics::{Diagnostics, Stage},
    effects::kind::EffectName,
    foundation::core::TimeInterval,
    manifest::schema::{
        SchemaError, SchemaPathElem, format_path, parse_interval, parse_json, read_json, require,
        require_str,
    },
};

/// Role of a visual element in the layer stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Background,
    Overlay,
    Main,
}

impl ElementKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "background" => Some(Self::Background),
            "overlay" => Some(Self::Overlay),
            "main" => Some(Self::Main),
            _ => None,
        }
    }

    /// Capitalized label used in object names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::Overlay => "Overlay",
            Self::Main => "Main",
        }
    }

    /// Depth of the element's plane: background behind, overlay in front.
    pub fn z_layer(self) -> i32 {
        match self {
            Self::Background => -1,
            Self::Main => 0,
            Self::Overlay => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// One validated entry of the visual-elements manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualElement {
    pub file_path: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub media: MediaKind,
    #[serde(rename = "timestamp")]
    pub interval: TimeInterval,
    /// Effects in application order; later entries win on conflicting properties.
    #[serde(default)]
    pub effects: Vec<EffectName>,
}

/// Serializable form of the whole manifest.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualElementsManifest {
    pub visual_elements: Vec<VisualElement>,
}

/// Load the visual-elements manifest at `path`.
///
/// Never fails: a missing or malformed file yields no elements, and each invalid element is
/// skipped. Every problem is recorded in `diags`.
pub fn load_visual_elements(
    path: &Path,
    max_entries: usize,
    diags: &mut Diagnostics,
) -> Vec<VisualElement> {
    read_visual_elements(path, diags)
        .map(|v| validate_visual_elements(&v, max_entries, diags))
        .unwrap_or_default()
}

/// Decode the manifest at `path` without validating it. A missing or malformed file is
/// recorded in `diags` and yields `None`.
pub fn read_visual_elements(path: &Path, diags: &mut Diagnostics) -> Option<Value> {
    match read_json(path) {
        Ok(v) => Some(v),
        Err(e) => {
            diags.warn(Stage::Parse, path.display().to_string(), e);
            None
        }
    }
}

/// Parse manifest text; `origin` only labels diagnostics.
pub fn parse_visual_elements(
    text: &str,
    origin: &Path,
    max_entries: usize,
    diags: &mut Diagnostics,
) -> Vec<VisualElement> {
    match parse_json(text, origin) {
        Ok(v) => validate_visual_elements(&v, max_entries, diags),
        Err(e) => {
            diags.warn(Stage::Parse, origin.display().to_string(), e);
            Vec::new()
        }
    }
}

/// Validate a decoded manifest element by element, in manifest order.
pub fn validate_visual_elements(
    root: &Value,
    max_entries: usize,
    diags: &mut Diagnostics,
) -> Vec<VisualElement> {
    let Some(list) = root.get("visual_elements") else {
        diags.warn(Stage::Validate, "$", "no 'visual_elements' list found");
        return Vec::new();
    };
    let Some(list) = list.as_array() else {
        diags.warn(
            Stage::Validate,
            "$.visual_elements",
            "'visual_elements' must be a list",
        );
        return Vec::new();
    };

    let mut out = Vec::with_capacity(list.len().min(max_entries));
    for (i, item) in list.iter().enumerate() {
        if i >= max_entries {
            diags.warn(
                Stage::Validate,
                "$.visual_elements",
                format!(
                    "manifest holds {} elements; only the first {max_entries} are used",
                    list.len()
                ),
            );
            break;
        }

        let path = [
            SchemaPathElem::Field("visual_elements"),
            SchemaPathElem::Index(i),
        ];
        match validate_element(item, &path, diags) {
            Ok(el) => out.push(el),
            Err(e) => diags.warn(
                Stage::Validate,
                format_path(&path),
                format!("element skipped: {e}"),
            ),
        }
    }
    out
}

fn validate_element(
    item: &Value,
    path: &[SchemaPathElem],
    diags: &mut Diagnostics,
) -> Result<VisualElement, SchemaError> {
    let field = |name: &'static str| {
        let mut p = path.to_vec();
        p.push(SchemaPathElem::Field(name));
        p
    };

    let obj = item
        .as_object()
        .ok_or_else(|| SchemaError::at(path, "must be an object"))?;

    let file_path = require_str(obj, "file_path", path)?;
    if file_path.trim().is_empty() {
        return Err(SchemaError::at(&field("file_path"), "must be non-empty"));
    }

    let kind_s = require_str(obj, "type", path)?;
    let kind = ElementKind::parse(kind_s).ok_or_else(|| {
        SchemaError::at(
            &field("type"),
            format!("invalid type '{kind_s}' (expected background, overlay or main)"),
        )
    })?;

    let media_s = require_str(obj, "media", path)?;
    let media = MediaKind::parse(media_s).ok_or_else(|| {
        SchemaError::at(
            &field("media"),
            format!("invalid media '{media_s}' (expected image or video)"),
        )
    })?;

    let interval = parse_interval(require(obj, "timestamp", path)?, &field("timestamp"))?;

    let mut effects = Vec::new();
    match obj.get("effects") {
        None | Some(Value::Null) => {}
        Some(Value::Array(names)) => {
            for (j, name) in names.iter().enumerate() {
                let mut p = field("effects");
                p.push(SchemaPathElem::Index(j));
                let subject = format_path(&p);
                match name.as_str() {
                    Some(s) => match EffectName::parse(s) {
                        Ok(e) => effects.push(e),
                        Err(err) => diags.warn(Stage::Validate, subject, format!("{err}; ignored")),
                    },
                    None => diags.warn(Stage::Validate, subject, "effect name must be a string; ignored"),
                }
            }
        }
        Some(_) => diags.warn(
            Stage::Validate,
            format_path(&field("effects")),
            "'effects' must be a list; treating as empty",
        ),
    }

    Ok(VisualElement {
        file_path: file_path.to_string(),
        kind,
        media,
        interval,
        effects,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/visual.rs"]
mod tests;

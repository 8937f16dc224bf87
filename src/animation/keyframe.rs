use std::collections::BTreeMap;

use crate::{
    compositing::material::{NODE_MAPPING, NODE_MIX},
    foundation::core::{FrameIndex, ObjectId, Vec2},
};

/// Animatable property of a scene object or of its material.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPath {
    /// Viewport visibility flag (`1` hidden, `0` shown).
    HideViewport,
    /// Render visibility flag (`1` hidden, `0` shown).
    HideRender,
    /// Mix factor between the transparent and the visible shader branch
    /// (`1` fully transparent, `0` opaque).
    MixFactor,
    /// Texture-space offset on the material's mapping node.
    UvOffset,
    /// Texture-space scale on the material's mapping node.
    UvScale,
}

impl PropertyPath {
    /// Host-facing data path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HideViewport => "hide_viewport",
            Self::HideRender => "hide_render",
            Self::MixFactor => "material.mix.fac",
            Self::UvOffset => "material.mapping.location",
            Self::UvScale => "material.mapping.scale",
        }
    }

    /// Paths that live on the object's material rather than on the object itself.
    pub fn is_material_path(self) -> bool {
        self.material_node().is_some()
    }

    /// Name of the material node a material path animates.
    pub fn material_node(self) -> Option<&'static str> {
        match self {
            Self::MixFactor => Some(NODE_MIX),
            Self::UvOffset | Self::UvScale => Some(NODE_MAPPING),
            Self::HideViewport | Self::HideRender => None,
        }
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyValue {
    Scalar(f64),
    Vec2(Vec2),
}

impl KeyValue {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Vec2(_) => None,
        }
    }

    pub fn as_vec2(self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(v),
            Self::Scalar(_) => None,
        }
    }

    fn lerp(a: Self, b: Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Vec2(a), Self::Vec2(b)) => Self::Vec2(a + (b - a) * t),
            // Mismatched kinds never blend.
            (a, _) => a,
        }
    }
}

/// Interpolation from a key toward the next one on the same property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold the value until the next key.
    Constant,
    Linear,
}

/// One keyframe sample emitted by an effect scheduler.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeEvent {
    pub target: ObjectId,
    pub property: PropertyPath,
    pub frame: FrameIndex,
    pub value: KeyValue,
    pub interpolation: Interpolation,
}

impl KeyframeEvent {
    pub fn new(
        target: ObjectId,
        property: PropertyPath,
        frame: FrameIndex,
        value: KeyValue,
        interpolation: Interpolation,
    ) -> Self {
        Self {
            target,
            property,
            frame,
            value,
            interpolation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Key {
    pub frame: FrameIndex,
    pub value: KeyValue,
    pub interpolation: Interpolation,
}

/// Per-object keyframe curves, one sorted key list per property.
///
/// Inserting a key at a frame that already holds one replaces it, so effects applied later
/// win over earlier ones on the same property and frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeSchedule {
    curves: BTreeMap<PropertyPath, Vec<Key>>,
}

impl KeyframeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key; returns `true` when it replaced an existing key at the same frame.
    pub fn insert(&mut self, event: &KeyframeEvent) -> bool {
        let keys = self.curves.entry(event.property).or_default();
        let key = Key {
            frame: event.frame,
            value: event.value,
            interpolation: event.interpolation,
        };
        let idx = keys.partition_point(|k| k.frame < event.frame);
        if idx < keys.len() && keys[idx].frame == event.frame {
            keys[idx] = key;
            true
        } else {
            keys.insert(idx, key);
            false
        }
    }

    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a KeyframeEvent>) {
        for e in events {
            self.insert(e);
        }
    }

    pub fn keys(&self, property: PropertyPath) -> &[Key] {
        self.curves.get(&property).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyPath> + '_ {
        self.curves.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.values().all(Vec::is_empty)
    }

    pub fn key_count(&self) -> usize {
        self.curves.values().map(Vec::len).sum()
    }

    /// Curve value at `frame`: clamped before the first and after the last key, otherwise
    /// held or blended according to the left key's interpolation.
    pub fn sample(&self, property: PropertyPath, frame: FrameIndex) -> Option<KeyValue> {
        let keys = self.curves.get(&property)?;
        if keys.is_empty() {
            return None;
        }

        let idx = keys.partition_point(|k| k.frame <= frame);
        if idx == 0 {
            return Some(keys[0].value);
        }
        if idx >= keys.len() {
            return Some(keys[keys.len() - 1].value);
        }

        let a = &keys[idx - 1];
        let b = &keys[idx];
        let denom = b.frame.0 - a.frame.0;
        if denom <= 0 {
            return Some(a.value);
        }
        match a.interpolation {
            Interpolation::Constant => Some(a.value),
            Interpolation::Linear => {
                let t = ((frame.0 - a.frame.0) as f64) / (denom as f64);
                Some(KeyValue::lerp(a.value, b.value, t))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;

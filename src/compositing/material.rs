use std::collections::{BTreeMap, HashSet};

use crate::{
    assets::media::ImageRef,
    compositing::uv_fit::UvFitTransform,
    foundation::core::Rgba,
    foundation::error::{CaptionError, CaptionResult},
};

/// Name of the texture mapping node animated by pan and zoom effects.
pub const NODE_MAPPING: &str = "Mapping";
/// Name of the shader mix node whose factor the fade-in animates.
pub const NODE_MIX: &str = "Mix Shader";
pub const NODE_OUTPUT: &str = "Material Output";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Output,
    Emission,
    TransparentBsdf,
    PrincipledBsdf,
    MixShader,
    ImageTexture,
    Mapping,
    TexCoord,
    Rgb,
    VectorSubtract,
    VectorLength,
    GreaterThan,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketValue {
    Float(f64),
    Vector([f64; 3]),
    Color(Rgba),
    Bool(bool),
    Text(String),
    Media(ImageRef),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Unlinked input values and node settings, by socket name.
    pub inputs: BTreeMap<String, SocketValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaterialLink {
    pub from: NodeId,
    pub from_socket: String,
    pub to: NodeId,
    pub to_socket: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialVariant {
    /// Flat emission color (text).
    Emission,
    /// Emission mixed with a transparent shader through an animatable factor (faded text).
    FadeMix,
    /// Emission-only bitmap texture.
    Texture,
    /// Keyed bitmap: pixels close to the key color route to a transparent shader.
    ChromaKey,
}

/// Chroma-key parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChromaKey {
    pub key_color: Rgba,
    /// Color distance above which a pixel is kept opaque.
    pub threshold: f64,
    /// Texture-space vertical offset used instead of centering on horizontally cropped media.
    /// Empirical, tuned for portrait-recorded green-screen footage.
    pub vertical_bias: f64,
    /// Texture rotation around the view axis, radians.
    pub rotation_rad: f64,
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self {
            key_color: Rgba::new(0.0, 1.0, 0.0, 1.0),
            threshold: 0.8,
            vertical_bias: 0.94,
            rotation_rad: -std::f64::consts::FRAC_PI_2,
        }
    }
}

/// Backend-agnostic shader graph owned by exactly one scene object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub variant: MaterialVariant,
    pub nodes: Vec<MaterialNode>,
    pub links: Vec<MaterialLink>,
}

struct GraphBuilder {
    nodes: Vec<MaterialNode>,
    links: Vec<MaterialLink>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    fn node(&mut self, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MaterialNode {
            id,
            name: name.to_string(),
            kind,
            inputs: BTreeMap::new(),
        });
        id
    }

    fn set(&mut self, id: NodeId, socket: &str, value: SocketValue) {
        self.nodes[id.0].inputs.insert(socket.to_string(), value);
    }

    fn link(&mut self, from: NodeId, from_socket: &str, to: NodeId, to_socket: &str) {
        self.links.push(MaterialLink {
            from,
            from_socket: from_socket.to_string(),
            to,
            to_socket: to_socket.to_string(),
        });
    }

    fn finish(self, name: String, variant: MaterialVariant) -> MaterialSpec {
        MaterialSpec {
            name,
            variant,
            nodes: self.nodes,
            links: self.links,
        }
    }

    // TexCoord -> Mapping -> ImageTexture; returns the texture node.
    fn mapped_texture(&mut self, media: &ImageRef, fit: UvFitTransform, rotation_rad: f64) -> NodeId {
        let coord = self.node("Texture Coordinate", NodeKind::TexCoord);
        let mapping = self.node(NODE_MAPPING, NodeKind::Mapping);
        let texture = self.node("Image Texture", NodeKind::ImageTexture);

        self.set(
            mapping,
            "Location",
            SocketValue::Vector([fit.offset_x, fit.offset_y, 0.0]),
        );
        self.set(
            mapping,
            "Scale",
            SocketValue::Vector([fit.scale_x, fit.scale_y, 1.0]),
        );
        self.set(
            mapping,
            "Rotation",
            SocketValue::Vector([0.0, 0.0, rotation_rad]),
        );
        self.set(texture, "Image", SocketValue::Media(media.clone()));

        self.link(coord, "UV", mapping, "Vector");
        self.link(mapping, "Vector", texture, "Vector");
        texture
    }
}

impl MaterialSpec {
    /// Flat emission material, the default look of a text object.
    pub fn emission(name: impl Into<String>, color: Rgba) -> Self {
        let mut g = GraphBuilder::new();
        let output = g.node(NODE_OUTPUT, NodeKind::Output);
        let emission = g.node("Emission", NodeKind::Emission);
        g.set(emission, "Color", SocketValue::Color(color));
        g.set(emission, "Strength", SocketValue::Float(1.0));
        g.link(emission, "Emission", output, "Surface");
        g.finish(name.into(), MaterialVariant::Emission)
    }

    /// Emission mixed against a transparent shader; the mix factor starts fully transparent.
    pub fn fade_mix(name: impl Into<String>, color: Rgba) -> Self {
        let mut g = GraphBuilder::new();
        let output = g.node(NODE_OUTPUT, NodeKind::Output);
        let emission = g.node("Emission", NodeKind::Emission);
        let transparent = g.node("Transparent BSDF", NodeKind::TransparentBsdf);
        let mix = g.node(NODE_MIX, NodeKind::MixShader);

        g.set(emission, "Color", SocketValue::Color(color));
        g.set(emission, "Strength", SocketValue::Float(1.0));
        g.set(mix, "Fac", SocketValue::Float(1.0));

        g.link(mix, "Shader", output, "Surface");
        g.link(transparent, "BSDF", mix, "Shader");
        g.link(emission, "Emission", mix, "Shader_001");
        g.finish(name.into(), MaterialVariant::FadeMix)
    }

    /// Emission-only textured plane.
    pub fn textured(name: impl Into<String>, media: &ImageRef, fit: UvFitTransform) -> Self {
        let mut g = GraphBuilder::new();
        let output = g.node(NODE_OUTPUT, NodeKind::Output);
        let emission = g.node("Emission", NodeKind::Emission);
        let texture = g.mapped_texture(media, fit, 0.0);

        g.link(texture, "Color", emission, "Color");
        g.link(emission, "Emission", output, "Surface");
        g.finish(name.into(), MaterialVariant::Texture)
    }

    /// Chroma-keyed plane: `|color - key| > threshold` selects the opaque branch.
    pub fn chroma_key(
        name: impl Into<String>,
        media: &ImageRef,
        fit: UvFitTransform,
        key: ChromaKey,
    ) -> Self {
        let fit = chroma_key_fit(fit, key);

        let mut g = GraphBuilder::new();
        let output = g.node(NODE_OUTPUT, NodeKind::Output);
        let transparent = g.node("Transparent BSDF", NodeKind::TransparentBsdf);
        let principled = g.node("Principled BSDF", NodeKind::PrincipledBsdf);
        let texture = g.mapped_texture(media, fit, key.rotation_rad);
        let key_color = g.node("Key Color", NodeKind::Rgb);
        let subtract = g.node("Subtract", NodeKind::VectorSubtract);
        let length = g.node("Length", NodeKind::VectorLength);
        let threshold = g.node("Threshold", NodeKind::GreaterThan);
        let mix = g.node(NODE_MIX, NodeKind::MixShader);

        g.set(
            key_color,
            "Color",
            SocketValue::Color(Rgba {
                a: 1.0,
                ..key.key_color
            }),
        );
        g.set(threshold, "Threshold", SocketValue::Float(key.threshold));
        g.set(texture, "extension", SocketValue::Text("EXTEND".to_string()));
        g.set(texture, "auto_refresh", SocketValue::Bool(true));

        g.link(texture, "Color", principled, "Base Color");
        g.link(texture, "Color", subtract, "A");
        g.link(key_color, "Color", subtract, "B");
        g.link(subtract, "Vector", length, "Vector");
        g.link(length, "Value", threshold, "Value");
        g.link(threshold, "Value", mix, "Fac");
        g.link(transparent, "BSDF", mix, "Shader");
        g.link(principled, "BSDF", mix, "Shader_001");
        g.link(mix, "Shader", output, "Surface");
        g.finish(name.into(), MaterialVariant::ChromaKey)
    }

    pub fn node(&self, name: &str) -> CaptionResult<&MaterialNode> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| CaptionError::missing_node(&self.name, name))
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// Current mapping-node transform; the resting state pan and zoom effects animate from.
    pub fn mapping_base(&self) -> CaptionResult<UvFitTransform> {
        let mapping = self.node(NODE_MAPPING)?;
        let vec = |socket: &str, default: [f64; 3]| match mapping.inputs.get(socket) {
            Some(SocketValue::Vector(v)) => *v,
            _ => default,
        };
        let loc = vec("Location", [0.0; 3]);
        let scale = vec("Scale", [1.0; 3]);
        Ok(UvFitTransform {
            scale_x: scale[0],
            scale_y: scale[1],
            offset_x: loc[0],
            offset_y: loc[1],
        })
    }

    /// Structural check: unique names, one output, links in range, no cycles.
    pub fn validate(&self) -> CaptionResult<()> {
        let mut names = HashSet::new();
        for (i, n) in self.nodes.iter().enumerate() {
            if n.id.0 != i {
                return Err(CaptionError::host(format!(
                    "material '{}': node '{}' has id {} at position {i}",
                    self.name, n.name, n.id.0
                )));
            }
            if !names.insert(n.name.as_str()) {
                return Err(CaptionError::host(format!(
                    "material '{}': duplicate node name '{}'",
                    self.name, n.name
                )));
            }
        }

        let outputs = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Output)
            .count();
        if outputs != 1 {
            return Err(CaptionError::host(format!(
                "material '{}' must have exactly one output node, found {outputs}",
                self.name
            )));
        }

        for l in &self.links {
            for id in [l.from, l.to] {
                if id.0 >= self.nodes.len() {
                    return Err(CaptionError::missing_node(
                        &self.name,
                        format!("node #{}", id.0),
                    ));
                }
            }
        }

        self.topological_order().map(|_| ())
    }

    /// Node ids ordered so every link points forward (Kahn's algorithm, stable by id).
    pub fn topological_order(&self) -> CaptionResult<Vec<NodeId>> {
        let n = self.nodes.len();
        let mut indegree = vec![0usize; n];
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); n];
        for l in &self.links {
            if l.from.0 >= n || l.to.0 >= n {
                return Err(CaptionError::missing_node(
                    &self.name,
                    format!("node #{}", l.from.0.max(l.to.0)),
                ));
            }
            edges[l.from.0].push(l.to.0);
            indegree[l.to.0] += 1;
        }

        let mut ready: std::collections::BTreeSet<usize> =
            (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_first() {
            order.push(NodeId(i));
            for &j in &edges[i] {
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.insert(j);
                }
            }
        }

        if order.len() != n {
            return Err(CaptionError::host(format!(
                "material '{}' graph contains a cycle",
                self.name
            )));
        }
        Ok(order)
    }
}

/// Cover fit adjusted for keyed footage: horizontally cropped media is pinned to the
/// vertical bias instead of centered.
pub fn chroma_key_fit(fit: UvFitTransform, key: ChromaKey) -> UvFitTransform {
    if fit.crops_horizontally() {
        UvFitTransform {
            offset_y: key.vertical_bias,
            ..fit
        }
    } else {
        fit
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositing/material.rs"]
mod tests;

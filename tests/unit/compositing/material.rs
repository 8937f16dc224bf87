use super::*;
use crate::manifest::visual::MediaKind;
use std::path::PathBuf;

fn media(kind: MediaKind) -> ImageRef {
    ImageRef {
        path: PathBuf::from("clip.mp4"),
        media: kind,
        width: 1920,
        height: 1080,
    }
}

fn link_exists(m: &MaterialSpec, from: &str, to: &str, to_socket: &str) -> bool {
    let from = m.node(from).unwrap().id;
    let to = m.node(to).unwrap().id;
    m.links
        .iter()
        .any(|l| l.from == from && l.to == to && l.to_socket == to_socket)
}

#[test]
fn emission_material_is_valid() {
    let m = MaterialSpec::emission("Material_TextObject_0", Rgba::WHITE);
    m.validate().unwrap();
    assert_eq!(m.variant, MaterialVariant::Emission);
    assert!(link_exists(&m, "Emission", NODE_OUTPUT, "Surface"));
    assert!(!m.has_node(NODE_MIX));
}

#[test]
fn fade_mix_starts_transparent() {
    let m = MaterialSpec::fade_mix("Material_TextObject_0", Rgba::WHITE);
    m.validate().unwrap();
    let mix = m.node(NODE_MIX).unwrap();
    assert_eq!(mix.inputs.get("Fac"), Some(&SocketValue::Float(1.0)));
    assert!(link_exists(&m, "Transparent BSDF", NODE_MIX, "Shader"));
    assert!(link_exists(&m, "Emission", NODE_MIX, "Shader_001"));
}

#[test]
fn textured_material_carries_fit_on_mapping() {
    let fit = UvFitTransform::cover(1920.0, 1080.0, 1.0, 1.0).unwrap();
    let m = MaterialSpec::textured("Background_a.png_Material", &media(MediaKind::Image), fit);
    m.validate().unwrap();
    assert_eq!(m.mapping_base().unwrap(), fit);
    assert!(link_exists(&m, "Image Texture", "Emission", "Color"));

    let order = m.topological_order().unwrap();
    let pos = |name: &str| {
        let id = m.node(name).unwrap().id;
        order.iter().position(|&n| n == id).unwrap()
    };
    assert!(pos("Texture Coordinate") < pos(NODE_MAPPING));
    assert!(pos(NODE_MAPPING) < pos("Image Texture"));
    assert!(pos("Emission") < pos(NODE_OUTPUT));
}

#[test]
fn chroma_key_routes_threshold_into_mix() {
    let fit = UvFitTransform::cover(1920.0, 1080.0, 1.0, 1.0).unwrap();
    let key = ChromaKey::default();
    let m = MaterialSpec::chroma_key("Main_clip.mp4_ChromaKey_Material", &media(MediaKind::Video), fit, key);
    m.validate().unwrap();
    assert_eq!(m.variant, MaterialVariant::ChromaKey);
    assert!(link_exists(&m, "Threshold", NODE_MIX, "Fac"));
    assert!(link_exists(&m, "Principled BSDF", NODE_MIX, "Shader_001"));
    assert_eq!(
        m.node("Threshold").unwrap().inputs.get("Threshold"),
        Some(&SocketValue::Float(0.8))
    );

    let base = m.mapping_base().unwrap();
    assert_eq!(base.offset_y, 0.94);
    assert_eq!(base.scale_x, fit.scale_x);
    assert_eq!(
        m.node(NODE_MAPPING).unwrap().inputs.get("Rotation"),
        Some(&SocketValue::Vector([0.0, 0.0, -std::f64::consts::FRAC_PI_2]))
    );
}

#[test]
fn chroma_key_fit_leaves_tall_media_centered() {
    let fit = UvFitTransform::cover(1080.0, 1920.0, 2.0, 1.0).unwrap();
    assert_eq!(chroma_key_fit(fit, ChromaKey::default()), fit);
}

#[test]
fn missing_node_is_reported() {
    let m = MaterialSpec::emission("Mat", Rgba::WHITE);
    let err = m.mapping_base().unwrap_err();
    assert!(matches!(err, CaptionError::MissingShaderNode { .. }));
}

#[test]
fn cycles_are_rejected() {
    let mut m = MaterialSpec::emission("Mat", Rgba::WHITE);
    m.links.push(MaterialLink {
        from: NodeId(0),
        from_socket: "Surface".to_string(),
        to: NodeId(1),
        to_socket: "Color".to_string(),
    });
    assert!(m.validate().is_err());
}

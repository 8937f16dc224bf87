use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_media").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn probes_png_dimensions() {
    let dir = scratch_dir("png");
    let path = dir.join("wide.png");
    image::RgbImage::new(32, 18).save(&path).unwrap();

    let r = probe_media(&path, MediaKind::Image).unwrap();
    assert_eq!((r.width, r.height), (32, 18));
    assert_eq!(r.media, MediaKind::Image);
    assert!((r.aspect() - 32.0 / 18.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_asset_not_found() {
    let err = probe_media(Path::new("target/unit_media/nope.png"), MediaKind::Image).unwrap_err();
    assert!(matches!(err, CaptionError::AssetNotFound { .. }));
}

#[test]
fn undecodable_file_is_asset_load_error() {
    let dir = scratch_dir("garbage");
    let path = dir.join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();
    let err = probe_media(&path, MediaKind::Image).unwrap_err();
    assert!(matches!(err, CaptionError::AssetLoad { .. }));
}

#[test]
fn relative_sources_resolve_against_root() {
    let root = Path::new("/data/run");
    assert_eq!(
        resolve_media_path(root, "bg/a.png"),
        PathBuf::from("/data/run/bg/a.png")
    );
    assert_eq!(
        resolve_media_path(root, "/abs/a.png"),
        PathBuf::from("/abs/a.png")
    );
}

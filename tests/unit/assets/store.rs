use std::{io::Cursor, path::PathBuf};

use super::*;
use crate::foundation::core::CaseVariant;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_assets").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn clip_paths_follow_library_layout() {
    let lib = ClipLibrary::new("clips");
    let upper = GlyphKey::for_char('A').unwrap();
    let lower = GlyphKey::for_char('a').unwrap();
    let digit = GlyphKey::for_char('3').unwrap();
    assert_eq!(
        lib.path_for(upper),
        PathBuf::from("clips").join("UPPER_CASE").join("A.mp4")
    );
    assert_eq!(
        lib.path_for(lower),
        PathBuf::from("clips").join("LOWER_CASE").join("a.mp4")
    );
    assert_eq!(
        lib.path_for(digit),
        PathBuf::from("clips").join("LOWER_CASE").join("3.mp4")
    );
    assert_eq!(
        ClipLibrary::new("clips").with_extension("mov").path_for(lower),
        PathBuf::from("clips").join("LOWER_CASE").join("a.mov")
    );
}

#[test]
fn resolve_reports_missing_clip() {
    let root = fresh_dir("resolve");
    std::fs::create_dir_all(root.join("LOWER_CASE")).unwrap();
    std::fs::write(root.join("LOWER_CASE").join("b.mp4"), b"clip").unwrap();

    let lib = ClipLibrary::new(&root);
    let b = GlyphKey::for_char('b').unwrap();
    assert!(lib.exists(b));
    assert_eq!(lib.resolve(b).unwrap(), root.join("LOWER_CASE").join("b.mp4"));
    assert_eq!(lib.list(), vec![(b, lib.path_for(b))]);

    let err = lib.resolve(GlyphKey::for_char('B').unwrap()).unwrap_err();
    assert!(matches!(
        err,
        GlyphError::AssetNotFound {
            ch: 'B',
            case: CaseVariant::Upper
        }
    ));
}

#[test]
fn still_library_loads_named_pngs_only() {
    let dir = fresh_dir("stills");
    std::fs::write(dir.join("upper_h.png"), png_bytes([255, 0, 0, 255])).unwrap();
    std::fs::write(dir.join("lower_h.png"), png_bytes([0, 255, 0, 255])).unwrap();
    std::fs::write(dir.join("preview_123.png"), png_bytes([0, 0, 255, 255])).unwrap();
    std::fs::write(dir.join("lower_x.png"), b"corrupt").unwrap();
    std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

    let lib = StillLibrary::load_dir(&dir).unwrap();
    assert_eq!(lib.len(), 2);
    let upper_h = lib.still(GlyphKey::for_char('H').unwrap()).unwrap();
    assert_eq!(upper_h.get_pixel(0, 0).0, [255, 0, 0, 255]);
    let lower_h = lib.still(GlyphKey::for_char('h').unwrap()).unwrap();
    assert_eq!(lower_h.get_pixel(1, 1).0, [0, 255, 0, 255]);
    assert!(lib.still(GlyphKey::for_char('x').unwrap()).is_none());
}

#[test]
fn missing_still_directory_is_empty() {
    let lib = StillLibrary::load_dir("target/unit_assets/definitely_missing").unwrap();
    assert!(lib.is_empty());
}

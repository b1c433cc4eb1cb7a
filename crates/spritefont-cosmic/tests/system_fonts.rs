//! Builds real atlases from system fonts.
//!
//! Machines without any installed font skip these tests.

use spritefont::{BuilderConfig, CharRange, SpriteFontArchive, SpriteFontReceipt};
use spritefont_cosmic::{FontAttributes, FontDatabase, FontSystem, SpriteFontFace, cosmic_builder};

fn system_fonts() -> Option<FontSystem> {
    let database = FontDatabase::new();
    if database.is_empty() {
        eprintln!("no system fonts installed, skipping");
        return None;
    }
    Some(FontSystem::new(database))
}

fn digits(face: SpriteFontFace) -> SpriteFontReceipt<SpriteFontFace> {
    SpriteFontReceipt::new(face, vec![CharRange::new('0' as u32, '9' as u32).unwrap()], '0' as u32)
        .with_borders(1, 1)
}

#[test]
fn test_build_digits_atlas() {
    let Some(fonts) = system_fonts() else {
        return;
    };
    let face = SpriteFontFace::new(FontAttributes::sans_serif(), 16.0);
    let mut builder = cosmic_builder(&fonts, BuilderConfig::default());
    let atlas = builder.build(&digits(face.clone())).unwrap();

    assert_eq!(atlas.glyphs().len(), 10);
    assert_eq!(atlas.font_height(), face.line_height());
    assert!(atlas.glyphs().iter().all(|g| atlas.advance(g) > 0));

    let image = image::load_from_memory(atlas.bitmap()).unwrap().to_luma8();
    assert!(image.width().is_power_of_two() && image.height().is_power_of_two());
    assert!(image.pixels().any(|p| p.0[0] > 0), "no glyph pixels were painted");
}

#[test]
fn test_cosmic_atlas_survives_archive() {
    let Some(fonts) = system_fonts() else {
        return;
    };
    let face = SpriteFontFace::new(FontAttributes::monospace(), 12.0);
    let config = BuilderConfig::default();
    let mut builder = cosmic_builder(&fonts, config.clone());
    let atlas = builder.build(&digits(face)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("digits.sfpk");
    let mut archive = SpriteFontArchive::new();
    archive.write_font("digits", &atlas, &config).unwrap();
    archive.save(&path).unwrap();

    let reopened = SpriteFontArchive::open(&path).unwrap();
    assert_eq!(reopened.read_font("digits").unwrap(), atlas);
}

#[test]
fn test_invalid_face_size_is_collaborator_error() {
    let fonts = FontSystem::new(FontDatabase::empty());
    let face = SpriteFontFace::new(FontAttributes::monospace(), 0.0);
    let mut builder = cosmic_builder(&fonts, BuilderConfig::default());
    let err = builder.build(&digits(face)).unwrap_err();
    assert!(matches!(err, spritefont::BuildError::Collaborator { .. }));
}

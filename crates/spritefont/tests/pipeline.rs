//! Integration tests for the build pipeline and persistence.
//!
//! The collaborators here are in-memory fakes, so no font or pixel work is involved.

use std::collections::HashMap;

use spritefont::*;

// ============================================================================
// Test Collaborators
// ============================================================================

/// A font handle that is just a name.
#[derive(Debug, Clone)]
struct FakeFont {
    name: &'static str,
}

/// Metrics from a width table, falling back to a default advance.
struct TableMetrics {
    widths: HashMap<u32, i32>,
    default_width: i32,
    line_height: i32,
    measured: Vec<u32>,
}

impl TableMetrics {
    fn fixed(width: i32, line_height: i32) -> Self {
        Self {
            widths: HashMap::new(),
            default_width: width,
            line_height,
            measured: Vec::new(),
        }
    }

    fn with_width(mut self, character: char, width: i32) -> Self {
        self.widths.insert(character as u32, width);
        self
    }
}

impl GlyphMetricsSource<FakeFont> for TableMetrics {
    fn measure(&mut self, font: &FakeFont, character: u32) -> BuildResult<GlyphMetrics> {
        assert_eq!(font.name, "fake");
        self.measured.push(character);
        let width = self.widths.get(&character).copied().unwrap_or(self.default_width);
        Ok(GlyphMetrics::new(width, self.line_height))
    }
}

#[derive(Debug, PartialEq)]
enum Call {
    Begin(u32, u32),
    Paint(u32, u32, u32),
    Finish,
}

/// Records every call and returns a fake PNG.
#[derive(Default)]
struct RecordingRasterizer {
    calls: Vec<Call>,
}

impl Rasterizer<FakeFont> for RecordingRasterizer {
    fn begin(&mut self, width: u32, height: u32) -> BuildResult<()> {
        self.calls.push(Call::Begin(width, height));
        Ok(())
    }

    fn paint(&mut self, _font: &FakeFont, character: u32, x: u32, y: u32) -> BuildResult<()> {
        self.calls.push(Call::Paint(character, x, y));
        Ok(())
    }

    fn finish(&mut self) -> BuildResult<Vec<u8>> {
        self.calls.push(Call::Finish);
        Ok(b"\x89PNG fake".to_vec())
    }
}

fn font() -> FakeFont {
    FakeFont { name: "fake" }
}

fn ascii_receipt(x_border: i32, y_border: i32) -> SpriteFontReceipt<FakeFont> {
    SpriteFontReceipt::new(font(), vec![CharRange::new(32, 126).unwrap()], '?' as u32)
        .with_borders(x_border, y_border)
}

/// Cell rectangles `(x0, y0, x1, y1)` of every glyph, widths resolved.
fn cells(atlas: &SpriteFontAtlas) -> Vec<(i32, i32, i32, i32)> {
    atlas
        .glyphs()
        .iter()
        .map(|g| {
            let w = atlas.advance(g);
            (g.x, g.y, g.x + w, g.y + atlas.font_height())
        })
        .collect()
}

// ============================================================================
// Build Pipeline
// ============================================================================

#[test]
fn test_printable_ascii_fixed_pitch() {
    let mut builder = SpriteFontBuilder::new(TableMetrics::fixed(6, 12), RecordingRasterizer::default());
    let atlas = builder.build(&ascii_receipt(0, 0)).unwrap();

    assert_eq!(atlas.glyphs().len(), 95);
    assert_eq!(atlas.default_character_index(), 31);
    assert_eq!(atlas.default_glyph().map(|g| g.character), Some('?' as u32));
    assert_eq!(atlas.font_height(), 12);
    assert_eq!(atlas.character_width(), 6);
    assert!(atlas.is_fixed_pitch());
    assert!(atlas.glyphs().iter().all(|g| g.width == 0));

    let (metrics, rasterizer) = builder.into_parts();
    assert_eq!(metrics.measured, (32..=126).collect::<Vec<_>>());
    assert_eq!(rasterizer.calls.first(), Some(&Call::Begin(128, 64)));
}

#[test]
fn test_paint_happens_after_begin_in_table_order() {
    let mut builder = SpriteFontBuilder::new(
        TableMetrics::fixed(7, 14).with_width('i', 3).with_width('W', 11),
        RecordingRasterizer::default(),
    );
    let atlas = builder.build(&ascii_receipt(2, 1)).unwrap();
    let (_, rasterizer) = builder.into_parts();

    let calls = &rasterizer.calls;
    assert_eq!(calls.len(), atlas.glyphs().len() + 2);
    assert!(matches!(calls[0], Call::Begin(..)));
    assert_eq!(calls.last(), Some(&Call::Finish));

    for (glyph, call) in atlas.glyphs().iter().zip(&calls[1..]) {
        assert_eq!(call, &Call::Paint(glyph.character, glyph.x as u32, glyph.y as u32));
    }
    assert_eq!(atlas.bitmap(), b"\x89PNG fake");
}

#[test]
fn test_variable_pitch_widths() {
    let metrics = TableMetrics::fixed(7, 14).with_width('i', 3).with_width('W', 11);
    let mut builder = SpriteFontBuilder::new(metrics, RecordingRasterizer::default());
    let atlas = builder.build(&ascii_receipt(1, 1)).unwrap();

    assert_eq!(atlas.character_width(), 0);
    assert!(!atlas.is_fixed_pitch());
    let i = atlas.glyph('i' as u32).unwrap();
    let w = atlas.glyph('W' as u32).unwrap();
    let a = atlas.glyph('a' as u32).unwrap();
    assert_eq!((i.width, w.width, a.width), (3, 11, 7));
    assert_eq!(atlas.advance(a), 7);
}

#[test]
fn test_cells_stay_inside_canvas_and_apart() {
    let metrics = TableMetrics::fixed(9, 17).with_width(' ', 4).with_width('M', 15);
    let mut builder = SpriteFontBuilder::new(metrics, RecordingRasterizer::default());
    let atlas = builder.build(&ascii_receipt(3, 2)).unwrap();
    let (_, rasterizer) = builder.into_parts();

    let Some(&Call::Begin(width, height)) = rasterizer.calls.first() else {
        panic!("rasterizer was not started");
    };
    assert!(width.is_power_of_two() && height.is_power_of_two());
    assert!(height <= width);

    let xb = atlas.glyph_x_border();
    let yb = atlas.glyph_y_border();
    let cells = cells(&atlas);
    for &(x0, y0, x1, y1) in &cells {
        assert!(x0 >= xb && y0 >= yb);
        assert!(x1 + xb <= width as i32, "cell ends at {} in a canvas {} wide", x1, width);
        assert!(y1 <= height as i32);
    }
    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            // padded on the left and top, so neighbours keep a full border between them
            let apart = a.2 + xb <= b.0 || b.2 + xb <= a.0 || a.3 + yb <= b.1 || b.3 + yb <= a.1;
            assert!(apart, "{:?} and {:?} overlap", a, b);
        }
    }
}

#[test]
fn test_overlapping_ranges_and_outside_default() {
    let ranges = parse_ranges("65-70, 68-75\n76").unwrap();
    let receipt = SpriteFontReceipt::new(font(), ranges, ' ' as u32);
    let mut builder = SpriteFontBuilder::new(TableMetrics::fixed(5, 10), RecordingRasterizer::default());
    let atlas = builder.build(&receipt).unwrap();

    let characters: Vec<u32> = atlas.glyphs().iter().map(|g| g.character).collect();
    let mut expected = vec![32];
    expected.extend(65..=76);
    assert_eq!(characters, expected);
    assert_eq!(atlas.default_character_index(), 0);
}

#[test]
fn test_free_build_with_borrowed_collaborators() {
    let mut metrics = TableMetrics::fixed(6, 12);
    let mut rasterizer = RecordingRasterizer::default();
    let atlas = build(
        &font(),
        &[CharRange::new('0' as u32, '9' as u32).unwrap()],
        '0' as u32,
        1,
        1,
        &mut metrics,
        &mut rasterizer,
    )
    .unwrap();

    assert_eq!(atlas.glyphs().len(), 10);
    assert_eq!(metrics.measured.len(), 10);
    assert_eq!(rasterizer.calls.len(), 12);
}

#[test]
fn test_invalid_inputs() {
    let mut builder = SpriteFontBuilder::new(TableMetrics::fixed(6, 12), RecordingRasterizer::default());

    let err = builder.build(&ascii_receipt(11, 0)).unwrap_err();
    assert!(matches!(err, BuildError::InvalidBorder { axis: "x", value: 11 }));

    let wide = SpriteFontReceipt::new(font(), vec![], 0x1F600);
    assert!(matches!(builder.build(&wide), Err(BuildError::InvalidCharacter { .. })));

    let mut flat = SpriteFontBuilder::new(TableMetrics::fixed(6, 0), RecordingRasterizer::default());
    assert!(matches!(
        flat.build(&ascii_receipt(0, 0)),
        Err(BuildError::InvalidArgument { .. })
    ));
}

#[test]
fn test_rebuild_is_deterministic() {
    let mut builder = SpriteFontBuilder::new(
        TableMetrics::fixed(7, 14).with_width('i', 3),
        RecordingRasterizer::default(),
    );
    let receipt = ascii_receipt(2, 2);
    let first = builder.build(&receipt).unwrap();
    let second = builder.build(&receipt).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Persistence
// ============================================================================

fn built_atlas() -> SpriteFontAtlas {
    let mut builder = SpriteFontBuilder::new(
        TableMetrics::fixed(7, 14).with_width('i', 3),
        RecordingRasterizer::default(),
    );
    builder.build(&ascii_receipt(1, 1)).unwrap()
}

#[test]
fn test_archive_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fonts.sfpk");
    let atlas = built_atlas();

    let mut archive = SpriteFontArchive::new();
    archive.write_font("body", &atlas, &BuilderConfig::default()).unwrap();
    archive
        .write_font("legacy", &atlas, &BuilderConfig::default().with_glyph_layout(GlyphLayout::PackedWord))
        .unwrap();
    archive.save(&path).unwrap();

    let reopened = SpriteFontArchive::open(&path).unwrap();
    assert_eq!(reopened.font_names().collect::<Vec<_>>(), vec!["body", "legacy"]);
    assert_eq!(reopened.read_font("body").unwrap(), atlas);
    assert_eq!(reopened.read_font("legacy").unwrap(), atlas);

    let json = reopened.entry("fonts/sprite/body.json").unwrap();
    let projected = from_json(std::str::from_utf8(json).unwrap()).unwrap();
    assert_eq!(projected.glyphs(), atlas.glyphs());
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SpriteFontArchive::open(dir.path().join("missing.sfpk")).unwrap_err();
    assert!(matches!(err, BuildError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_font_record_file_round_trip() {
    let atlas = built_atlas();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let bytes = encode_font(&atlas, EncodeOptions::default()).unwrap();
    std::io::Write::write_all(&mut file, &bytes).unwrap();

    let read = std::fs::read(file.path()).unwrap();
    let record = decode_font_record(&read).unwrap();
    assert_eq!(record.layout, GlyphLayout::Compact);
    assert!(record.bitmap_embedded);
    assert_eq!(record.atlas, atlas);
}

//! Versioned binary encoding of glyph tables and font records.
//!
//! The byte layout is defined here and nowhere else; in-memory types can
//! change freely as long as these routines keep reading old data. All
//! integers are big-endian.
//!
//! # Font record
//!
//! ```text
//! magic         4 bytes  "SPFN"
//! layout tag    u16      see GlyphLayout
//! flags         u16      bit 0: bitmap embedded
//! font height   i32
//! default index i32      -1 when there is no default character
//! char width    i32      0 for variable pitch
//! x border      i32
//! y border      i32
//! glyph count   u32
//! glyphs        count * record
//! bitmap length u32      only with flag bit 0
//! bitmap        bytes
//! ```
//!
//! # Glyph records
//!
//! | Layout       | Size | Fields                                                    |
//! |--------------|------|-----------------------------------------------------------|
//! | `Compact`    | 8    | u16 character, u16 x, u16 y, i16 width                    |
//! | `PackedWord` | 12   | u32 (character << 16 \| width as u16), i32 x, i32 y       |
//!
//! `Compact` clamps x and y into `0..=65535`. Characters above `0xFFFF`
//! cannot be encoded in either layout and are rejected.

use spritefont_core::profiling::profile_function;

use crate::chars::MAX_CODE_UNIT;
use crate::error::{BuildError, BuildResult};
use crate::glyph::{Glyph, SpriteFontAtlas};

/// Magic prefix of a font record.
pub const FONT_MAGIC: [u8; 4] = *b"SPFN";

const FLAG_BITMAP_EMBEDDED: u16 = 0x0001;
const KNOWN_FLAGS: u16 = FLAG_BITMAP_EMBEDDED;

/// Glyph record layout, written as a tag in front of every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphLayout {
    /// 8 bytes per glyph, coordinates clamped to 16 bits. The normative layout.
    #[default]
    Compact,
    /// 12 bytes per glyph with character and width packed into one word.
    PackedWord,
}

impl GlyphLayout {
    pub const fn tag(self) -> u16 {
        match self {
            GlyphLayout::Compact => 1,
            GlyphLayout::PackedWord => 2,
        }
    }

    pub fn from_tag(tag: u16) -> BuildResult<Self> {
        match tag {
            1 => Ok(GlyphLayout::Compact),
            2 => Ok(GlyphLayout::PackedWord),
            other => Err(BuildError::mismatch(format!("unknown glyph layout tag {}", other))),
        }
    }

    /// Encoded size of one glyph record.
    pub const fn record_size(self) -> usize {
        match self {
            GlyphLayout::Compact => 8,
            GlyphLayout::PackedWord => 12,
        }
    }
}

/// Options for [`encode_font`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub layout: GlyphLayout,
    /// Store the bitmap inside the record. Archives keep it as a separate entry instead.
    pub embed_bitmap: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            layout: GlyphLayout::Compact,
            embed_bitmap: true,
        }
    }
}

/// A decoded font record and how it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRecord {
    /// The atlas; its bitmap is empty when it was not embedded.
    pub atlas: SpriteFontAtlas,
    pub layout: GlyphLayout,
    pub bitmap_embedded: bool,
}

fn code_unit(glyph: &Glyph) -> BuildResult<u16> {
    if glyph.character > MAX_CODE_UNIT {
        return Err(BuildError::invalid_character(format!(
            "U+{:04X} does not fit a 16-bit glyph record",
            glyph.character
        )));
    }
    Ok(glyph.character as u16)
}

fn clamp_coordinate(glyph: &Glyph, value: i32) -> u16 {
    let clamped = value.clamp(0, i32::from(u16::MAX));
    if clamped != value {
        tracing::warn!(
            character = glyph.character,
            value,
            "glyph coordinate clamped to 16 bits"
        );
    }
    clamped as u16
}

fn write_glyphs(out: &mut Vec<u8>, glyphs: &[Glyph], layout: GlyphLayout) -> BuildResult<()> {
    out.reserve(glyphs.len() * layout.record_size());
    for glyph in glyphs {
        let character = code_unit(glyph)?;
        match layout {
            GlyphLayout::Compact => {
                out.extend_from_slice(&character.to_be_bytes());
                out.extend_from_slice(&clamp_coordinate(glyph, glyph.x).to_be_bytes());
                out.extend_from_slice(&clamp_coordinate(glyph, glyph.y).to_be_bytes());
                out.extend_from_slice(&glyph.width.to_be_bytes());
            }
            GlyphLayout::PackedWord => {
                let word = (u32::from(character) << 16) | u32::from(glyph.width as u16);
                out.extend_from_slice(&word.to_be_bytes());
                out.extend_from_slice(&glyph.x.to_be_bytes());
                out.extend_from_slice(&glyph.y.to_be_bytes());
            }
        }
    }
    Ok(())
}

fn read_glyphs(reader: &mut ByteReader<'_>, count: u32, layout: GlyphLayout) -> BuildResult<Vec<Glyph>> {
    let needed = count as usize * layout.record_size();
    if needed > reader.remaining() {
        return Err(BuildError::mismatch(format!(
            "truncated glyph table: {} glyphs need {} bytes, {} left",
            count,
            needed,
            reader.remaining()
        )));
    }

    let mut glyphs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let glyph = match layout {
            GlyphLayout::Compact => {
                let character = reader.u16()?;
                let x = reader.u16()?;
                let y = reader.u16()?;
                let width = reader.i16()?;
                Glyph::new(u32::from(character), i32::from(x), i32::from(y), width)
            }
            GlyphLayout::PackedWord => {
                let word = reader.u32()?;
                let x = reader.i32()?;
                let y = reader.i32()?;
                Glyph::new(word >> 16, x, y, (word & 0xFFFF) as u16 as i16)
            }
        };
        glyphs.push(glyph);
    }
    Ok(glyphs)
}

/// Encode a bare glyph table: `u16 layout tag, u32 count, records`.
pub fn encode_glyph_table(glyphs: &[Glyph], layout: GlyphLayout) -> BuildResult<Vec<u8>> {
    profile_function!();
    let mut out = Vec::with_capacity(6 + glyphs.len() * layout.record_size());
    out.extend_from_slice(&layout.tag().to_be_bytes());
    out.extend_from_slice(&glyph_count(glyphs)?.to_be_bytes());
    write_glyphs(&mut out, glyphs, layout)?;
    Ok(out)
}

/// Decode a table written by [`encode_glyph_table`], dispatching on its layout tag.
pub fn decode_glyph_table(bytes: &[u8]) -> BuildResult<Vec<Glyph>> {
    profile_function!();
    let mut reader = ByteReader::new(bytes);
    let layout = GlyphLayout::from_tag(reader.u16()?)?;
    let count = reader.u32()?;
    let glyphs = read_glyphs(&mut reader, count, layout)?;
    reader.finish()?;
    Ok(glyphs)
}

fn glyph_count(glyphs: &[Glyph]) -> BuildResult<u32> {
    u32::try_from(glyphs.len())
        .map_err(|_| BuildError::invalid_argument(format!("{} glyphs do not fit a table", glyphs.len())))
}

/// Encode a complete font record.
pub fn encode_font(atlas: &SpriteFontAtlas, options: EncodeOptions) -> BuildResult<Vec<u8>> {
    profile_function!();
    let glyphs = atlas.glyphs();
    let bitmap_len = if options.embed_bitmap { 4 + atlas.bitmap().len() } else { 0 };
    let mut out = Vec::with_capacity(32 + glyphs.len() * options.layout.record_size() + bitmap_len);

    out.extend_from_slice(&FONT_MAGIC);
    out.extend_from_slice(&options.layout.tag().to_be_bytes());
    let flags = if options.embed_bitmap { FLAG_BITMAP_EMBEDDED } else { 0 };
    out.extend_from_slice(&flags.to_be_bytes());
    for value in [
        atlas.font_height(),
        atlas.default_character_index(),
        atlas.character_width(),
        atlas.glyph_x_border(),
        atlas.glyph_y_border(),
    ] {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out.extend_from_slice(&glyph_count(glyphs)?.to_be_bytes());
    write_glyphs(&mut out, glyphs, options.layout)?;

    if options.embed_bitmap {
        let len = u32::try_from(atlas.bitmap().len())
            .map_err(|_| BuildError::invalid_argument("bitmap larger than 4 GiB"))?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(atlas.bitmap());
    }

    tracing::debug!(
        bytes = out.len(),
        glyphs = glyphs.len(),
        layout = ?options.layout,
        "encoded font record"
    );
    Ok(out)
}

/// Decode a font record written by [`encode_font`].
pub fn decode_font_record(bytes: &[u8]) -> BuildResult<FontRecord> {
    profile_function!();
    let mut reader = ByteReader::new(bytes);

    let magic = reader.bytes(FONT_MAGIC.len())?;
    if magic != FONT_MAGIC {
        return Err(BuildError::mismatch(format!("bad font record magic {:02x?}", magic)));
    }
    let layout = GlyphLayout::from_tag(reader.u16()?)?;
    let flags = reader.u16()?;
    if flags & !KNOWN_FLAGS != 0 {
        return Err(BuildError::mismatch(format!("unknown font record flags {:#06x}", flags)));
    }

    let font_height = reader.i32()?;
    let default_character_index = reader.i32()?;
    let character_width = reader.i32()?;
    let glyph_x_border = reader.i32()?;
    let glyph_y_border = reader.i32()?;
    let count = reader.u32()?;
    let glyphs = read_glyphs(&mut reader, count, layout)?;

    let bitmap_embedded = flags & FLAG_BITMAP_EMBEDDED != 0;
    let bitmap = if bitmap_embedded {
        let len = reader.u32()? as usize;
        reader.bytes(len)?.to_vec()
    } else {
        Vec::new()
    };
    reader.finish()?;

    let atlas = SpriteFontAtlas::new(
        font_height,
        default_character_index,
        character_width,
        glyphs,
        bitmap,
        glyph_x_border,
        glyph_y_border,
    )
    .map_err(|err| BuildError::mismatch(format!("inconsistent font record: {}", err)))?;

    Ok(FontRecord {
        atlas,
        layout,
        bitmap_embedded,
    })
}

/// Decode a font record, returning just the atlas.
pub fn decode_font(bytes: &[u8]) -> BuildResult<SpriteFontAtlas> {
    decode_font_record(bytes).map(|record| record.atlas)
}

/// Bounds-checked big-endian cursor over a byte slice.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn bytes(&mut self, len: usize) -> BuildResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(BuildError::mismatch(format!(
                "truncated: need {} bytes at offset {}, {} left",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> BuildResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.bytes(N)?);
        Ok(array)
    }

    pub(crate) fn u16(&mut self) -> BuildResult<u16> {
        self.array().map(u16::from_be_bytes)
    }

    fn i16(&mut self) -> BuildResult<i16> {
        self.array().map(i16::from_be_bytes)
    }

    pub(crate) fn u32(&mut self) -> BuildResult<u32> {
        self.array().map(u32::from_be_bytes)
    }

    fn i32(&mut self) -> BuildResult<i32> {
        self.array().map(i32::from_be_bytes)
    }

    pub(crate) fn finish(self) -> BuildResult<()> {
        if self.remaining() != 0 {
            return Err(BuildError::mismatch(format!(
                "{} trailing bytes after record",
                self.remaining()
            )));
        }
        Ok(())
    }
}

//! Named-entry container for persisting built fonts.
//!
//! ```text
//! magic    4 bytes  "SFPK"
//! version  u16      1
//! count    u32
//! entries  count * (u16 name length, UTF-8 name, u32 data length, data)
//! ```
//!
//! Fonts are stored under `fonts/sprite/`: the font record without its
//! bitmap as `<name>.bin`, the PNG as `<name>.png` and optionally the JSON
//! projection as `<name>.json`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::codec::{self, ByteReader, EncodeOptions};
use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};
use crate::glyph::SpriteFontAtlas;
use crate::json;

/// Magic prefix of an archive.
pub const ARCHIVE_MAGIC: [u8; 4] = *b"SFPK";
/// Container version written by this crate.
pub const ARCHIVE_VERSION: u16 = 1;
/// Directory holding font entries.
pub const FONT_DIR: &str = "fonts/sprite";

/// An in-memory archive of named byte entries, kept in name order.
///
/// # Example
///
/// ```
/// use spritefont::{BuilderConfig, Glyph, SpriteFontArchive, SpriteFontAtlas};
///
/// let atlas = SpriteFontAtlas::new(12, 0, 7, vec![Glyph::new(63, 1, 1, 0)], vec![0u8; 4], 1, 1)?;
/// let mut archive = SpriteFontArchive::new();
/// archive.write_font("mono", &atlas, &BuilderConfig::default())?;
///
/// let mut bytes = Vec::new();
/// archive.write_to(&mut bytes)?;
/// let reopened = SpriteFontArchive::read_from(bytes.as_slice())?;
/// assert_eq!(reopened.read_font("mono")?, atlas);
/// # Ok::<(), spritefont::BuildError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteFontArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

fn entry_path(name: &str, extension: &str) -> String {
    format!("{}/{}.{}", FONT_DIR, name, extension)
}

fn check_font_name(name: &str) -> BuildResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(BuildError::invalid_argument(format!(
            "font name {:?} must be non-empty and contain no path separators",
            name
        )));
    }
    Ok(())
}

impl SpriteFontArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add or replace a raw entry.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> BuildResult<()> {
        let name = name.into();
        if name.is_empty() || name.len() > usize::from(u16::MAX) {
            return Err(BuildError::invalid_argument(format!(
                "entry name must be 1..=65535 bytes, got {}",
                name.len()
            )));
        }
        let data = data.into();
        if u32::try_from(data.len()).is_err() {
            return Err(BuildError::invalid_argument(format!("entry {} is larger than 4 GiB", name)));
        }
        self.entries.insert(name, data);
        Ok(())
    }

    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Names of the fonts stored in this archive.
    pub fn font_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(|entry| {
            entry
                .strip_prefix(FONT_DIR)
                .and_then(|rest| rest.strip_prefix('/'))
                .and_then(|rest| rest.strip_suffix(".bin"))
        })
    }

    /// Store `atlas` under `name`, replacing any font of the same name.
    pub fn write_font(&mut self, name: &str, atlas: &SpriteFontAtlas, config: &BuilderConfig) -> BuildResult<()> {
        check_font_name(name)?;
        let options = EncodeOptions {
            layout: config.glyph_layout,
            embed_bitmap: false,
        };
        self.insert(entry_path(name, "bin"), codec::encode_font(atlas, options)?)?;
        self.insert(entry_path(name, "png"), atlas.bitmap())?;

        let json_path = entry_path(name, "json");
        if config.embed_json {
            self.insert(json_path, json::to_json(atlas)?.into_bytes())?;
        } else {
            self.entries.remove(&json_path);
        }

        tracing::debug!(font = name, entries = self.entries.len(), "stored font in archive");
        Ok(())
    }

    /// Reassemble the font stored under `name`.
    pub fn read_font(&self, name: &str) -> BuildResult<SpriteFontAtlas> {
        check_font_name(name)?;
        let record_path = entry_path(name, "bin");
        let record = self
            .entry(&record_path)
            .ok_or_else(|| BuildError::mismatch(format!("archive has no entry {}", record_path)))?;
        let record = codec::decode_font_record(record)?;

        match self.entry(&entry_path(name, "png")) {
            Some(png) => Ok(record.atlas.with_bitmap(png)),
            None if record.bitmap_embedded => Ok(record.atlas),
            None => Err(BuildError::mismatch(format!("font {} has no bitmap entry", name))),
        }
    }

    /// Serialize every entry to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> BuildResult<()> {
        writer.write_all(&ARCHIVE_MAGIC)?;
        writer.write_all(&ARCHIVE_VERSION.to_be_bytes())?;
        // both bounds are enforced by insert
        writer.write_all(&(self.entries.len() as u32).to_be_bytes())?;
        for (name, data) in &self.entries {
            writer.write_all(&(name.len() as u16).to_be_bytes())?;
            writer.write_all(name.as_bytes())?;
            writer.write_all(&(data.len() as u32).to_be_bytes())?;
            writer.write_all(data)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a whole archive from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> BuildResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> BuildResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let magic = reader.bytes(ARCHIVE_MAGIC.len())?;
        if magic != ARCHIVE_MAGIC {
            return Err(BuildError::mismatch(format!("bad archive magic {:02x?}", magic)));
        }
        let version = reader.u16()?;
        if version != ARCHIVE_VERSION {
            return Err(BuildError::mismatch(format!("unsupported archive version {}", version)));
        }

        let count = reader.u32()?;
        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let name_len = usize::from(reader.u16()?);
            let name = std::str::from_utf8(reader.bytes(name_len)?)
                .map_err(|err| BuildError::mismatch(format!("entry name is not UTF-8: {}", err)))?
                .to_owned();
            let data_len = reader.u32()? as usize;
            let data = reader.bytes(data_len)?.to_vec();
            if entries.contains_key(&name) {
                return Err(BuildError::mismatch(format!("duplicate archive entry {}", name)));
            }
            entries.insert(name, data);
        }
        reader.finish()?;

        tracing::debug!(entries = entries.len(), "read archive");
        Ok(Self { entries })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> BuildResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), entries = self.entries.len(), "saved sprite font archive");
        Ok(())
    }

    pub fn open(path: impl AsRef<Path>) -> BuildResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }
}

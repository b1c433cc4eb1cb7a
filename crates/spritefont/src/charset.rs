//! Expansion of character ranges into the sorted character set of an atlas.

use std::collections::BTreeSet;

use crate::chars::{CharRange, MAX_CODE_UNIT};
use crate::error::{BuildError, BuildResult};

/// The ascending, duplicate-free characters of an atlas and the position of its default character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    characters: Vec<u32>,
    default_index: usize,
}

impl CharacterSet {
    /// Expand `ranges` and `default_character` into a character set.
    ///
    /// Ranges may overlap; every codepoint is kept once. Any codepoint above
    /// [`MAX_CODE_UNIT`] is rejected rather than truncated.
    pub fn resolve(ranges: &[CharRange], default_character: u32) -> BuildResult<Self> {
        if default_character > MAX_CODE_UNIT {
            return Err(BuildError::invalid_character(format!(
                "default character U+{:04X} is above U+{:04X}",
                default_character, MAX_CODE_UNIT
            )));
        }
        if let Some(range) = ranges.iter().find(|r| r.end() > MAX_CODE_UNIT) {
            return Err(BuildError::invalid_character(format!(
                "range {} reaches above U+{:04X}",
                range, MAX_CODE_UNIT
            )));
        }

        let mut unique: BTreeSet<u32> = ranges.iter().flat_map(CharRange::chars).collect();
        unique.insert(default_character);

        let characters: Vec<u32> = unique.into_iter().collect();
        let default_index = characters
            .binary_search(&default_character)
            .map_err(|_| BuildError::invalid_character("default character missing from set"))?;

        Ok(Self {
            characters,
            default_index,
        })
    }

    pub fn characters(&self) -> &[u32] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Always false: the default character is part of every set.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn default_character(&self) -> u32 {
        self.characters[self.default_index]
    }
}

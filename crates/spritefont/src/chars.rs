//! Character ranges and their reduction to a minimal disjoint set.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{BuildError, BuildResult};

/// Largest character the glyph record can hold (one unsigned 16-bit code unit).
pub const MAX_CODE_UNIT: u32 = 0xFFFF;

/// An inclusive interval of codepoints, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharRange {
    start: u32,
    end: u32,
}

impl CharRange {
    /// Create a range, failing with [`BuildError::InvalidRange`] when `start > end`.
    pub fn new(start: u32, end: u32) -> BuildResult<Self> {
        if start > end {
            return Err(BuildError::InvalidRange {
                range: format!("{}-{}", start, end),
                reason: String::from("start > end"),
            });
        }
        Ok(Self { start, end })
    }

    /// A range holding exactly one character.
    pub fn single(character: u32) -> Self {
        Self {
            start: character,
            end: character,
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of characters in the range. Never zero.
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    pub fn contains(&self, character: u32) -> bool {
        (self.start..=self.end).contains(&character)
    }

    /// Every codepoint in the range, ascending.
    pub fn chars(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Union of the two ranges when they overlap or touch, `None` when a gap separates them.
    ///
    /// The check is symmetric, so `a.join(&b) == b.join(&a)`.
    pub fn join(&self, other: &CharRange) -> Option<CharRange> {
        let touches_from_left = other.start <= self.end.saturating_add(1);
        let touches_from_right = other.end.saturating_add(1) >= self.start;
        if !(touches_from_left && touches_from_right) {
            return None;
        }
        Some(CharRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Reduce `ranges` to a minimal set of disjoint, non-adjacent ranges.
///
/// Pairwise sweep: each range absorbs every later range it joins with, and
/// the inner scan restarts after every successful join. Passes repeat until
/// one produces no merge. Quadratic, which is fine for the tens of ranges a
/// receipt carries. The order of the result is not significant.
pub fn merge(ranges: &[CharRange]) -> Vec<CharRange> {
    let mut result = ranges.to_vec();
    loop {
        let mut merged_any = false;
        let mut i = 0;
        while i < result.len() {
            let mut j = i + 1;
            while j < result.len() {
                match result[i].join(&result[j]) {
                    Some(joined) => {
                        result[i] = joined;
                        result.remove(j);
                        merged_any = true;
                        j = i + 1;
                    }
                    None => j += 1,
                }
            }
            i += 1;
        }
        if !merged_any {
            return result;
        }
    }
}

/// Parse a range list such as `"32-126, 1024-1105\n8364"`.
///
/// Items are separated by commas or line breaks; each is a decimal codepoint
/// or an inclusive `start-end` pair. Blank items are skipped.
pub fn parse_ranges(text: &str) -> BuildResult<Vec<CharRange>> {
    text.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_range)
        .collect()
}

fn parse_range(item: &str) -> BuildResult<CharRange> {
    match item.split_once('-') {
        Some((start, end)) => {
            let start = parse_code_unit(item, start)?;
            let end = parse_code_unit(item, end)?;
            CharRange::new(start, end).map_err(|_| BuildError::InvalidRange {
                range: item.to_string(),
                reason: String::from("start > end"),
            })
        }
        None => Ok(CharRange::single(parse_code_unit(item, item)?)),
    }
}

fn parse_code_unit(item: &str, value: &str) -> BuildResult<u32> {
    let value: u32 = value.trim().parse().map_err(|_| BuildError::InvalidRange {
        range: item.to_string(),
        reason: format!("'{}' is not a decimal codepoint", value.trim()),
    })?;
    if value > MAX_CODE_UNIT {
        return Err(BuildError::invalid_character(format!(
            "{} in '{}' is above U+{:04X}",
            value, item, MAX_CODE_UNIT
        )));
    }
    Ok(value)
}

/// Parse user input naming the default character: exactly one character, 16-bit.
pub fn parse_default_character(text: &str) -> BuildResult<u32> {
    let mut chars = text.chars();
    let (Some(character), None) = (chars.next(), chars.next()) else {
        return Err(BuildError::invalid_character(format!(
            "expected exactly one default character, got '{}'",
            text
        )));
    };
    let code = u32::from(character);
    if code > MAX_CODE_UNIT {
        return Err(BuildError::invalid_character(format!(
            "default character U+{:04X} is above U+{:04X}",
            code, MAX_CODE_UNIT
        )));
    }
    Ok(code)
}

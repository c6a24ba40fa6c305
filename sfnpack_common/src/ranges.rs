use crate::blocks::{Block, BlockTable};
use std::fmt;

/// Ranges that are always included in the minimized font, whether or not the corpus uses them.
///
/// These are heuristic patches for characters the block scan does not pick up: Hangul
/// Compatibility Jamo and Katakana Phonetic Extensions.
pub const EXTRA_RANGES: &[CodepointRange] = &[
    CodepointRange { start: 0x3130, end: 0x318F },
    CodepointRange { start: 0x31F0, end: 0x31FF },
];

/// The range passed to the converter before every other range. Also a heuristic patch, it
/// reserves the glyph for code point 0.
pub const RESERVED_RANGE: CodepointRange = CodepointRange { start: 0, end: 0 };

/// An inclusive range of code points, as passed to `sfnconv -r`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CodepointRange {
    pub start: u32,
    pub end: u32,
}
impl CodepointRange {
    pub const fn new(start: u32, end: u32) -> Self {
        CodepointRange { start, end }
    }

    /// Returns the range for a block, clamped so that no control characters are requested.
    pub fn clamped(start: u32, end: u32) -> Self {
        let start = if start < 0x20 {
            0x20
        } else if start == 0x80 {
            0xA0
        } else {
            start
        };
        let end = if end == 0x7F { 0x7E } else { end };
        CodepointRange { start, end }
    }

    pub fn from_block(block: &Block) -> Self {
        Self::clamped(block.start, block.end)
    }

    /// Returns the two arguments used to pass this range on the command line.
    pub fn to_args(&self) -> [String; 2] {
        [format!("{:#x}", self.start), format!("{:#x}", self.end)]
    }
}
impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}..U+{:04X}", self.start, self.end)
    }
}

/// The list of ranges extracted from the bulk font, excluding [`RESERVED_RANGE`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RangeList {
    ranges: Vec<CodepointRange>,
}
impl RangeList {
    /// Builds the range list from every used block in table order, followed by
    /// [`EXTRA_RANGES`].
    pub fn from_blocks(table: &BlockTable) -> Self {
        let mut ranges: Vec<_> = table.used_blocks().map(CodepointRange::from_block).collect();
        ranges.extend_from_slice(EXTRA_RANGES);
        RangeList { ranges }
    }

    pub fn ranges(&self) -> &[CodepointRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

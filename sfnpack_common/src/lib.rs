//! The host-side data structures used by `sfnpack` to turn a bulk unifont into a minimized glyph
//! container embedded in a C header.
//!
//! The pipeline itself lives in `sfnpack_tool`. This crate only contains the pieces that do not
//! need to spawn processes:
//!
//! * `blocks` parses a `Blocks.txt` style table and tallies how often each block is used by a
//!   text corpus.
//! * `ranges` turns the used blocks into the range arguments passed to `sfnconv`.
//! * `container` and `header` read the produced glyph container and render it as a header.
//! * `cache`, `hashes` and `manifest` handle the on-disk configuration and the container cache.
//!
//! Not public API.

pub mod blocks;
pub mod cache;
pub mod container;
pub mod hashes;
pub mod header;
pub mod manifest;
pub mod ranges;

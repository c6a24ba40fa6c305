use anyhow::*;
use flate2::read::GzDecoder;
use std::{error, fmt, io, path::Path};

/// The length of the gzip header at the start of every glyph container.
pub const HEADER_LEN: usize = 10;

/// Returned when a glyph container is too short to even contain its header.
#[derive(Debug)]
pub struct ContainerTooShort {
    pub len: usize,
}
impl fmt::Display for ContainerTooShort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "glyph container is {} bytes long, expected at least {HEADER_LEN}", self.len)
    }
}
impl error::Error for ContainerTooShort {}

/// A compressed glyph container as produced by `sfnconv`.
///
/// The contents are treated as opaque: only the gzip framing is ever looked at.
#[derive(Clone)]
pub struct GlyphContainer {
    data: Vec<u8>,
}
impl GlyphContainer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(ContainerTooShort { len: data.len() }.into());
        }
        Ok(GlyphContainer { data })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Could not read glyph container '{}'", path.display()))?;
        Self::from_bytes(data)
            .with_context(|| format!("Invalid glyph container '{}'", path.display()))
    }

    /// Returns the full contents of the container, including the header.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the contents of the container following the gzip header.
    pub fn payload(&self) -> &[u8] {
        &self.data[HEADER_LEN..]
    }

    /// Returns the length of the container once fully decompressed.
    pub fn decompressed_len(&self) -> Result<u64> {
        let mut decoder = GzDecoder::new(self.data.as_slice());
        let len = io::copy(&mut decoder, &mut io::sink())
            .context("Could not decompress glyph container")?;
        Ok(len)
    }
}
impl fmt::Debug for GlyphContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Length(usize);
        impl fmt::Debug for Length {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[{} bytes]", self.0)
            }
        }
        f.debug_struct("GlyphContainer")
            .field("data", &Length(self.data.len()))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::container::{ContainerTooShort, GlyphContainer, HEADER_LEN};
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_payload_and_size() {
        let raw = b"SFN2".repeat(100);
        let compressed = gzip(&raw);
        let container = GlyphContainer::from_bytes(compressed.clone()).unwrap();

        assert_eq!(container.payload().len(), compressed.len() - HEADER_LEN);
        assert_eq!(container.payload(), &compressed[HEADER_LEN..]);
        assert_eq!(container.decompressed_len().unwrap(), raw.len() as u64);
    }

    #[test]
    fn test_too_short() {
        let err = GlyphContainer::from_bytes(vec![0x1F, 0x8B, 8]).unwrap_err();
        assert_eq!(err.downcast_ref::<ContainerTooShort>().unwrap().len, 3);
    }

    #[test]
    fn test_not_gzip() {
        let container = GlyphContainer::from_bytes(vec![0; 32]).unwrap();
        assert!(container.decompressed_len().is_err());
    }

    #[test]
    fn test_header_only() {
        let container = GlyphContainer::from_bytes(gzip(b"")[..HEADER_LEN].to_vec()).unwrap();
        assert!(container.payload().is_empty());
    }
}

use crate::container::GlyphContainer;
use anyhow::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The names of the symbols defined in the generated header.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderSymbols {
    pub size_symbol: String,
    pub array_symbol: String,
}
impl Default for HeaderSymbols {
    fn default() -> Self {
        HeaderSymbols {
            size_symbol: "UNIFONT_SIZE".to_string(),
            array_symbol: "unifont".to_string(),
        }
    }
}
impl HeaderSymbols {
    pub fn check(&self) -> Result<()> {
        ensure!(is_c_identifier(&self.size_symbol), "Invalid size symbol: {:?}", self.size_symbol);
        ensure!(
            is_c_identifier(&self.array_symbol),
            "Invalid array symbol: {:?}",
            self.array_symbol
        );
        Ok(())
    }
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Renders the C header embedding a glyph container.
///
/// The array only contains the payload after the gzip header, while the size constant is the
/// length of the fully decompressed font, as returned by [`GlyphContainer::decompressed_len`].
/// Loaders are expected to inflate the array as raw deflate data into a buffer of that size.
pub fn render_header(
    container: &GlyphContainer,
    decompressed_len: u64,
    symbols: &HeaderSymbols,
) -> Result<String> {
    symbols.check()?;

    let payload = container.payload();

    let mut accum = String::with_capacity(payload.len() * 4 + 64);
    writeln!(accum, "#define {} {decompressed_len}", symbols.size_symbol)?;
    write!(accum, "unsigned char {}[{}] = {{ ", symbols.array_symbol, payload.len())?;
    for (i, byte) in payload.iter().enumerate() {
        if i != 0 {
            accum.push(',');
        }
        write!(accum, "{byte}")?;
    }
    accum.push_str(" };\r\n");
    Ok(accum)
}

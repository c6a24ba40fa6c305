use crate::{cache::CacheMode, header::HeaderSymbols};
use anyhow::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default name of the manifest file looked for in the working directory.
pub const DEFAULT_MANIFEST: &str = "sfnpack.toml";

/// The locations of every file read or written while building the header.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcePaths {
    /// The Unicode block table, in the format of the UCD `Blocks.txt`.
    pub blocks: PathBuf,
    /// The text scanned for used characters.
    pub corpus: PathBuf,
    /// The bulk font the glyphs are extracted from.
    pub font: PathBuf,
    /// The `sfnconv` executable.
    pub converter: PathBuf,
    /// The full conversion of the bulk font, deleted once the minimized container is built.
    pub intermediate: PathBuf,
    /// The minimized glyph container, kept between runs.
    pub container: PathBuf,
    /// The generated C header.
    pub header: PathBuf,
}
impl Default for ResourcePaths {
    fn default() -> Self {
        ResourcePaths {
            blocks: "Blocks.txt".into(),
            corpus: "../lang.c".into(),
            font: "unifont-15.0.01.bdf.gz".into(),
            converter: "./sfnconv".into(),
            intermediate: "tmp.sfn".into(),
            container: "unifont.sfn".into(),
            header: "unifont.h".into(),
        }
    }
}
impl ResourcePaths {
    /// Resolves every relative path against the given directory.
    pub fn resolve(mut self, base: &Path) -> Self {
        for path in [
            &mut self.blocks,
            &mut self.corpus,
            &mut self.font,
            &mut self.converter,
            &mut self.intermediate,
            &mut self.container,
            &mut self.header,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorManifest {
    pub paths: ResourcePaths,
    pub header: HeaderSymbols,
    pub cache: CacheMode,
}
impl GeneratorManifest {
    pub fn parse(data: &str) -> Result<GeneratorManifest> {
        let manifest = toml::from_str::<GeneratorManifest>(data)?;
        manifest.header.check()?;
        Ok(manifest)
    }

    /// Loads a manifest from disk, resolving its paths relative to the manifest's directory.
    pub fn load(path: &Path) -> Result<GeneratorManifest> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest '{}'", path.display()))?;
        let mut manifest = GeneratorManifest::parse(&data)
            .with_context(|| format!("Could not parse manifest '{}'", path.display()))?;
        let base = path.parent().unwrap_or(Path::new("."));
        manifest.paths = manifest.paths.resolve(base);
        Ok(manifest)
    }

    /// Loads the manifest at the given path, or the default manifest if it exists, or falls back
    /// to the built-in defaults.
    pub fn find(path: Option<&Path>) -> Result<GeneratorManifest> {
        match path {
            Some(path) => GeneratorManifest::load(path),
            None if Path::new(DEFAULT_MANIFEST).is_file() => {
                GeneratorManifest::load(Path::new(DEFAULT_MANIFEST))
            }
            None => Ok(GeneratorManifest::default()),
        }
    }
}

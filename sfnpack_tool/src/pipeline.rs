use crate::converter::{full_conversion_args, minimize_args, GlyphConverter};
use anyhow::*;
use derive_setters::Setters;
use log::{debug, info, warn};
use sfnpack_common::{
    blocks::BlockTable,
    cache::{self, CacheMode},
    container::GlyphContainer,
    hashes::InputDigest,
    header::{render_header, HeaderSymbols},
    manifest::{GeneratorManifest, ResourcePaths},
    ranges::RangeList,
};
use std::{fmt::Write, fs, path::Path};

#[derive(Clone, Debug, Setters)]
pub struct GenerateConfig {
    #[setters(skip)]
    paths: ResourcePaths,
    symbols: HeaderSymbols,
    cache: CacheMode,
    force: bool,
}
impl GenerateConfig {
    pub fn new(paths: ResourcePaths) -> Self {
        GenerateConfig {
            paths,
            symbols: HeaderSymbols::default(),
            cache: CacheMode::default(),
            force: false,
        }
    }

    pub fn from_manifest(manifest: GeneratorManifest) -> Self {
        GenerateConfig::new(manifest.paths)
            .symbols(manifest.header)
            .cache(manifest.cache)
    }
}

/// What a run of [`generate`] did.
#[derive(Clone, Debug)]
pub struct GenerateReport {
    /// Whether the cached container was reused.
    pub cache_hit: bool,
    /// The number of blocks used by the corpus, if the corpus was scanned.
    pub used_blocks: Option<usize>,
    /// The number of ranges passed to the converter, if it was run.
    pub ranges: Option<usize>,
    pub container_len: usize,
    pub payload_len: usize,
    pub decompressed_len: u64,
}
impl GenerateReport {
    /// Prints statistics about the run using the `log` crate.
    pub fn print_statistics(&self) {
        fn or_skipped(value: Option<usize>) -> String {
            match value {
                Some(x) => x.to_string(),
                None => "<skipped>".to_string(),
            }
        }

        info!("");
        info!("==================================================================");
        info!("Statistics");
        info!("==================================================================");
        info!("Cache          : {}", if self.cache_hit { "hit" } else { "rebuilt" });
        info!("Used Blocks    : {}", or_skipped(self.used_blocks));
        info!("Ranges         : {}", or_skipped(self.ranges));
        info!("Container Size : {:.1} KiB", self.container_len as f32 / 1024.0);
        info!("Array Length   : {} bytes", self.payload_len);
        info!("Font Size      : {:.1} KiB", self.decompressed_len as f32 / 1024.0);
        info!("==================================================================");
        info!("");
    }
}

/// Parses the block table and counts the blocks used by the corpus.
pub fn scan_blocks(paths: &ResourcePaths) -> Result<(BlockTable, RangeList)> {
    info!("Checking multibyte characters to get Unicode ranges...");
    let blocks = fs::read_to_string(&paths.blocks)
        .with_context(|| format!("Could not read block table '{}'", paths.blocks.display()))?;
    let corpus = fs::read(&paths.corpus)
        .with_context(|| format!("Could not read corpus '{}'", paths.corpus.display()))?;

    let mut table = BlockTable::parse(&blocks);
    debug!("Parsed {} blocks.", table.len());
    table.tally_bytes(&corpus);

    let ranges = RangeList::from_blocks(&table);
    Ok((table, ranges))
}

/// Renders a human readable description of the used blocks and the resulting ranges.
pub fn describe_ranges(table: &BlockTable, ranges: &RangeList) -> Result<String> {
    let mut accum = String::new();
    writeln!(accum, "Used blocks:")?;
    for block in table.used_blocks() {
        writeln!(
            accum,
            "  {:04X}..{:04X} {} ({} characters)",
            block.start, block.end, block.name, block.usage
        )?;
    }
    writeln!(accum, "Ranges:")?;
    for range in ranges.ranges() {
        let [start, end] = range.to_args();
        writeln!(accum, "  {start} {end}")?;
    }
    Ok(accum)
}

fn input_digest(paths: &ResourcePaths) -> Result<InputDigest> {
    let read = |path: &Path| {
        fs::read(path).with_context(|| format!("Could not read '{}'", path.display()))
    };
    Ok(InputDigest::new(&read(&paths.blocks)?, &read(&paths.corpus)?, &read(&paths.font)?))
}

fn build_container(
    paths: &ResourcePaths,
    converter: &dyn GlyphConverter,
    ranges: &RangeList,
) -> Result<()> {
    info!("Converting '{}'...", paths.font.display());
    let converted = converter
        .convert(&full_conversion_args(&paths.font, &paths.intermediate))
        .and_then(|_| {
            info!("Extracting {} ranges to '{}'...", ranges.len(), paths.container.display());
            converter.convert(&minimize_args(&paths.intermediate, ranges, &paths.container))
        });

    let removed = if paths.intermediate.exists() {
        debug!("Removing intermediate container: {}", paths.intermediate.display());
        fs::remove_file(&paths.intermediate).with_context(|| {
            format!("Could not remove intermediate '{}'", paths.intermediate.display())
        })
    } else {
        Ok(())
    };

    // the conversion error takes priority over a failed cleanup
    if let (Err(_), Err(e)) = (&converted, &removed) {
        warn!("{e:#}");
    }
    converted?;
    removed
}

/// Writes the header for an existing glyph container, returning the container and its
/// decompressed length.
pub fn write_header(
    container_path: &Path,
    header_path: &Path,
    symbols: &HeaderSymbols,
) -> Result<(GlyphContainer, u64)> {
    info!("Writing header '{}'...", header_path.display());
    let container = GlyphContainer::load(container_path)?;
    let decompressed_len = container
        .decompressed_len()
        .with_context(|| format!("Could not decompress '{}'", container_path.display()))?;
    let header = render_header(&container, decompressed_len, symbols)?;
    fs::write(header_path, header)
        .with_context(|| format!("Could not write header '{}'", header_path.display()))?;
    Ok((container, decompressed_len))
}

/// Builds the minimized glyph container if needed, then writes the header embedding it.
pub fn generate(config: &GenerateConfig, converter: &dyn GlyphConverter) -> Result<GenerateReport> {
    let paths = &config.paths;
    let mode = if config.force { CacheMode::Disabled } else { config.cache };

    let digest = match config.cache {
        CacheMode::ContentHash => match input_digest(paths) {
            std::result::Result::Ok(digest) => Some(digest),
            Err(e) if paths.container.is_file() => {
                warn!("{e:#}");
                None
            }
            Err(e) => return Err(e),
        },
        _ => None,
    };
    let cache_hit = cache::is_fresh(mode, &paths.container, digest.as_ref())?;

    let mut used_blocks = None;
    let mut range_count = None;
    if cache_hit {
        info!("Reusing cached container '{}'.", paths.container.display());
    } else {
        let (table, ranges) = scan_blocks(paths)?;
        used_blocks = Some(table.used_blocks().count());
        range_count = Some(ranges.len());

        cache::invalidate(&paths.container)?;
        build_container(paths, converter, &ranges)?;
        if let Some(digest) = &digest {
            cache::record(config.cache, &paths.container, digest)?;
        }
    }

    let (container, decompressed_len) =
        write_header(&paths.container, &paths.header, &config.symbols)?;
    Ok(GenerateReport {
        cache_hit,
        used_blocks,
        ranges: range_count,
        container_len: container.data().len(),
        payload_len: container.payload().len(),
        decompressed_len,
    })
}

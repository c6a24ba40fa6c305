use anyhow::*;
use clap::{Parser, Subcommand};
use sfnpack_common::{header::HeaderSymbols, manifest::GeneratorManifest};
use std::{path::PathBuf, result::Result::Ok};

mod converter;
mod pipeline;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds the minimized glyph container and the header embedding it
    Generate {
        /// The manifest to load, instead of `sfnpack.toml` in the working directory
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Rebuilds the glyph container even if the cached one is up to date
        #[arg(long)]
        force: bool,
    },
    /// Prints the blocks used by the corpus and the ranges passed to the converter
    Ranges {
        /// The manifest to load, instead of `sfnpack.toml` in the working directory
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Writes a header for an existing glyph container
    Header {
        container: PathBuf,
        output: PathBuf,
        #[arg(long)]
        size_symbol: Option<String>,
        #[arg(long)]
        array_symbol: Option<String>,
    },
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { manifest, force } => {
            let manifest = GeneratorManifest::find(manifest.as_deref())?;
            let converter = converter::Sfnconv::new(manifest.paths.converter.clone());
            let config = pipeline::GenerateConfig::from_manifest(manifest).force(force);
            pipeline::generate(&config, &converter)?.print_statistics();
        }
        Commands::Ranges { manifest } => {
            let manifest = GeneratorManifest::find(manifest.as_deref())?;
            let (table, ranges) = pipeline::scan_blocks(&manifest.paths)?;
            print!("{}", pipeline::describe_ranges(&table, &ranges)?);
        }
        Commands::Header { container, output, size_symbol, array_symbol } => {
            let mut symbols = HeaderSymbols::default();
            if let Some(size_symbol) = size_symbol {
                symbols.size_symbol = size_symbol;
            }
            if let Some(array_symbol) = array_symbol {
                symbols.array_symbol = array_symbol;
            }
            pipeline::write_header(&container, &output, &symbols)?;
        }
    }
    Ok(())
}
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error encountered: {:?}", e);
            std::process::exit(1);
        }
    }
}

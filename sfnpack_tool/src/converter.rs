use anyhow::*;
use log::debug;
use sfnpack_common::ranges::{RangeList, RESERVED_RANGE};
use std::{
    error,
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

/// Returned when the glyph converter ran, but reported a failure.
#[derive(Debug)]
pub struct ConversionFailed {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub status: ExitStatus,
    pub stderr: String,
}
impl fmt::Display for ConversionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        write!(f, " failed with {}", self.status)?;
        if !self.stderr.trim().is_empty() {
            write!(f, ": {}", self.stderr.trim())?;
        }
        std::result::Result::Ok(())
    }
}
impl error::Error for ConversionFailed {}

/// Something that can run a glyph conversion given `sfnconv` style arguments.
pub trait GlyphConverter {
    fn convert(&self, args: &[OsString]) -> Result<()>;
}

/// Runs the `sfnconv` executable from the scalable-font2 project.
#[derive(Clone, Debug)]
pub struct Sfnconv {
    executable: PathBuf,
}
impl Sfnconv {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Sfnconv { executable: executable.into() }
    }
}
impl GlyphConverter for Sfnconv {
    fn convert(&self, args: &[OsString]) -> Result<()> {
        debug!("Running {} with arguments: {args:?}", self.executable.display());
        let output = Command::new(&self.executable)
            .args(args)
            .output()
            .with_context(|| format!("Could not run '{}'", self.executable.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("converter output: {}", stdout.trim());
        }

        if !output.status.success() {
            return Err(ConversionFailed {
                program: self.executable.clone(),
                args: args.to_vec(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Arguments for converting the whole bulk font into an intermediate container.
pub fn full_conversion_args(font: &Path, intermediate: &Path) -> Vec<OsString> {
    vec![font.into(), intermediate.into()]
}

/// Arguments for extracting the given ranges from the intermediate container.
///
/// Every range is followed by the file it is taken from, and the reserved range always comes
/// first.
pub fn minimize_args(intermediate: &Path, ranges: &RangeList, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-S".into(), "code".into(), "-p".into()];

    let reserved = RESERVED_RANGE;
    args.push("-r".into());
    args.push(reserved.start.to_string().into());
    args.push(reserved.end.to_string().into());
    args.push(intermediate.into());

    for range in ranges.ranges() {
        let [start, end] = range.to_args();
        args.push("-r".into());
        args.push(start.into());
        args.push(end.into());
        args.push(intermediate.into());
    }

    args.push(output.into());
    args
}

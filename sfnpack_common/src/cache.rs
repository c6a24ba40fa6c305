//! Decides whether the minimized glyph container on disk can be reused.
//!
//! In [`CacheMode::ContentHash`] mode, a stamp file is written next to the container holding the
//! digest of the inputs it was built from. The container is only reused if the stamp matches the
//! current inputs. If the inputs can't be read at all, an existing container is reused as-is.

use crate::hashes::InputDigest;
use anyhow::*;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Reuse the container if it was built from identical inputs.
    #[default]
    ContentHash,
    /// Reuse the container whenever it exists.
    Presence,
    /// Always rebuild the container.
    Disabled,
}

/// Returns the path of the stamp file for a given container.
pub fn stamp_path(container: &Path) -> PathBuf {
    let mut name = container.as_os_str().to_os_string();
    name.push(".hash");
    PathBuf::from(name)
}

/// Checks whether the container at the given path can be reused.
///
/// `digest` is the digest of the current inputs, or `None` if they could not be read.
pub fn is_fresh(
    mode: CacheMode,
    container: &Path,
    digest: Option<&InputDigest>,
) -> Result<bool> {
    if !container.is_file() {
        debug!("No cached container at '{}'", container.display());
        return Ok(false);
    }

    match mode {
        CacheMode::Disabled => Ok(false),
        CacheMode::Presence => Ok(true),
        CacheMode::ContentHash => {
            let Some(digest) = digest else {
                warn!("Inputs unavailable, reusing '{}' without checking it.", container.display());
                return Ok(true);
            };

            let stamp = stamp_path(container);
            if !stamp.is_file() {
                info!("Cached container has no stamp file, rebuilding.");
                return Ok(false);
            }

            let stored = fs::read_to_string(&stamp)
                .with_context(|| format!("Could not read stamp file '{}'", stamp.display()))?;
            let fresh = stored.trim() == digest.to_hex();
            if !fresh {
                info!("Inputs changed since the cached container was built, rebuilding.");
            }
            Ok(fresh)
        }
    }
}

/// Removes the stamp file for a container that is about to be rebuilt.
pub fn invalidate(container: &Path) -> Result<()> {
    let stamp = stamp_path(container);
    if stamp.exists() {
        fs::remove_file(&stamp)
            .with_context(|| format!("Could not remove stamp file '{}'", stamp.display()))?;
    }
    Ok(())
}

/// Records that the container at the given path was built from the given inputs.
pub fn record(mode: CacheMode, container: &Path, digest: &InputDigest) -> Result<()> {
    if mode == CacheMode::ContentHash {
        let stamp = stamp_path(container);
        debug!("Writing stamp file: {}", stamp.display());
        fs::write(&stamp, format!("{}\n", digest.to_hex()))
            .with_context(|| format!("Could not write stamp file '{}'", stamp.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{
        cache::{invalidate, is_fresh, record, stamp_path, CacheMode},
        hashes::InputDigest,
    };
    use std::{fs, path::Path};

    #[test]
    fn test_stamp_path() {
        assert_eq!(stamp_path(Path::new("out/unifont.sfn")), Path::new("out/unifont.sfn.hash"));
    }

    #[test]
    fn test_missing_container() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        let digest = InputDigest::new(b"a", b"b", b"c");

        for mode in [CacheMode::ContentHash, CacheMode::Presence, CacheMode::Disabled] {
            assert!(!is_fresh(mode, &container, Some(&digest)).unwrap());
            assert!(!is_fresh(mode, &container, None).unwrap());
        }
    }

    #[test]
    fn test_presence() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        fs::write(&container, b"cached").unwrap();

        let digest = InputDigest::new(b"a", b"b", b"c");
        assert!(is_fresh(CacheMode::Presence, &container, Some(&digest)).unwrap());
        assert!(!is_fresh(CacheMode::Disabled, &container, Some(&digest)).unwrap());
        assert!(!is_fresh(CacheMode::ContentHash, &container, Some(&digest)).unwrap());
    }

    #[test]
    fn test_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        fs::write(&container, b"cached").unwrap();

        let digest = InputDigest::new(b"a", b"b", b"c");
        record(CacheMode::ContentHash, &container, &digest).unwrap();
        assert!(is_fresh(CacheMode::ContentHash, &container, Some(&digest)).unwrap());

        let changed = InputDigest::new(b"a", b"b", b"d");
        assert!(!is_fresh(CacheMode::ContentHash, &container, Some(&changed)).unwrap());
    }

    #[test]
    fn test_content_hash_without_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        fs::write(&container, b"cached").unwrap();

        // no stamp and no digest, the container is all there is
        assert!(is_fresh(CacheMode::ContentHash, &container, None).unwrap());
        assert!(is_fresh(CacheMode::Presence, &container, None).unwrap());
        assert!(!is_fresh(CacheMode::Disabled, &container, None).unwrap());
    }

    #[test]
    fn test_record_other_modes() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        let digest = InputDigest::new(b"a", b"b", b"c");

        record(CacheMode::Presence, &container, &digest).unwrap();
        record(CacheMode::Disabled, &container, &digest).unwrap();
        assert!(!stamp_path(&container).exists());
    }

    #[test]
    fn test_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("unifont.sfn");
        fs::write(&container, b"cached").unwrap();

        let digest = InputDigest::new(b"a", b"b", b"c");
        record(CacheMode::ContentHash, &container, &digest).unwrap();
        invalidate(&container).unwrap();
        assert!(!is_fresh(CacheMode::ContentHash, &container, Some(&digest)).unwrap());

        // nothing to remove the second time around
        invalidate(&container).unwrap();
    }
}

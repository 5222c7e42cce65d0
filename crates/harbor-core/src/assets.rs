//! Static asset resolution
//!
//! Templates ship with the operator. By default they are compiled into the
//! binary; a directory can be configured instead so that an image can carry
//! patched assets without a rebuild.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::debug;

/// Path of the Harbor Core configuration template
pub const CORE_CONFIG_TEMPLATE_PATH: &str = "/assets/templates/core/app.conf";

/// Embedded assets as (path, content) pairs
const EMBEDDED_ASSETS: &[(&str, &[u8])] = &[(
    CORE_CONFIG_TEMPLATE_PATH,
    include_bytes!("../assets/templates/core/app.conf"),
)];

/// Trait for opening packaged assets by path
///
/// Abstracted so tests can count reads and inject failures.
#[cfg_attr(test, automock)]
pub trait AssetResolver: Send + Sync {
    /// Open the asset at `path`
    ///
    /// Returns `io::ErrorKind::NotFound` when no asset exists at that path.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;
}

/// Assets compiled into the operator binary
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    /// Create a resolver over the embedded asset table
    pub fn new() -> Self {
        Self
    }
}

impl AssetResolver for EmbeddedAssets {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        EMBEDDED_ASSETS
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, content)| Box::new(Cursor::new(*content)) as Box<dyn Read + Send>)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no embedded asset at {}", path),
                )
            })
    }
}

/// Assets read from a directory on disk
///
/// Asset paths are resolved relative to `root`, so `/assets/templates/x`
/// maps to `<root>/assets/templates/x`.
#[derive(Clone, Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Create a resolver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory assets are resolved from
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetResolver for DirectoryAssets {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let resolved = self.resolve(path);
        debug!(asset = %path, file = %resolved.display(), "opening asset from directory");
        let file = File::open(&resolved)?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(resolver: &dyn AssetResolver, path: &str) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        resolver.open(path)?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    // ==========================================================================
    // Story: Embedded assets
    // ==========================================================================

    #[test]
    fn when_core_template_requested_embedded_bytes_are_returned() {
        let bytes = read_all(&EmbeddedAssets::new(), CORE_CONFIG_TEMPLATE_PATH).unwrap();
        assert_eq!(
            bytes,
            include_bytes!("../assets/templates/core/app.conf").to_vec()
        );
        assert!(String::from_utf8(bytes).unwrap().contains("appname = Harbor"));
    }

    #[test]
    fn when_path_unknown_embedded_lookup_is_not_found() {
        let err = read_all(&EmbeddedAssets::new(), "/assets/templates/missing.conf").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/assets/templates/missing.conf"));
    }

    // ==========================================================================
    // Story: Directory assets
    // ==========================================================================

    #[test]
    fn when_reading_from_directory_leading_slash_is_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let template_dir = dir.path().join("assets/templates/core");
        std::fs::create_dir_all(&template_dir).unwrap();
        std::fs::write(template_dir.join("app.conf"), b"appname = Patched\n").unwrap();

        let resolver = DirectoryAssets::new(dir.path());
        assert_eq!(resolver.root(), dir.path());

        let bytes = read_all(&resolver, CORE_CONFIG_TEMPLATE_PATH).unwrap();
        assert_eq!(bytes, b"appname = Patched\n");
    }

    #[test]
    fn when_file_missing_directory_lookup_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryAssets::new(dir.path());
        let err = read_all(&resolver, CORE_CONFIG_TEMPLATE_PATH).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

//! Mapping request paths onto files under the served root.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::ResourceSize;

/// Default document for `/`.
pub const INDEX_FILE: &str = "index.html";

/// Resolves request paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    /// Serve files from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Served root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location for a request path.
    ///
    /// `None` for the empty (unparsable) path and for paths that would leave
    /// the root through `..` or an absolute component.
    #[must_use]
    pub fn locate(&self, request_path: &str) -> Option<PathBuf> {
        if request_path.is_empty() {
            return None;
        }
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        let relative = if relative.is_empty() { INDEX_FILE } else { relative };

        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Size of the resource behind `request_path`, resolved once.
    ///
    /// Anything that is not an existing regular file is `Missing`.
    #[must_use]
    pub fn resolve(&self, request_path: &str) -> ResourceSize {
        self.locate(request_path)
            .and_then(|path| fs::metadata(path).ok())
            .filter(fs::Metadata::is_file)
            .map_or(ResourceSize::Missing, |meta| ResourceSize::Bytes(meta.len()))
    }
}

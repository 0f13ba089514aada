//! Document discovery for directory indexing.
//!
//! Recursively collects files whose extension is one of the
//! configured document types. Hidden directories, glob-excluded
//! paths and oversized files are skipped; unreadable entries are
//! logged and passed over.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocragError, Result};

/// Finds candidate documents under a directory
pub struct DocumentWalker {
    /// Lowercased extensions without the leading dot
    extensions: Vec<String>,

    exclude_patterns: Vec<Pattern>,

    max_file_size_bytes: u64,
}

impl DocumentWalker {
    /// Create a walker.
    ///
    /// Extensions are matched case-insensitively; a leading dot is
    /// accepted and ignored. Fails on an invalid exclude glob.
    pub fn new(
        extensions: &[String],
        exclude_patterns: &[String],
        max_file_size_mb: usize,
    ) -> Result<Self> {
        let extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        let exclude = exclude_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    DocragError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions,
            exclude_patterns: exclude,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect matching files under `root`, sorted by path.
    ///
    /// Fails when `root` is not a directory.
    pub fn collect_documents(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(DocragError::ExtractionFailed(format!(
                "Directory not found: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.has_document_extension(path) || self.is_excluded(path) {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.max_file_size_bytes {
                    tracing::warn!(
                        "Skipping large file: {:?} ({} bytes)",
                        path,
                        metadata.len()
                    );
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        tracing::debug!("Discovered {} documents under {:?}", files.len(), root);
        Ok(files)
    }

    /// Whether `path` carries one of the configured extensions
    pub fn has_document_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|ext| *ext == e)
            })
            .unwrap_or(false)
    }

    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);

        !hidden && !self.is_excluded(path)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_patterns.iter().any(|p| p.matches_path(path))
    }
}

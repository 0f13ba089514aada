// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bytes that no UTF-8 decoder accepts; a `.txt` file holding them fails extraction
#[allow(dead_code)]
pub const INVALID_UTF8: &[u8] = &[0xff, 0xfe, 0xfd, b'x'];

/// Synthetic document collection on disk
#[allow(dead_code)] // Used in integration tests
pub struct TestLibrary {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

#[allow(dead_code)]
impl TestLibrary {
    /// Three readable notes on distinct topics
    pub fn notes() -> Self {
        Self::with_files(&[
            (
                "astronomy.txt",
                "The telescope observed a distant galaxy. Spectral lines showed a strong redshift, \
                 which places the galaxy billions of light years away.",
            ),
            (
                "cooking.txt",
                "Knead the bread dough for ten minutes, then let it rise in a warm kitchen until \
                 it doubles in size. Bake the loaf at a high oven temperature.",
            ),
            (
                "gardening.txt",
                "Tomato plants need full sun and regular watering. Prune the side shoots so the \
                 plant puts its energy into the fruit.",
            ),
        ])
    }

    /// Five documents of which two cannot be decoded
    pub fn with_broken_documents() -> Self {
        let mut library = Self::notes();
        library.add_bytes("broken_a.txt", INVALID_UTF8);
        library.add_bytes("nested/broken_b.txt", INVALID_UTF8);
        library
    }

    /// Create with custom text files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let mut library = Self {
            dir: TempDir::new().unwrap(),
            files: Vec::new(),
        };
        for (path, content) in files {
            library.add_bytes(path, content.as_bytes());
        }
        library
    }

    /// Write raw bytes to `rel_path` and remember the file
    pub fn add_bytes(&mut self, rel_path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(rel_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        self.files.push(full_path.clone());
        full_path
    }

    /// Overwrite an existing file
    pub fn rewrite(&self, rel_path: &str, content: &str) {
        std::fs::write(self.dir.path().join(rel_path), content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel_path: &str) -> PathBuf {
        self.dir.path().join(rel_path)
    }
}

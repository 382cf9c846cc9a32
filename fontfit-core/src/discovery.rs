//! Filesystem font discovery for fontfit-core

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

/// Path to a candidate font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFileRef {
    pub path: PathBuf,
}

/// Trait for enumerating font files from some backing store.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<FontFileRef>>;
}

/// Recursive filesystem walker that collects `.ttf`/`.otf` files.
///
/// Roots that do not exist are skipped with a warning rather than failing
/// the walk; a missing directory simply contributes zero fonts.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FontDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<FontFileRef>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                log::warn!("font directory '{}' does not exist", root.display());
                continue;
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if entry.file_type().is_file() && is_font(entry.path()) {
                    found.push(FontFileRef {
                        path: entry.path().to_path_buf(),
                    });
                }
            }
        }

        Ok(found)
    }
}

fn is_font(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    matches!(ext.as_str(), "ttf" | "otf")
}

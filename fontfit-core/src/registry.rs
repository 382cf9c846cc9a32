//! Explicit font registry for fontfit-core
//!
//! The registry replaces the process-wide font manager of typical plotting
//! stacks with an owned value: callers (and tests) construct as many
//! isolated registries as they like. Registration is additive only.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use read_fonts::tables::name::NameId;
use read_fonts::{FontRef, TableProvider};

use crate::discovery::{FontDiscovery, PathDiscovery};

/// A registered font face: display name plus the raw font bytes.
#[derive(Debug, Clone)]
pub struct RegisteredFace {
    name: String,
    path: PathBuf,
    data: Arc<Vec<u8>>,
}

impl RegisteredFace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Registry of font faces known to one probing session.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    faces: Vec<RegisteredFace>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn faces(&self) -> &[RegisteredFace] {
        &self.faces
    }

    /// First registered face carrying `name`, if any.
    pub fn face(&self, name: &str) -> Option<&RegisteredFace> {
        self.faces.iter().find(|face| face.name == name)
    }

    /// Unique display names of all registered faces.
    pub fn font_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.faces.iter().map(|f| f.name.clone()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Read a font file and append it to the registry.
    ///
    /// The display name comes from the font's `name` table; files that do
    /// not parse are still registered under their file stem, and the
    /// failure surfaces later as a rendering error if the face is probed.
    pub fn register_file(&mut self, path: &Path) -> Result<()> {
        let data =
            fs::read(path).with_context(|| format!("reading font {}", path.display()))?;

        let name = match FontRef::new(&data) {
            Ok(font) => display_name(&font).unwrap_or_else(|| file_stem(path)),
            Err(err) => {
                log::debug!(
                    "could not parse '{}' ({err}); registering under file stem",
                    path.display()
                );
                file_stem(path)
            }
        };

        log::debug!("registered font '{}' from {}", name, path.display());
        self.faces.push(RegisteredFace {
            name,
            path: path.to_path_buf(),
            data: Arc::new(data),
        });

        Ok(())
    }

    /// Recursively load every `.ttf`/`.otf` file under `dir`.
    ///
    /// A missing directory is a warning, not an error: zero fonts are
    /// loaded and `Ok(0)` is returned.
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            log::warn!("font directory '{}' does not exist", dir.display());
            return Ok(0);
        }

        let discovery = PathDiscovery::new([dir.to_path_buf()]);
        let mut count = 0;
        for file in discovery.discover()? {
            self.register_file(&file.path)?;
            count += 1;
        }

        Ok(count)
    }
}

fn display_name(font: &FontRef) -> Option<String> {
    let name_table = font.name().ok()?;
    let data = name_table.string_data();
    let preferred = [
        NameId::FAMILY_NAME,
        NameId::TYPOGRAPHIC_FAMILY_NAME,
        NameId::FULL_NAME,
        NameId::POSTSCRIPT_NAME,
    ];

    for wanted in preferred {
        for record in name_table.name_record() {
            if record.name_id() != wanted || !record.is_unicode() {
                continue;
            }
            if let Ok(entry) = record.string(data) {
                let rendered = entry.to_string();
                let trimmed = rendered.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    None
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

//! Compatibility probing: subtract every font a diagnostic names

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::registry::FontRegistry;
use crate::render::TextRenderer;

/// Prefix that marks a diagnostic as a missing-glyph report. Diagnostics
/// without it are unrelated warnings and carry no compatibility signal.
const GLYPH_MISSING_PREFIX: &str = "Glyph ";

/// The versioned contract over the renderer's missing-glyph wording.
///
/// Captures: 1 = decimal code point, 2 = code point display form,
/// 3 = comma-joined font names. A `Glyph `-prefixed diagnostic that fails
/// this pattern aborts the probe; a silent non-match would misclassify
/// the named fonts as compatible.
pub fn glyph_missing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Glyph (\d+) \((.*)\) missing from font\(s\) (.+)\.$")
            .expect("glyph-missing pattern compiles")
    })
}

/// Return the registered fonts able to render every code point of `text`.
///
/// When `output` is given and the surviving set is non-empty, a comparison
/// sheet is rendered to that path (one row per font, sorted by name). An
/// empty result produces no image file.
pub fn find_compatible_fonts(
    registry: &FontRegistry,
    renderer: &dyn TextRenderer,
    text: &str,
    output: Option<&Path>,
) -> Result<BTreeSet<String>> {
    let mut compatible: BTreeSet<String> = registry.font_names().into_iter().collect();
    if compatible.is_empty() {
        return Ok(compatible);
    }

    for message in renderer.probe(registry, text)? {
        if !message.starts_with(GLYPH_MISSING_PREFIX) {
            continue;
        }

        let captures = glyph_missing_pattern().captures(&message).ok_or_else(|| {
            anyhow!("unrecognized missing-glyph diagnostic (contract drift?): {message}")
        })?;

        for name in captures[3].split(", ") {
            compatible.remove(name);
        }
    }

    if let Some(path) = output {
        if !compatible.is_empty() {
            let names: Vec<String> = compatible.iter().cloned().collect();
            renderer.render_sheet(registry, &names, text, path)?;
        }
    }

    Ok(compatible)
}

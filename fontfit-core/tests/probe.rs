use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use fontfit_core::probe::find_compatible_fonts;
use fontfit_core::registry::FontRegistry;
use fontfit_core::render::TextRenderer;

/// Renderer double that replays canned diagnostics and records sheet calls.
struct ScriptedRenderer {
    diagnostics: Vec<String>,
    sheets: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl ScriptedRenderer {
    fn new<I, S>(diagnostics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            diagnostics: diagnostics.into_iter().map(Into::into).collect(),
            sheets: RefCell::new(Vec::new()),
        }
    }

    fn sheet_calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.sheets.borrow().clone()
    }
}

impl TextRenderer for ScriptedRenderer {
    fn probe(&self, _registry: &FontRegistry, _text: &str) -> Result<Vec<String>> {
        Ok(self.diagnostics.clone())
    }

    fn render_sheet(
        &self,
        _registry: &FontRegistry,
        names: &[String],
        _text: &str,
        output: &Path,
    ) -> Result<()> {
        self.sheets
            .borrow_mut()
            .push((output.to_path_buf(), names.to_vec()));
        Ok(())
    }
}

/// Registry whose face names come from the file stems.
fn registry_with(names: &[&str]) -> (tempfile::TempDir, FontRegistry) {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut registry = FontRegistry::new();
    for name in names {
        let path = temp.path().join(format!("{name}.ttf"));
        std::fs::write(&path, b"\0\0stub").unwrap();
        registry.register_file(&path).expect("register");
    }
    (temp, registry)
}

fn names(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

#[test]
fn empty_registry_yields_empty_set_and_no_sheet() {
    let registry = FontRegistry::new();
    let renderer = ScriptedRenderer::new(Vec::<String>::new());

    let compatible = find_compatible_fonts(
        &registry,
        &renderer,
        "Hello",
        Some(Path::new("/tmp/never-written.png")),
    )
    .expect("probe");

    assert!(compatible.is_empty());
    assert!(renderer.sheet_calls().is_empty());
}

#[test]
fn no_diagnostics_means_every_font_is_compatible() {
    let (_tmp, registry) = registry_with(&["Arial", "NotoSansCJK"]);
    let renderer = ScriptedRenderer::new(Vec::<String>::new());

    let compatible =
        find_compatible_fonts(&registry, &renderer, "Hello", None).expect("probe");

    assert_eq!(names(&compatible), vec!["Arial", "NotoSansCJK"]);
}

#[test]
fn fonts_named_in_diagnostics_are_removed() {
    let (_tmp, registry) = registry_with(&["Arial", "NotoSansCJK"]);
    let renderer = ScriptedRenderer::new(["Glyph 20013 (U+4E2D) missing from font(s) Arial."]);

    let compatible =
        find_compatible_fonts(&registry, &renderer, "中文", None).expect("probe");

    assert_eq!(names(&compatible), vec!["NotoSansCJK"]);
}

#[test]
fn repeated_diagnostics_remove_a_font_once() {
    let (_tmp, registry) = registry_with(&["Arial", "NotoSansCJK"]);
    let renderer = ScriptedRenderer::new([
        "Glyph 20013 (U+4E2D) missing from font(s) Arial.",
        "Glyph 25991 (U+6587) missing from font(s) Arial, NotoSansCJK.",
    ]);

    let compatible =
        find_compatible_fonts(&registry, &renderer, "中文", None).expect("probe");

    assert!(compatible.is_empty());
}

#[test]
fn result_never_introduces_unregistered_names() {
    let (_tmp, registry) = registry_with(&["Arial"]);
    let renderer =
        ScriptedRenderer::new(["Glyph 65 (U+0041) missing from font(s) SomethingElse."]);

    let compatible =
        find_compatible_fonts(&registry, &renderer, "A", None).expect("probe");

    assert_eq!(names(&compatible), vec!["Arial"]);
}

#[test]
fn unrelated_diagnostics_are_ignored() {
    let (_tmp, registry) = registry_with(&["Arial"]);
    let renderer = ScriptedRenderer::new([
        "tight layout could not be applied",
        "substituting fallback face for emphasis run",
    ]);

    let compatible =
        find_compatible_fonts(&registry, &renderer, "Hello", None).expect("probe");

    assert_eq!(names(&compatible), vec!["Arial"]);
}

#[test]
fn malformed_glyph_diagnostic_is_a_hard_error() {
    let (_tmp, registry) = registry_with(&["Arial"]);
    let renderer = ScriptedRenderer::new(["Glyph U+4E2D could not be resolved for Arial"]);

    let result = find_compatible_fonts(&registry, &renderer, "中", None);

    let err = result.expect_err("contract drift must not pass silently");
    assert!(err.to_string().contains("missing-glyph diagnostic"));
}

#[test]
fn probing_twice_is_idempotent() {
    let (_tmp, registry) = registry_with(&["Arial", "NotoSansCJK"]);
    let renderer = ScriptedRenderer::new(["Glyph 20013 (U+4E2D) missing from font(s) Arial."]);

    let first = find_compatible_fonts(&registry, &renderer, "中", None).expect("probe");
    let second = find_compatible_fonts(&registry, &renderer, "中", None).expect("probe");

    assert_eq!(first, second);
}

#[test]
fn sheet_is_rendered_with_sorted_names_when_requested() {
    let (_tmp, registry) = registry_with(&["Zilla", "Arial", "NotoSansCJK"]);
    let renderer = ScriptedRenderer::new(Vec::<String>::new());
    let output = PathBuf::from("/tmp/sheet.png");

    let compatible =
        find_compatible_fonts(&registry, &renderer, "Hello", Some(&output)).expect("probe");

    assert_eq!(compatible.len(), 3);
    let calls = renderer.sheet_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, output);
    assert_eq!(calls[0].1, vec!["Arial", "NotoSansCJK", "Zilla"]);
}

#[test]
fn empty_result_renders_no_sheet() {
    let (_tmp, registry) = registry_with(&["Arial"]);
    let renderer = ScriptedRenderer::new(["Glyph 20013 (U+4E2D) missing from font(s) Arial."]);

    let compatible = find_compatible_fonts(
        &registry,
        &renderer,
        "中",
        Some(Path::new("/tmp/empty-sheet.png")),
    )
    .expect("probe");

    assert!(compatible.is_empty());
    assert!(renderer.sheet_calls().is_empty());
}

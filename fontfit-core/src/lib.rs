/// fontfit-core: finding the fonts that can actually say what you mean
///
/// Give it a piece of text and a pile of font files and it tells you which
/// of those fonts can render every code point in the text, no tofu boxes,
/// no silent substitutions. It can also draw the receipts: a comparison
/// sheet with one row per surviving font, name on the left, your text on
/// the right, so you can pick by eye instead of by faith.
///
/// ## How a probe works
///
/// **Register**: walk directories for `.ttf`/`.otf` files and collect them
/// into an explicit [`registry::FontRegistry`] — no process-wide globals,
/// every test and every caller gets its own.
///
/// **Render**: push the sample text through a real rasterization pass per
/// font. The renderer reports each unmappable code point as a diagnostic
/// message with a fixed, documented wording.
///
/// **Subtract**: the prober starts from the full set of registered names
/// and strikes out every font a diagnostic names. Whatever is left is
/// compatible. No diagnostic means no complaint means the font passes.
///
/// ```rust,no_run
/// use fontfit_core::probe::find_compatible_fonts;
/// use fontfit_core::registry::FontRegistry;
/// use fontfit_core::render::SwashRenderer;
///
/// let mut registry = FontRegistry::new();
/// let loaded = registry.load_directory("/usr/share/fonts".as_ref())?;
/// println!("loaded {loaded} fonts");
///
/// let renderer = SwashRenderer::default();
/// let compatible = find_compatible_fonts(&registry, &renderer, "Hello 中文测试", None)?;
/// for name in &compatible {
///     println!("{name}");
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// The diagnostic wording is a versioned contract between the renderer and
/// the prober (see [`probe::glyph_missing_pattern`]). If a renderer ever
/// changes its message shape, the prober fails loudly instead of quietly
/// declaring everything compatible.

pub mod discovery;
pub mod output;
pub mod probe;
pub mod registry;
pub mod render;

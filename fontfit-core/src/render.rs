//! Rendering service seam and the swash-backed implementation
//!
//! The prober only ever talks to [`TextRenderer`]; the trait is the
//! boundary between "which fonts survive" logic and the rasterizer that
//! acts as the oracle. [`SwashRenderer`] is the real implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{Pixel, Rgba, RgbaImage};
use swash::scale::image::{Content, Image as GlyphImage};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Format, Vector};
use swash::{FontRef, GlyphId};

use crate::registry::{FontRegistry, RegisteredFace};

/// The rendering/plotting service consumed by the prober.
pub trait TextRenderer {
    /// Lay out and rasterize `text` once per registered face, returning
    /// every diagnostic message raised during the pass. Missing-glyph
    /// diagnostics follow the fixed template
    /// `Glyph <dec> (U+XXXX) missing from font(s) <a>, <b>.`
    fn probe(&self, registry: &FontRegistry, text: &str) -> Result<Vec<String>>;

    /// Rasterize a comparison sheet: one row per name in `names`, the
    /// face's name on the left and `text` rendered in that face on the
    /// right. Saved to `output`, format chosen by file extension.
    fn render_sheet(
        &self,
        registry: &FontRegistry,
        names: &[String],
        text: &str,
        output: &Path,
    ) -> Result<()>;
}

/// Real renderer built on swash scaling and the `image` crate.
#[derive(Debug, Clone)]
pub struct SwashRenderer {
    font_size: f32,
    padding: u32,
}

impl Default for SwashRenderer {
    fn default() -> Self {
        Self {
            font_size: 32.0,
            padding: 16,
        }
    }
}

impl SwashRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    fn draw_line(
        &self,
        context: &mut ScaleContext,
        img: &mut RgbaImage,
        font: &FontRef,
        text: &str,
        origin_x: f32,
        baseline_y: f32,
    ) {
        let charmap = font.charmap();
        let glyph_metrics = font.glyph_metrics(&[]);
        let scale = units_scale(font, self.font_size);
        let mut pen_x = origin_x;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let glyph_id = charmap.map(ch);
            if let Some(glyph) = rasterize(context, font, self.font_size, glyph_id) {
                blit(img, &glyph, pen_x.round() as i32, baseline_y.round() as i32);
            }
            pen_x += glyph_metrics.advance_width(glyph_id) * scale;
        }
    }
}

impl TextRenderer for SwashRenderer {
    fn probe(&self, registry: &FontRegistry, text: &str) -> Result<Vec<String>> {
        let mut context = ScaleContext::new();
        // code point -> fonts missing it; both sides ordered for stable output
        let mut missing: BTreeMap<u32, BTreeSet<String>> = BTreeMap::new();

        for face in registry.faces() {
            let font = load_face(face)?;
            let charmap = font.charmap();

            for ch in text.chars().filter(|ch| !ch.is_control()) {
                let glyph_id = charmap.map(ch);
                if glyph_id == 0 {
                    missing
                        .entry(ch as u32)
                        .or_default()
                        .insert(face.name().to_string());
                    continue;
                }

                // Force actual glyph resolution rather than trusting the
                // cmap alone. A mapped glyph that fails to scale is not a
                // compatibility signal (blank glyphs are legitimate).
                if rasterize(&mut context, &font, self.font_size, glyph_id).is_none() {
                    log::debug!(
                        "glyph {glyph_id} (U+{:04X}) of '{}' produced no raster",
                        ch as u32,
                        face.name()
                    );
                }
            }
        }

        Ok(missing
            .into_iter()
            .map(|(cp, fonts)| {
                let names: Vec<String> = fonts.into_iter().collect();
                format!(
                    "Glyph {cp} (U+{cp:04X}) missing from font(s) {}.",
                    names.join(", ")
                )
            })
            .collect())
    }

    fn render_sheet(
        &self,
        registry: &FontRegistry,
        names: &[String],
        text: &str,
        output: &Path,
    ) -> Result<()> {
        if names.is_empty() {
            return Err(anyhow!("comparison sheet needs at least one font"));
        }

        let mut context = ScaleContext::new();

        let mut rows = Vec::with_capacity(names.len());
        for name in names {
            let face = registry
                .face(name)
                .ok_or_else(|| anyhow!("font '{name}' is not registered"))?;
            let font = load_face(face)?;
            rows.push((face, font));
        }

        let label_width = rows
            .iter()
            .map(|(face, font)| measure(font, self.font_size, face.name()))
            .fold(0.0_f32, f32::max);
        let text_width = rows
            .iter()
            .map(|(_, font)| measure(font, self.font_size, text))
            .fold(0.0_f32, f32::max);

        let pad = self.padding as f32;
        let gap = self.font_size * 1.5;
        let row_height = (self.font_size * 1.8).ceil();
        let width = (pad * 2.0 + label_width + gap + text_width).ceil() as u32;
        let height = (pad * 2.0 + row_height * rows.len() as f32).ceil() as u32;
        let mut img = RgbaImage::from_pixel(
            width.max(1),
            height.max(1),
            Rgba([255, 255, 255, 255]),
        );

        for (i, (face, font)) in rows.iter().enumerate() {
            let baseline = pad + row_height * i as f32 + row_height * 0.75;
            self.draw_line(&mut context, &mut img, font, face.name(), pad, baseline);
            self.draw_line(
                &mut context,
                &mut img,
                font,
                text,
                pad + label_width + gap,
                baseline,
            );
        }

        img.save(output)
            .with_context(|| format!("saving comparison sheet to {}", output.display()))?;

        Ok(())
    }
}

fn load_face<'a>(face: &'a RegisteredFace) -> Result<FontRef<'a>> {
    FontRef::from_index(face.data(), 0).ok_or_else(|| {
        anyhow!(
            "failed to load font face '{}' from {}",
            face.name(),
            face.path().display()
        )
    })
}

fn units_scale(font: &FontRef, font_size: f32) -> f32 {
    let upem = font.metrics(&[]).units_per_em as f32;
    if upem > 0.0 {
        font_size / upem
    } else {
        0.0
    }
}

fn measure(font: &FontRef, font_size: f32, text: &str) -> f32 {
    let glyph_metrics = font.glyph_metrics(&[]);
    let charmap = font.charmap();
    let advance: f32 = text
        .chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| glyph_metrics.advance_width(charmap.map(ch)))
        .sum();
    advance * units_scale(font, font_size)
}

fn rasterize(
    context: &mut ScaleContext,
    font: &FontRef,
    font_size: f32,
    glyph_id: GlyphId,
) -> Option<GlyphImage> {
    let mut scaler = context.builder(*font).size(font_size).hint(true).build();

    Render::new(&[
        Source::ColorOutline(0),
        Source::ColorBitmap(StrikeWith::BestFit),
        Source::Outline,
    ])
    .format(Format::Alpha)
    .offset(Vector::new(0.0, 0.0))
    .render(&mut scaler, glyph_id)
}

fn blit(img: &mut RgbaImage, glyph: &GlyphImage, origin_x: i32, origin_y: i32) {
    let width = glyph.placement.width as i32;
    let height = glyph.placement.height as i32;
    let left = origin_x + glyph.placement.left;
    let top = origin_y - glyph.placement.top;

    match glyph.content {
        Content::Mask => {
            let mut i = 0;
            for off_y in 0..height {
                for off_x in 0..width {
                    let alpha = glyph.data[i];
                    i += 1;
                    put(img, left + off_x, top + off_y, Rgba([0, 0, 0, alpha]));
                }
            }
        }
        Content::Color => {
            for (off_y, row) in glyph.data.chunks_exact(width as usize * 4).enumerate() {
                for (off_x, pixel) in row.chunks_exact(4).enumerate() {
                    let color = Rgba([pixel[0], pixel[1], pixel[2], pixel[3]]);
                    put(img, left + off_x as i32, top + off_y as i32, color);
                }
            }
        }
        Content::SubpixelMask => {
            // Alpha format is requested above, so this arm is unreachable
            // with the current source list.
            log::debug!("skipping subpixel-mask glyph raster");
        }
    }
}

fn put(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    img.get_pixel_mut(x, y).blend(&color);
}

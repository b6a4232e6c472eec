use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::composition::config::{BackgroundStyle, FontRole, Shadow, TextStyle};
use crate::eval::evaluator::{EvaluatedBackground, EvaluatedFrame, EvaluatedWord};
use crate::eval::prepared::PreparedReel;
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, Canvas, Rect, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::raster::{
    blur_radius_for_sigma, blur_rgba8_premul_q16, composite_radial_glow, force_opaque,
    gaussian_kernel_q16, paint_linear_gradient, premul_bytes_to_image,
};

type TextLayout = parley::Layout<TextBrushRgba8>;

/// CPU raster backend powered by `vello_cpu`, drawing text with `parley` glyph runs.
pub struct CpuBackend {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    layout_cache: HashMap<LayoutKey, Arc<TextLayout>>,
    font_cache: HashMap<FontRole, vello_cpu::peniko::FontData>,
    gradient_cache: Option<GradientCache>,
    blur_kernel_cache: HashMap<BlurKernelKey, Arc<Vec<u32>>>,
    blur_scratch_a: Vec<u8>,
    blur_scratch_b: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    font: FontRole,
    size_bits: u64,
    spacing_bits: u64,
    text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BlurKernelKey {
    radius: u32,
    sigma_bits: u32,
}

struct GradientCache {
    canvas: Canvas,
    angle_deg: f64,
    stops: Vec<(f64, Color)>,
    rgba8_premul: Vec<u8>,
}

/// Premultiplied image placed at an integer canvas offset.
struct Layer {
    image: vello_cpu::Image,
    x: f64,
    y: f64,
    width: u32,
    height: u32,
}

impl CpuBackend {
    /// Create a backend drawing with `settings.fonts`.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            layout_cache: HashMap::new(),
            font_cache: HashMap::new(),
            gradient_cache: None,
            blur_kernel_cache: HashMap::new(),
            blur_scratch_a: Vec::new(),
            blur_scratch_b: Vec::new(),
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> ReelResult<R>,
    ) -> ReelResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn font_for(&mut self, role: FontRole) -> vello_cpu::peniko::FontData {
        if let Some(font) = self.font_cache.get(&role) {
            return font.clone();
        }
        let bytes = self.settings.fonts.font_for(role).bytes.as_ref().clone();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        self.font_cache.insert(role, font.clone());
        font
    }

    fn layout_for(&mut self, text: &str, style: &TextStyle) -> ReelResult<Arc<TextLayout>> {
        let key = LayoutKey {
            font: style.font,
            size_bits: style.size_px.to_bits(),
            spacing_bits: style.letter_spacing.to_bits(),
            text: text.to_owned(),
        };
        if let Some(layout) = self.layout_cache.get(&key) {
            return Ok(layout.clone());
        }
        let layout = Arc::new(self.text_engine.layout_styled(
            text,
            style,
            &self.settings.fonts,
            TextBrushRgba8::default(),
        )?);
        self.layout_cache.insert(key, layout.clone());
        Ok(layout)
    }

    fn blur_kernel(&mut self, radius: u32, sigma: f32) -> ReelResult<Arc<Vec<u32>>> {
        let key = BlurKernelKey {
            radius,
            sigma_bits: sigma.to_bits(),
        };
        if let Some(k) = self.blur_kernel_cache.get(&key) {
            return Ok(k.clone());
        }
        let k = Arc::new(gaussian_kernel_q16(radius, sigma)?);
        self.blur_kernel_cache.insert(key, k.clone());
        Ok(k)
    }

    fn background_layer(
        &mut self,
        canvas: Canvas,
        style: &BackgroundStyle,
        eval: &EvaluatedBackground,
    ) -> ReelResult<Layer> {
        let stops: Vec<(f64, Color)> = style.stops.iter().map(|s| (s.offset, s.color)).collect();
        let stale = self.gradient_cache.as_ref().is_none_or(|c| {
            c.canvas != canvas || c.angle_deg != style.angle_deg || c.stops != stops
        });
        if stale {
            let mut rgba8_premul = vec![0u8; (canvas.width as usize) * (canvas.height as usize) * 4];
            paint_linear_gradient(
                &mut rgba8_premul,
                canvas.width,
                canvas.height,
                style.angle_deg,
                &stops,
            )?;
            self.gradient_cache = Some(GradientCache {
                canvas,
                angle_deg: style.angle_deg,
                stops,
                rgba8_premul,
            });
        }
        let cache = self
            .gradient_cache
            .as_ref()
            .ok_or_else(|| ReelError::render("background gradient cache missing"))?;

        let mut bytes = cache.rgba8_premul.clone();
        composite_radial_glow(
            &mut bytes,
            canvas.width,
            canvas.height,
            eval.glow_center,
            eval.glow_radius,
            style.glow_color,
        )?;
        Ok(Layer {
            image: premul_bytes_to_image(&bytes, canvas.width, canvas.height)?,
            x: 0.0,
            y: 0.0,
            width: canvas.width,
            height: canvas.height,
        })
    }

    /// Draw `content` offset by the shadow offset into a scratch surface and blur it.
    ///
    /// `bounds` is the canvas-space extent of what `draw` paints before the offset.
    fn blurred_layer(
        &mut self,
        bounds: Rect,
        shadow: &Shadow,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, Affine),
    ) -> ReelResult<Option<Layer>> {
        if shadow.color.a <= 0.0 || bounds.area() <= 0.0 {
            return Ok(None);
        }
        let sigma = shadow.blur / 2.0;
        let radius = blur_radius_for_sigma(sigma);
        let region = (bounds + Vec2::new(shadow.offset_x, shadow.offset_y))
            .inflate(f64::from(radius) + 1.0, f64::from(radius) + 1.0);
        let (x0, y0) = (region.x0.floor(), region.y0.floor());
        let width = (region.x1.ceil() - x0).max(1.0) as u32;
        let height = (region.y1.ceil() - y0).max(1.0) as u32;
        let (w16, h16) = surface_dims(width, height)?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(
            &mut ctx,
            Affine::translate((shadow.offset_x - x0, shadow.offset_y - y0)),
        );
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let kernel = self.blur_kernel(radius, sigma as f32)?;
        let len = pixmap.data_as_u8_slice().len();
        self.blur_scratch_a.resize(len, 0);
        self.blur_scratch_b.resize(len, 0);
        blur_rgba8_premul_q16(
            pixmap.data_as_u8_slice(),
            &mut self.blur_scratch_a,
            &mut self.blur_scratch_b,
            width,
            height,
            &kernel,
        )?;

        Ok(Some(Layer {
            image: premul_bytes_to_image(&self.blur_scratch_a, width, height)?,
            x: x0,
            y: y0,
            width,
            height,
        }))
    }

    /// Blurred shadow layers for `words`.
    ///
    /// A scaled word gets its own layer whose blur and offset scale with it.
    fn word_shadow_layers(
        &mut self,
        words: &[(&EvaluatedWord, Arc<TextLayout>)],
        font: &vello_cpu::peniko::FontData,
        shadow: &Shadow,
    ) -> ReelResult<Vec<Layer>> {
        let (unscaled, scaled): (Vec<_>, Vec<_>) =
            words.iter().cloned().partition(|(w, _)| w.scale == 1.0);
        let mut layers = Vec::new();
        layers.extend(self.shadow_layer_for(&unscaled, font, shadow)?);
        for word in scaled {
            let s = scaled_shadow(shadow, word.0.scale);
            layers.extend(self.shadow_layer_for(std::slice::from_ref(&word), font, &s)?);
        }
        Ok(layers)
    }

    fn shadow_layer_for(
        &mut self,
        words: &[(&EvaluatedWord, Arc<TextLayout>)],
        font: &vello_cpu::peniko::FontData,
        shadow: &Shadow,
    ) -> ReelResult<Option<Layer>> {
        let Some(bounds) = words
            .iter()
            .map(|(w, _)| scaled_rect(w))
            .reduce(|a, b| a.union(b))
        else {
            return Ok(None);
        };
        self.blurred_layer(bounds, shadow, |ctx, to_layer| {
            for (word, layout) in words {
                fill_layout(
                    ctx,
                    layout,
                    font,
                    to_layer * word_transform(word),
                    shadow.color.with_alpha_mul(word.opacity),
                );
            }
        })
    }
}

impl RenderBackend for CpuBackend {
    fn render_frame(
        &mut self,
        prepared: &PreparedReel,
        eval: &EvaluatedFrame,
    ) -> ReelResult<FrameRGBA> {
        let canvas = prepared.config.canvas;
        let (w16, h16) = surface_dims(canvas.width, canvas.height)?;
        let theme = &prepared.config.theme;
        let word_style = &theme.words;
        let indicator = &theme.indicator;
        let progress = &theme.progress;

        let background = self.background_layer(canvas, &theme.background, &eval.background)?;

        let words_font = self.font_for(word_style.text.font);
        let label_font = self.font_for(indicator.text.font);
        let mut words = Vec::with_capacity(eval.words.len());
        for w in &eval.words {
            words.push((w, self.layout_for(&w.text, &word_style.text)?));
        }
        let label_layout = self.layout_for(&eval.indicator.label, &indicator.text)?;

        let mut word_layers = Vec::new();
        let mut progress_glow = None;
        let fill = eval.progress_bar.fill;
        if theme.shadows {
            word_layers.extend(self.word_shadow_layers(&words, &words_font, &word_style.shadow)?);
            let glowing: Vec<_> = words.iter().filter(|(w, _)| w.glow).cloned().collect();
            word_layers.extend(self.word_shadow_layers(&glowing, &words_font, &word_style.glow)?);
            if fill.width() > 0.0 {
                progress_glow = self.blurred_layer(fill, &progress.glow, |ctx, to_layer| {
                    fill_rounded_rect(ctx, to_layer, fill, progress.radius, progress.glow.color);
                })?;
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        self.with_ctx_mut(w16, h16, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            draw_layer(ctx, &background);
            for layer in &word_layers {
                draw_layer(ctx, layer);
            }

            for (word, layout) in &words {
                let opacity = word.opacity.clamp(0.0, 1.0) as f32;
                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                fill_layout(ctx, layout, &words_font, word_transform(word), word.color);
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
            }

            let pill = eval.indicator.rect;
            let pill_color = if eval.indicator.active {
                indicator.active_background
            } else {
                indicator.inactive_background
            };
            fill_rounded_rect(ctx, Affine::IDENTITY, pill, indicator.radius, pill_color);
            fill_layout(
                ctx,
                &label_layout,
                &label_font,
                Affine::translate((pill.x0 + indicator.padding_x, pill.y0 + indicator.padding_y)),
                indicator.text_color,
            );

            let track = eval.progress_bar.track;
            fill_rounded_rect(
                ctx,
                Affine::IDENTITY,
                track,
                progress.radius,
                progress.track_color,
            );
            if let Some(glow) = &progress_glow {
                draw_layer(ctx, glow);
            }
            if fill.width() > 0.0 {
                fill_rounded_rect(ctx, Affine::IDENTITY, fill, progress.radius, progress.fill_color);
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        // The background covers the canvas; anti-aliased edges may still round alpha below 255.
        let mut data = pixmap.data_as_u8_slice().to_vec();
        force_opaque(&mut data);
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn worker_render_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

fn surface_dims(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ReelError::render("surface must be non-empty"));
    }
    Ok((w, h))
}

/// Box of `word` after its scale about the center.
fn scaled_rect(word: &EvaluatedWord) -> Rect {
    let c = word.rect.center();
    let half = Vec2::new(word.rect.width(), word.rect.height()) * (word.scale / 2.0);
    Rect::new(c.x - half.x, c.y - half.y, c.x + half.x, c.y + half.y)
}

/// `shadow` under a CSS `scale(s)` transform: blur and offset scale too.
fn scaled_shadow(shadow: &Shadow, s: f64) -> Shadow {
    Shadow {
        offset_x: shadow.offset_x * s,
        offset_y: shadow.offset_y * s,
        blur: shadow.blur * s,
        color: shadow.color,
    }
}

/// Layout space to canvas space for `word`.
fn word_transform(word: &EvaluatedWord) -> Affine {
    let c = word.rect.center();
    Affine::translate(c.to_vec2())
        * Affine::scale(word.scale)
        * Affine::translate(word.rect.origin() - c)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8_straight();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn draw_layer(ctx: &mut vello_cpu::RenderContext, layer: &Layer) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((layer.x, layer.y)));
    ctx.set_paint(layer.image.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(layer.width),
        f64::from(layer.height),
    ));
}

fn fill_rounded_rect(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    rect: Rect,
    radius: f64,
    color: Color,
) {
    if color.a <= 0.0 || rect.area() <= 0.0 {
        return;
    }
    let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let rr = kurbo::RoundedRect::from_rect(rect, radius);
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        p.push(el);
    }
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_path(&p);
}

fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &TextLayout,
    font: &vello_cpu::peniko::FontData,
    transform: Affine,
    color: Color,
) {
    if color.a <= 0.0 {
        return;
    }
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

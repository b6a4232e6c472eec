use std::collections::HashMap;

use crate::assets::fonts::{FontBlob, PreparedFonts};
use crate::composition::config::TextStyle;
use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::flow::WordMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Parley contexts plus the families already registered in them.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontBlob) -> ReelResult<String> {
        if let Some(name) = self.families.get(&font.source) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation(format!("font '{}' registers no font families", font.source))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(font.source.clone(), name.clone());
        Ok(name)
    }

    /// Shape `text` on a single line.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &FontBlob,
        size_px: f32,
        letter_spacing_px: f32,
        brush: TextBrushRgba8,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            letter_spacing_px,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Shape `text` in `style` with the matching font from `fonts`.
    pub fn layout_styled(
        &mut self,
        text: &str,
        style: &TextStyle,
        fonts: &PreparedFonts,
        brush: TextBrushRgba8,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        self.layout_plain(
            text,
            fonts.font_for(style.font),
            style.size_px as f32,
            style.letter_spacing as f32,
            brush,
        )
    }
}

/// [`WordMeasure`] backed by real font shaping.
pub struct ParleyMeasure {
    engine: TextLayoutEngine,
    fonts: PreparedFonts,
}

impl ParleyMeasure {
    /// Measure with `fonts`.
    pub fn new(fonts: PreparedFonts) -> Self {
        Self {
            engine: TextLayoutEngine::new(),
            fonts,
        }
    }
}

impl WordMeasure for ParleyMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle) -> ReelResult<Size> {
        let layout =
            self.engine
                .layout_styled(text, style, &self.fonts, TextBrushRgba8::default())?;
        Ok(Size::new(f64::from(layout.width()), f64::from(layout.height())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;

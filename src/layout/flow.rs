//! Flexbox placement of karaoke words.
//!
//! The word container is a wrapping, centered flex row with gap, padding and a max width,
//! itself centered on the canvas by a full-size column flex parent. Taffy resolves it the
//! way a browser would, so line breaks and centering match CSS.

use taffy::prelude::{AvailableSpace, NodeId, Rect as TaffyRect, Size as TaffySize};
use taffy::style::{
    AlignItems, BoxSizing, Dimension, Display, FlexDirection, FlexWrap, JustifyContent,
    LengthPercentage, Style,
};

use crate::composition::config::{TextStyle, WordStyle};
use crate::foundation::core::{Canvas, Rect, Size};
use crate::foundation::error::{ReelError, ReelResult};

/// Text measurement used by layout.
pub trait WordMeasure {
    /// Unscaled box of `text` set in `style` (`text` is already case-transformed).
    fn measure(&mut self, text: &str, style: &TextStyle) -> ReelResult<Size>;
}

/// Font-free measurer: every character advances `advance_em * size_px` plus letter spacing.
///
/// Useful for planning and tests when no font file is at hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxMeasure {
    /// Advance of one character, in ems.
    pub advance_em: f64,
    /// Line height, in ems.
    pub line_height_em: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl WordMeasure for ApproxMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle) -> ReelResult<Size> {
        let chars = text.chars().count() as f64;
        let w = chars * (self.advance_em * style.size_px + style.letter_spacing);
        Ok(Size::new(w.max(0.0), self.line_height_em * style.size_px))
    }
}

#[derive(Clone, Copy, Debug)]
struct WordNodeCtx {
    intrinsic: TaffySize<f32>,
}

fn taffy_err(e: taffy::TaffyError) -> ReelError {
    ReelError::layout(e.to_string())
}

/// Canvas-space rects of `words`, in input order.
pub fn layout_words(
    canvas: Canvas,
    words: &[String],
    style: &WordStyle,
    measure: &mut dyn WordMeasure,
) -> ReelResult<Vec<Rect>> {
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut tree = taffy::TaffyTree::<WordNodeCtx>::new();
    tree.disable_rounding();

    let mut leaves = Vec::<NodeId>::with_capacity(words.len());
    for word in words {
        let size = measure.measure(word, &style.text)?;
        if !size.width.is_finite() || !size.height.is_finite() {
            return Err(ReelError::layout(format!(
                "measured size of '{word}' is not finite"
            )));
        }
        let intrinsic = TaffySize {
            width: size.width as f32,
            height: size.height as f32,
        };
        let leaf = tree
            .new_leaf_with_context(Style::default(), WordNodeCtx { intrinsic })
            .map_err(taffy_err)?;
        leaves.push(leaf);
    }

    let gap = style.gap as f32;
    let pad = style.padding as f32;
    let container = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Row,
                flex_wrap: FlexWrap::Wrap,
                // CSS default: max-width bounds the content box, padding sits outside it.
                box_sizing: BoxSizing::ContentBox,
                justify_content: Some(JustifyContent::Center),
                align_items: Some(AlignItems::Center),
                gap: TaffySize {
                    width: LengthPercentage::length(gap),
                    height: LengthPercentage::length(gap),
                },
                padding: TaffyRect {
                    left: LengthPercentage::length(pad),
                    right: LengthPercentage::length(pad),
                    top: LengthPercentage::length(pad),
                    bottom: LengthPercentage::length(pad),
                },
                max_size: TaffySize {
                    width: Dimension::length(style.max_width as f32),
                    height: Dimension::auto(),
                },
                ..Style::default()
            },
            &leaves,
        )
        .map_err(taffy_err)?;

    let (cw, ch) = (canvas.width as f32, canvas.height as f32);
    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                justify_content: Some(JustifyContent::Center),
                align_items: Some(AlignItems::Center),
                size: TaffySize {
                    width: Dimension::length(cw),
                    height: Dimension::length(ch),
                },
                ..Style::default()
            },
            &[container],
        )
        .map_err(taffy_err)?;

    tree.compute_layout_with_measure(
        root,
        TaffySize {
            width: AvailableSpace::Definite(cw),
            height: AvailableSpace::Definite(ch),
        },
        |known_dimensions, _available_space, _node_id, node_context, _style| {
            let intrinsic = node_context
                .as_ref()
                .map(|c| c.intrinsic)
                .unwrap_or(TaffySize::ZERO);
            known_dimensions.unwrap_or(intrinsic)
        },
    )
    .map_err(taffy_err)?;

    let c = tree.layout(container).map_err(taffy_err)?;
    let (ox, oy) = (f64::from(c.location.x), f64::from(c.location.y));

    let mut rects = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        let l = tree.layout(leaf).map_err(taffy_err)?;
        let x0 = ox + f64::from(l.location.x);
        let y0 = oy + f64::from(l.location.y);
        rects.push(Rect::new(
            x0,
            y0,
            x0 + f64::from(l.size.width),
            y0 + f64::from(l.size.height),
        ));
    }
    Ok(rects)
}

/// Size of a padded pill holding `text`.
pub fn label_box(
    text: &str,
    style: &TextStyle,
    padding_x: f64,
    padding_y: f64,
    measure: &mut dyn WordMeasure,
) -> ReelResult<Size> {
    let inner = measure.measure(text, style)?;
    Ok(Size::new(
        inner.width + 2.0 * padding_x,
        inner.height + 2.0 * padding_y,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flow.rs"]
mod tests;

use std::collections::HashMap;

use crate::composition::config::ReelConfig;
use crate::composition::model::ReelComposition;
use crate::foundation::core::Rect;
use crate::foundation::error::ReelResult;
use crate::karaoke::words::{WordTiming, split_words, word_timings};
use crate::layout::flow::{WordMeasure, label_box, layout_words};
use crate::timeline::segments::Timeline;

/// A word with its display text, layout box and timing.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedWord {
    /// Text as drawn (case transform applied).
    pub text: String,
    /// Unscaled canvas-space box.
    pub rect: Rect,
    /// Segment-local timing.
    pub timing: WordTiming,
}

/// Everything about one segment that does not change from frame to frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedSegment {
    /// Words in reading order.
    pub words: Vec<PreparedWord>,
    /// Indicator text as drawn.
    pub label_text: String,
    /// Indicator pill box.
    pub label_rect: Rect,
}

/// A composition with its timeline resolved and all text measured and laid out.
///
/// Frame evaluation only reads from this, so one instance can be shared across render workers.
#[derive(Clone, Debug)]
pub struct PreparedReel {
    /// Render configuration.
    pub config: ReelConfig,
    /// Segment timeline.
    pub timeline: Timeline,
    /// Per-segment data, parallel to `timeline.segments`.
    pub segments: Vec<PreparedSegment>,
}

impl PreparedReel {
    /// Validate `comp`, build its timeline and lay out every segment with `measure`.
    pub fn prepare(comp: &ReelComposition, measure: &mut dyn WordMeasure) -> ReelResult<Self> {
        comp.config.validate()?;
        let timeline = comp.timeline()?;
        let theme = &comp.config.theme;
        let canvas = comp.config.canvas;

        let mut label_sizes = HashMap::<String, Rect>::new();
        let mut segments = Vec::with_capacity(timeline.segments.len());
        for seg in &timeline.segments {
            let texts: Vec<String> = split_words(&seg.text)
                .into_iter()
                .map(|w| theme.words.text.display_text(w))
                .collect();
            let rects = layout_words(canvas, &texts, &theme.words, measure)?;
            let timings = word_timings(texts.len(), seg.len_frames());
            let words = texts
                .into_iter()
                .zip(rects)
                .zip(timings)
                .map(|((text, rect), timing)| PreparedWord { text, rect, timing })
                .collect();

            let ind = &theme.indicator;
            let label_text = ind.text.display_text(&seg.label);
            let label_rect = match label_sizes.get(&label_text) {
                Some(r) => *r,
                None => {
                    let size = label_box(
                        &label_text,
                        &ind.text,
                        ind.padding_x,
                        ind.padding_y,
                        measure,
                    )?;
                    let r = Rect::new(
                        ind.left,
                        ind.top,
                        ind.left + size.width,
                        ind.top + size.height,
                    );
                    label_sizes.insert(label_text.clone(), r);
                    r
                }
            };

            segments.push(PreparedSegment {
                words,
                label_text,
                label_rect,
            });
        }

        tracing::debug!(
            segments = segments.len(),
            words = segments.iter().map(|s| s.words.len()).sum::<usize>(),
            "prepared reel"
        );

        Ok(Self {
            config: comp.config.clone(),
            timeline,
            segments,
        })
    }

    /// Total frame count.
    pub fn duration_frames(&self) -> u64 {
        self.timeline.duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/prepared.rs"]
mod tests;

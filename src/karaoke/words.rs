//! Word-level karaoke timing.
//!
//! A segment's duration is split evenly across its words. All frame numbers here are
//! segment-local and fractional.

use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::animation::spring::spring;
use crate::composition::config::WordStyle;
use crate::foundation::color::Color;
use crate::foundation::error::ReelResult;

/// Whitespace-separated words of `text`; runs of whitespace never produce empty words.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// When a word is spoken, in segment-local frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordTiming {
    /// Position of the word in its segment.
    pub index: usize,
    /// First frame the word is current.
    pub start_frame: f64,
    /// How long each word stays current.
    pub frames_per_word: f64,
}

impl WordTiming {
    /// Frame at which the next word takes over.
    pub fn end_frame(&self) -> f64 {
        self.start_frame + self.frames_per_word
    }
}

/// Even split of `duration_frames` across `word_count` words.
pub fn word_timings(word_count: usize, duration_frames: u64) -> Vec<WordTiming> {
    if word_count == 0 {
        return Vec::new();
    }
    let frames_per_word = (duration_frames as f64) / (word_count as f64);
    (0..word_count)
        .map(|index| WordTiming {
            index,
            start_frame: (index as f64) * frames_per_word,
            frames_per_word,
        })
        .collect()
}

/// Per-frame look of one word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordVisual {
    /// The word has been reached.
    pub active: bool,
    /// The word is being spoken now.
    pub current: bool,
    /// Scale about the word box center.
    pub scale: f64,
    /// Opacity of the whole word.
    pub opacity: f64,
    /// Text color.
    pub color: Color,
    /// Draw the emphasis glow.
    pub glow: bool,
}

/// State of word `timing` at segment-local frame `local_frame`.
pub fn word_visual(
    timing: &WordTiming,
    local_frame: f64,
    fps: f64,
    style: &WordStyle,
) -> ReelResult<WordVisual> {
    let start = timing.start_frame;
    let active = local_frame >= start;
    let current = active && local_frame < timing.end_frame();

    let scale = if current {
        1.0 + spring(local_frame - start, fps, style.spring)? * style.emphasis_scale
    } else {
        1.0
    };

    let opacity = if active {
        interpolate(
            local_frame,
            &[start - style.fade_in_frames, start],
            &[style.inactive_opacity, 1.0],
            InterpolateOpts::clamped(),
        )?
    } else {
        style.inactive_opacity
    };

    Ok(WordVisual {
        active,
        current,
        scale,
        opacity,
        color: if active {
            style.active_color
        } else {
            style.inactive_color
        },
        glow: current,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/karaoke/words.rs"]
mod tests;

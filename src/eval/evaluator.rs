use crate::eval::prepared::PreparedReel;
use crate::foundation::color::Color;
use crate::foundation::core::{FrameIndex, Point, Rect};
use crate::foundation::error::{ReelError, ReelResult};
use crate::karaoke::words::word_visual;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Resolved scene state for a single frame.
pub struct EvaluatedFrame {
    /// Evaluated frame index.
    pub frame: FrameIndex,
    /// Playback progress in `[0, 1]`.
    pub progress: f64,
    /// Background glow placement.
    pub background: EvaluatedBackground,
    /// Segment indicator.
    pub indicator: EvaluatedIndicator,
    /// Index of the segment on screen.
    pub segment: Option<usize>,
    /// Words of that segment, in reading order.
    pub words: Vec<EvaluatedWord>,
    /// Progress bar geometry.
    pub progress_bar: EvaluatedProgressBar,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Radial glow of the background.
pub struct EvaluatedBackground {
    /// Glow center in canvas pixels.
    pub glow_center: Point,
    /// Distance at which the glow reaches full transparency.
    pub glow_radius: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Indicator pill.
pub struct EvaluatedIndicator {
    /// Text as drawn.
    pub label: String,
    /// Pill box.
    pub rect: Rect,
    /// Active pills use the accent background.
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One karaoke word at this frame.
pub struct EvaluatedWord {
    /// Text as drawn.
    pub text: String,
    /// Unscaled box.
    pub rect: Rect,
    /// Scale about `rect`'s center.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Text color.
    pub color: Color,
    /// Draw the emphasis glow.
    pub glow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Progress bar rectangles.
pub struct EvaluatedProgressBar {
    /// Full-width track.
    pub track: Rect,
    /// Filled part, anchored left.
    pub fill: Rect,
}

/// Stateless evaluator from prepared reel to per-frame state.
pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(prepared))]
    /// Evaluate `frame`. Frames at or past the end are an error.
    pub fn eval_frame(prepared: &PreparedReel, frame: FrameIndex) -> ReelResult<EvaluatedFrame> {
        let timeline = &prepared.timeline;
        if frame.0 >= timeline.duration {
            return Err(ReelError::evaluation(format!(
                "frame {} is outside the reel (duration {} frames)",
                frame.0, timeline.duration
            )));
        }
        let theme = &prepared.config.theme;
        let canvas = prepared.config.canvas;
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let progress = timeline.progress(frame);

        let bg = &theme.background;
        let glow_center = Point::new(
            w * bg.glow_center_x_pct / 100.0,
            h * (bg.glow_base_y_pct
                + (frame.0 as f64 / bg.glow_period_frames).sin() * bg.glow_amplitude_pct)
                / 100.0,
        );
        let background = EvaluatedBackground {
            glow_center,
            glow_radius: farthest_corner(glow_center, w, h) * bg.glow_radius_pct / 100.0,
        };

        let segment = timeline.segment_at(frame).map(|(idx, _)| idx);
        // Past every segment the last one keeps the indicator.
        let label_idx = segment.unwrap_or(prepared.segments.len().saturating_sub(1));
        let indicator = prepared
            .segments
            .get(label_idx)
            .map(|s| EvaluatedIndicator {
                label: s.label_text.clone(),
                rect: s.label_rect,
                active: true,
            })
            .ok_or_else(|| ReelError::evaluation("reel has no segments"))?;

        let mut words = Vec::new();
        if let Some(idx) = segment {
            let timed = &timeline.segments[idx];
            let local = timed.local_frame(frame) as f64;
            let fps = timeline.fps.as_f64();
            let seg = &prepared.segments[idx];
            words.reserve(seg.words.len());
            for word in &seg.words {
                let v = word_visual(&word.timing, local, fps, &theme.words)?;
                words.push(EvaluatedWord {
                    text: word.text.clone(),
                    rect: word.rect,
                    scale: v.scale,
                    opacity: v.opacity,
                    color: v.color,
                    glow: v.glow,
                });
            }
        }

        let p = &theme.progress;
        let track = Rect::new(p.inset, h - p.bottom - p.height, w - p.inset, h - p.bottom);
        let fill = Rect::new(
            track.x0,
            track.y0,
            track.x0 + track.width() * progress,
            track.y1,
        );

        Ok(EvaluatedFrame {
            frame,
            progress,
            background,
            indicator,
            segment,
            words,
            progress_bar: EvaluatedProgressBar { track, fill },
        })
    }
}

fn farthest_corner(c: Point, w: f64, h: f64) -> f64 {
    let dx = c.x.max(w - c.x);
    let dy = c.y.max(h - c.y);
    dx.hypot(dy)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;

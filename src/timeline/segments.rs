use crate::composition::config::SegmentLabels;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::{ScriptSegment, VideoScript};

/// Role of a segment in the reel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SegmentKind {
    /// Opening segment.
    Hook,
    /// Body part `index` (0-based).
    Body {
        /// Position among the body parts.
        index: usize,
    },
    /// Closing call to action.
    Cta,
}

/// A script segment placed on the frame timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedSegment {
    /// Segment role.
    pub kind: SegmentKind,
    /// Indicator label, as configured (case transform not applied).
    pub label: String,
    /// Narration text.
    pub text: String,
    /// Art-direction note.
    pub visual: String,
    /// Frames covered by the segment.
    pub range: FrameRange,
}

impl TimedSegment {
    /// `frame` relative to the segment start, saturating at 0.
    pub fn local_frame(&self, frame: FrameIndex) -> u64 {
        frame.0.saturating_sub(self.range.start.0)
    }

    /// Number of frames the segment lasts.
    pub fn len_frames(&self) -> u64 {
        self.range.len_frames()
    }
}

/// Back-to-back sequence of segments: hook, body parts, CTA.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Frame rate the segments were quantized with.
    pub fps: Fps,
    /// Segments in playback order; ranges are contiguous from frame 0.
    pub segments: Vec<TimedSegment>,
    /// Total frame count.
    pub duration: u64,
}

impl Timeline {
    /// Quantize every segment to `round(duration * fps)` frames and lay them end to end.
    pub fn build(script: &VideoScript, fps: Fps, labels: &SegmentLabels) -> ReelResult<Self> {
        script.validate()?;
        let fps = Fps::new(fps.num, fps.den)?;

        let mut entries: Vec<(SegmentKind, String, &ScriptSegment)> =
            Vec::with_capacity(script.body.len() + 2);
        entries.push((SegmentKind::Hook, labels.hook.clone(), &script.hook));
        for (index, seg) in script.body.iter().enumerate() {
            entries.push((SegmentKind::Body { index }, labels.body(index), seg));
        }
        entries.push((SegmentKind::Cta, labels.cta.clone(), &script.cta));

        let mut segments = Vec::with_capacity(entries.len());
        let mut cursor = 0u64;
        for (kind, label, seg) in entries {
            let frames = fps.secs_to_frames_round(seg.duration);
            if frames == 0 {
                return Err(ReelError::validation(format!(
                    "segment '{label}' lasts {}s, which is 0 frames at {}/{} fps",
                    seg.duration, fps.num, fps.den
                )));
            }
            let range = FrameRange::new(FrameIndex(cursor), FrameIndex(cursor + frames))?;
            cursor += frames;
            segments.push(TimedSegment {
                kind,
                label,
                text: seg.text.clone(),
                visual: seg.visual.clone(),
                range,
            });
        }

        let declared = script.metadata.total_duration;
        let summed = script.total_duration_secs();
        if declared > 0.0 && (declared - summed).abs() > 1e-9 {
            tracing::warn!(
                declared_secs = declared,
                segment_secs = summed,
                "script metadata total_duration disagrees with segment durations; using segments"
            );
        }

        tracing::debug!(
            segments = segments.len(),
            duration_frames = cursor,
            "built reel timeline"
        );

        Ok(Self {
            fps,
            segments,
            duration: cursor,
        })
    }

    /// Frames `[0, duration)`.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration),
        }
    }

    /// Segment containing `frame`, with its index. `None` at or past the end.
    pub fn segment_at(&self, frame: FrameIndex) -> Option<(usize, &TimedSegment)> {
        let idx = self
            .segments
            .partition_point(|s| s.range.end.0 <= frame.0);
        self.segments
            .get(idx)
            .filter(|s| s.range.contains(frame))
            .map(|s| (idx, s))
    }

    /// Label shown by the indicator at `frame`. Past the end the last label sticks.
    pub fn indicator_label(&self, frame: FrameIndex) -> &str {
        match self.segment_at(frame) {
            Some((_, seg)) => &seg.label,
            None => self.segments.last().map_or("", |s| s.label.as_str()),
        }
    }

    /// Playback progress `frame / duration`, clamped to `[0, 1]`.
    pub fn progress(&self, frame: FrameIndex) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        ((frame.0 as f64) / (self.duration as f64)).clamp(0.0, 1.0)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/segments.rs"]
mod tests;

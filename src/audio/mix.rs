use std::{path::Path, sync::Arc};

use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE};
use crate::composition::config::NarrationConfig;
use crate::foundation::core::{Fps, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};

/// One source placed on the output sample timeline.
#[derive(Clone, Debug)]
pub struct AudioSegment {
    /// First output sample (per channel) covered.
    pub timeline_start_sample: u64,
    /// One past the last output sample covered.
    pub timeline_end_sample: u64,
    /// Source time matching `timeline_start_sample`.
    pub source_start_sec: f64,
    /// Linear gain.
    pub volume: f32,
    /// Fade-in from the segment start, in seconds.
    pub fade_in_sec: f64,
    /// Fade-out towards the segment end, in seconds.
    pub fade_out_sec: f64,
    /// Source sample rate.
    pub source_sample_rate: u32,
    /// Source channel count (1 or 2 are mixed; extra channels are ignored).
    pub source_channels: u16,
    /// Source PCM.
    pub source_interleaved_f32: Arc<Vec<f32>>,
}

/// Everything needed to mix the audio of a render range.
#[derive(Clone, Debug)]
pub struct AudioManifest {
    /// Output sample rate.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in samples per channel.
    pub total_samples: u64,
    /// Sources to mix.
    pub segments: Vec<AudioSegment>,
}

/// Place decoded narration on the timeline of `range`.
///
/// The narration starts at `narration.offset_frames`; anything past the range end is cut and a
/// short narration leaves silence.
pub fn build_narration_manifest(
    narration: &NarrationConfig,
    pcm: &AudioPcm,
    range: FrameRange,
    fps: Fps,
) -> ReelResult<AudioManifest> {
    if range.is_empty() {
        return Err(ReelError::validation(
            "audio manifest range must be non-empty",
        ));
    }
    if pcm.channels == 0 || pcm.sample_rate == 0 {
        return Err(ReelError::evaluation(
            "narration PCM must have channels and a sample rate",
        ));
    }

    let sample_rate = MIX_SAMPLE_RATE;
    let mut segments = Vec::new();

    let start = narration.offset_frames.max(range.start.0);
    if start < range.end.0 && narration.volume > 0.0 && !pcm.interleaved_f32.is_empty() {
        let frames_into_narration = start - narration.offset_frames;
        segments.push(AudioSegment {
            timeline_start_sample: frame_to_sample(start - range.start.0, fps, sample_rate),
            timeline_end_sample: frame_to_sample(range.len_frames(), fps, sample_rate),
            source_start_sec: narration.trim_start_sec
                + fps.frames_to_secs(frames_into_narration),
            volume: narration.volume as f32,
            fade_in_sec: narration.fade_in_sec,
            fade_out_sec: narration.fade_out_sec,
            source_sample_rate: pcm.sample_rate,
            source_channels: pcm.channels,
            source_interleaved_f32: Arc::new(pcm.interleaved_f32.clone()),
        });
    }

    Ok(AudioManifest {
        sample_rate,
        channels: 2,
        total_samples: frame_to_sample(range.len_frames(), fps, sample_rate),
        segments,
    })
}

/// Mix every segment into interleaved output samples, clamped to `[-1, 1]`.
pub fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let out_channels = usize::from(manifest.channels);
    let mut out = vec![0.0f32; frames * out_channels];

    for seg in &manifest.segments {
        let seg_end = seg.timeline_end_sample.min(manifest.total_samples);
        let seg_len_samples = seg_end.saturating_sub(seg.timeline_start_sample);
        if seg_len_samples == 0 || seg.source_channels == 0 {
            continue;
        }
        let src_channels = usize::from(seg.source_channels);
        let src = seg.source_interleaved_f32.as_ref();
        let src_frames = src.len() / src_channels;
        if src_frames == 0 {
            continue;
        }

        for dst_sample in seg.timeline_start_sample..seg_end {
            let rel_sample = dst_sample - seg.timeline_start_sample;
            let rel_sec = (rel_sample as f64) / f64::from(manifest.sample_rate);
            let src_pos = (seg.source_start_sec + rel_sec) * f64::from(seg.source_sample_rate);
            if !src_pos.is_finite() || src_pos < 0.0 {
                break;
            }
            let src_frame0 = src_pos.floor() as usize;
            if src_frame0 >= src_frames {
                break;
            }
            let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
            let frac = (src_pos - src_frame0 as f64) as f32;

            let gain = fade_gain(seg, rel_sec, seg_len_samples, manifest.sample_rate) * seg.volume;
            let (l, r) = if src_channels == 1 {
                let v = lerp(src[src_frame0], src[src_frame1], frac);
                (v, v)
            } else {
                let i0 = src_frame0 * src_channels;
                let i1 = src_frame1 * src_channels;
                (
                    lerp(src[i0], src[i1], frac),
                    lerp(src[i0 + 1], src[i1 + 1], frac),
                )
            };

            let dst_idx = dst_sample as usize * out_channels;
            if out_channels == 1 {
                out[dst_idx] += (l + r) * 0.5 * gain;
            } else {
                out[dst_idx] += l * gain;
                out[dst_idx + 1] += r * gain;
            }
        }
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Write interleaved samples as raw little-endian `f32`, the format the encoder reads.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::evaluation(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::evaluation(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

fn fade_gain(seg: &AudioSegment, rel_sec: f64, seg_len_samples: u64, sample_rate: u32) -> f32 {
    let mut gain = 1.0f32;
    if seg.fade_in_sec > 0.0 {
        gain *= (rel_sec / seg.fade_in_sec).clamp(0.0, 1.0) as f32;
    }
    if seg.fade_out_sec > 0.0 {
        let seg_len_sec = (seg_len_samples as f64) / f64::from(sample_rate);
        let rem = (seg_len_sec - rel_sec).max(0.0);
        gain *= (rem / seg.fade_out_sec).clamp(0.0, 1.0) as f32;
    }
    gain
}

/// Convert a frame count to a sample count at `sample_rate`, rounding to nearest.
pub fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;

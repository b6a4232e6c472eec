use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate narration is decoded and mixed at.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Stream facts reported by `ffprobe` for an audio file.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSourceInfo {
    /// File that was probed.
    pub source_path: PathBuf,
    /// Container duration in seconds (0 when unknown).
    pub duration_sec: f64,
    /// Native sample rate of the first audio stream.
    pub sample_rate: u32,
    /// Channel count of the first audio stream.
    pub channels: u16,
}

/// Decoded interleaved PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved `f32` samples in `[-1, 1]`.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Length in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.interleaved_f32.len() / usize::from(self.channels);
        frames as f64 / f64::from(self.sample_rate)
    }
}

#[cfg(feature = "media-ffmpeg")]
/// Probe the first audio stream of `source_path` with `ffprobe`.
pub fn probe_audio(source_path: &Path) -> ReelResult<AudioSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        sample_rate: Option<String>,
        channels: Option<u16>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::evaluation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::evaluation(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::evaluation(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| {
            ReelError::evaluation(format!(
                "no audio stream found in '{}'",
                source_path.display()
            ))
        })?;
    let sample_rate = stream
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| ReelError::evaluation("missing audio sample_rate from ffprobe"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(AudioSourceInfo {
        source_path: source_path.to_path_buf(),
        duration_sec,
        sample_rate,
        channels: stream.channels.unwrap_or(2),
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe the first audio stream of `source_path` with `ffprobe`.
pub fn probe_audio(_source_path: &Path) -> ReelResult<AudioSourceInfo> {
    Err(ReelError::evaluation(
        "narration audio requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
/// Decode `path` to interleaved stereo `f32` at `sample_rate` with `ffmpeg`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            ReelError::evaluation(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(ReelError::evaluation(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let pcm = f32le_bytes_to_samples(&out.stdout)?;
    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode `path` to interleaved stereo `f32` at `sample_rate` with `ffmpeg`.
pub fn decode_audio_f32_stereo(_path: &Path, _sample_rate: u32) -> ReelResult<AudioPcm> {
    Err(ReelError::evaluation(
        "narration audio requires the 'media-ffmpeg' feature",
    ))
}

#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
fn f32le_bytes_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::evaluation(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;

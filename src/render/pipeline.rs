use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::fonts::resolve_asset_path;
use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::audio::mix::{build_narration_manifest, mix_manifest, write_mix_to_f32le_file};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::eval::evaluator::Evaluator;
use crate::eval::prepared::PreparedReel;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::cpu::CpuBackend;

/// Evaluate and render a single frame.
///
/// Returns **premultiplied** RGBA8 pixels.
pub fn render_frame(
    prepared: &PreparedReel,
    frame: FrameIndex,
    backend: &mut dyn RenderBackend,
) -> ReelResult<FrameRGBA> {
    let eval = Evaluator::eval_frame(prepared, frame)?;
    backend.render_frame(prepared, &eval)
}

#[derive(Clone, Debug)]
/// Threading and chunking controls for multi-frame rendering.
pub struct RenderThreading {
    /// Render each chunk on a rayon pool when `true`.
    pub parallel: bool,
    /// Frames per chunk. Frames are evaluated, rendered and handed on one chunk at a time.
    pub chunk_size: usize,
    /// Worker thread count. `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Frames requested.
    pub frames_total: u64,
    /// Frames rasterized.
    pub frames_rendered: u64,
    /// Chunks processed.
    pub chunks: u64,
}

impl RenderStats {
    fn add_chunk(&mut self, frames: u64) {
        self.frames_total += frames;
        self.frames_rendered += frames;
        self.chunks += 1;
    }
}

/// Render `range` into memory.
///
/// The parallel path builds one [`CpuBackend`] per worker from
/// [`RenderBackend::worker_render_settings`] and yields the same frames as the sequential path.
pub fn render_frames(
    prepared: &PreparedReel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    threading: &RenderThreading,
) -> ReelResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    let stats = for_each_chunk(prepared, range, backend, threading, |frames| {
        out.extend(frames.into_iter().map(|(_, f)| f));
        Ok(())
    })?;
    Ok((out, stats))
}

/// Render `range` and push every frame, in order, into `sink`.
pub fn render_to_sink(
    prepared: &PreparedReel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
    audio: Option<AudioInputConfig>,
) -> ReelResult<RenderStats> {
    let canvas = prepared.config.canvas;
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: prepared.config.fps,
        audio,
    })?;
    let stats = for_each_chunk(prepared, range, backend, threading, |frames| {
        for (idx, frame) in &frames {
            sink.push_frame(*idx, frame)?;
        }
        Ok(())
    })?;
    sink.end()?;
    Ok(stats)
}

fn for_each_chunk(
    prepared: &PreparedReel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    threading: &RenderThreading,
    mut consume: impl FnMut(Vec<(FrameIndex, FrameRGBA)>) -> ReelResult<()>,
) -> ReelResult<RenderStats> {
    check_range(prepared, range)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let mut parallel = None;
    if threading.parallel {
        let settings = backend.worker_render_settings().ok_or_else(|| {
            ReelError::evaluation("parallel render requires backend worker settings (CpuBackend)")
        })?;
        parallel = Some((settings, build_thread_pool(threading.threads)?));
    }

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        let frames = match &parallel {
            Some((settings, pool)) => render_chunk_parallel(prepared, chunk, settings, pool)?,
            None => render_chunk_sequential(prepared, chunk, backend)?,
        };
        tracing::debug!(start = chunk_start, end = chunk_end, "rendered chunk");
        consume(frames)?;
        stats.add_chunk(chunk.len_frames());
        chunk_start = chunk_end;
    }
    Ok(stats)
}

fn render_chunk_sequential(
    prepared: &PreparedReel,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
) -> ReelResult<Vec<(FrameIndex, FrameRGBA)>> {
    let mut out = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        let idx = FrameIndex(f);
        out.push((idx, render_frame(prepared, idx, backend)?));
    }
    Ok(out)
}

fn render_chunk_parallel(
    prepared: &PreparedReel,
    range: FrameRange,
    settings: &RenderSettings,
    pool: &rayon::ThreadPool,
) -> ReelResult<Vec<(FrameIndex, FrameRGBA)>> {
    let evals = (range.start.0..range.end.0)
        .map(|f| Evaluator::eval_frame(prepared, FrameIndex(f)))
        .collect::<ReelResult<Vec<_>>>()?;

    let rendered = pool.install(|| {
        evals
            .par_iter()
            .map_init(
                || CpuBackend::new(settings.clone()),
                |worker, eval| -> ReelResult<(FrameIndex, FrameRGBA)> {
                    Ok((eval.frame, worker.render_frame(prepared, eval)?))
                },
            )
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

fn check_range(prepared: &PreparedReel, range: FrameRange) -> ReelResult<()> {
    if range.is_empty() {
        return Err(ReelError::validation("render range must be non-empty"));
    }
    if range.end.0 > prepared.duration_frames() {
        return Err(ReelError::validation(format!(
            "render range end {} exceeds reel duration {} frames",
            range.end.0,
            prepared.duration_frames()
        )));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Frames to render. `None` renders the whole reel.
    pub range: Option<FrameRange>,
    /// Background to flatten alpha over (straight RGBA8).
    pub bg_rgba: [u8; 4],
    /// Replace `out_path` if it exists.
    pub overwrite: bool,
    /// Mux the configured narration.
    pub audio: bool,
    /// Threading and chunking.
    pub threading: RenderThreading,
}

impl RenderToMp4Opts {
    /// Defaults for writing the whole reel to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            range: None,
            bg_rgba: [0, 0, 0, 255],
            overwrite: true,
            audio: true,
            threading: RenderThreading::default(),
        }
    }
}

/// Render the reel to an MP4 through the system `ffmpeg`, with the narration mixed in.
///
/// Narration is read from `assets_root`. A configured narration file that does not exist is
/// skipped with a warning and the video is silent.
#[tracing::instrument(skip_all, fields(out = %opts.out_path.display()))]
pub fn render_to_mp4(
    prepared: &PreparedReel,
    opts: &RenderToMp4Opts,
    backend: &mut dyn RenderBackend,
    assets_root: &Path,
) -> ReelResult<RenderStats> {
    if !is_ffmpeg_on_path() {
        return Err(ReelError::evaluation(
            "ffmpeg is required for MP4 rendering, but was not found on PATH",
        ));
    }
    let range = opts.range.unwrap_or(FrameRange {
        start: FrameIndex(0),
        end: FrameIndex(prepared.duration_frames()),
    });
    check_range(prepared, range)?;

    let mut audio_tmp = TempFileGuard(None);
    let audio = if opts.audio {
        narration_mix(prepared, range, assets_root, &mut audio_tmp)?
    } else {
        None
    };

    tracing::info!(
        frames = range.len_frames(),
        audio = audio.is_some(),
        parallel = opts.threading.parallel,
        "rendering mp4"
    );
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: opts.out_path.clone(),
        overwrite: opts.overwrite,
        bg_rgba: opts.bg_rgba,
    });
    let stats = render_to_sink(prepared, range, backend, &opts.threading, &mut sink, audio)?;
    drop(audio_tmp);
    tracing::info!(frames = stats.frames_rendered, "wrote mp4");
    Ok(stats)
}

fn narration_mix(
    prepared: &PreparedReel,
    range: FrameRange,
    assets_root: &Path,
    guard: &mut TempFileGuard,
) -> ReelResult<Option<AudioInputConfig>> {
    let Some(narration) = &prepared.config.narration else {
        return Ok(None);
    };
    let path = resolve_asset_path(assets_root, &narration.source)?;
    if !path.is_file() {
        tracing::warn!(
            path = %path.display(),
            "narration file not found; rendering without audio"
        );
        return Ok(None);
    }

    let pcm = decode_audio_f32_stereo(&path, MIX_SAMPLE_RATE)?;
    let manifest = build_narration_manifest(narration, &pcm, range, prepared.config.fps)?;
    if manifest.segments.is_empty() {
        return Ok(None);
    }
    let mixed = mix_manifest(&manifest);
    let tmp = std::env::temp_dir().join(format!(
        "karaoke_reel_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    write_mix_to_f32le_file(&mixed, &tmp)?;
    guard.0 = Some(tmp.clone());
    Ok(Some(AudioInputConfig {
        path: tmp,
        sample_rate: manifest.sample_rate,
        channels: manifest.channels,
    }))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

//! karaoke-reel renders short vertical narration videos with word-by-word karaoke captions.
//!
//! A [`VideoScript`] (hook, body parts, call to action) is laid out on a frame timeline. Every
//! frame is a pure function of its index:
//!
//! - Prepare a [`ReelComposition`] into a [`PreparedReel`] (timeline, word layout, timings)
//! - Evaluate frames with [`Evaluator::eval_frame`]
//! - Rasterize with a [`CpuBackend`], one frame at a time or streamed into a [`FrameSink`]
//! - Encode to MP4 with narration through [`render_to_mp4`] (requires `ffmpeg` on `PATH`)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod audio;
mod composition;
mod encode;
mod eval;
mod foundation;
mod karaoke;
mod layout;
mod render;
mod script;
mod timeline;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Size, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{Extrapolate, InterpolateOpts, interpolate};
pub use crate::animation::spring::{SpringConfig, spring};

pub use crate::script::model::{ScriptMetadata, ScriptSegment, VideoScript};

pub use crate::composition::config::{
    BackgroundStyle, FontConfig, FontRole, GradientStop, IndicatorStyle, NarrationConfig,
    ProgressStyle, ReelConfig, SegmentLabels, Shadow, TextStyle, Theme, WordStyle,
};
pub use crate::composition::model::ReelComposition;

pub use crate::timeline::segments::{SegmentKind, TimedSegment, Timeline};

pub use crate::karaoke::words::{WordTiming, WordVisual, split_words, word_timings, word_visual};

pub use crate::layout::flow::{ApproxMeasure, WordMeasure, label_box, layout_words};

pub use crate::assets::fonts::{FontBlob, PreparedFonts, normalize_rel_path, resolve_asset_path};
pub use crate::assets::media::{
    AudioPcm, AudioSourceInfo, MIX_SAMPLE_RATE, decode_audio_f32_stereo, probe_audio,
};
pub use crate::assets::text::{ParleyMeasure, TextBrushRgba8, TextLayoutEngine};

pub use crate::audio::mix::{
    AudioManifest, AudioSegment, build_narration_manifest, frame_to_sample, mix_manifest,
    write_mix_to_f32le_file,
};

pub use crate::eval::evaluator::{
    EvaluatedBackground, EvaluatedFrame, EvaluatedIndicator, EvaluatedProgressBar, EvaluatedWord,
    Evaluator,
};
pub use crate::eval::prepared::{PreparedReel, PreparedSegment, PreparedWord};

pub use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{
    RenderStats, RenderThreading, RenderToMp4Opts, render_frame, render_frames, render_to_mp4,
    render_to_sink,
};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png,
};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

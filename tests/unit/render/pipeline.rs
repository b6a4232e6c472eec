use super::*;
use crate::encode::sink::InMemorySink;
use crate::eval::evaluator::EvaluatedFrame;
use crate::layout::flow::ApproxMeasure;
use crate::test_support::{small_composition, test_fonts};

/// Paints every pixel with the frame index so ordering is visible without fonts.
struct FlatBackend;

impl RenderBackend for FlatBackend {
    fn render_frame(
        &mut self,
        prepared: &PreparedReel,
        eval: &EvaluatedFrame,
    ) -> ReelResult<FrameRGBA> {
        let c = prepared.config.canvas;
        let v = eval.frame.0 as u8;
        Ok(FrameRGBA {
            width: c.width,
            height: c.height,
            data: [v, v, v, 255].repeat((c.width * c.height) as usize),
            premultiplied: true,
        })
    }
}

fn prepared() -> PreparedReel {
    PreparedReel::prepare(&small_composition(), &mut ApproxMeasure::default()).unwrap()
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn sequential_frames_come_back_in_order_with_chunk_stats() {
    let p = prepared();
    let threading = RenderThreading {
        chunk_size: 4,
        ..RenderThreading::default()
    };
    let (frames, stats) = render_frames(&p, range(0, 30), &mut FlatBackend, &threading).unwrap();
    assert_eq!(frames.len(), 30);
    for (i, f) in frames.iter().enumerate() {
        assert_eq!(f.data[0], i as u8);
    }
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 30,
            frames_rendered: 30,
            chunks: 8,
        }
    );
}

#[test]
fn zero_chunk_size_renders_frame_by_frame() {
    let p = prepared();
    let threading = RenderThreading {
        chunk_size: 0,
        ..RenderThreading::default()
    };
    let (_, stats) = render_frames(&p, range(3, 6), &mut FlatBackend, &threading).unwrap();
    assert_eq!(stats.chunks, 3);
}

#[test]
fn ranges_must_fit_the_reel() {
    let p = prepared();
    let t = RenderThreading::default();
    assert!(render_frames(&p, range(0, 31), &mut FlatBackend, &t).is_err());
    assert!(render_frames(&p, range(5, 5), &mut FlatBackend, &t).is_err());
    assert!(render_frame(&p, FrameIndex(30), &mut FlatBackend).is_err());
}

#[test]
fn parallel_needs_worker_settings() {
    let p = prepared();
    let t = RenderThreading {
        parallel: true,
        ..RenderThreading::default()
    };
    let err = render_frames(&p, range(0, 2), &mut FlatBackend, &t).unwrap_err();
    assert!(err.to_string().contains("worker settings"));
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(2)).is_ok());
}

#[test]
fn sink_receives_every_frame_once_in_order() {
    let p = prepared();
    let mut sink = InMemorySink::new();
    let stats = render_to_sink(
        &p,
        range(10, 20),
        &mut FlatBackend,
        &RenderThreading::default(),
        &mut sink,
        None,
    )
    .unwrap();
    assert_eq!(stats.frames_rendered, 10);

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (240, 320));
    assert_eq!(cfg.fps, p.config.fps);
    assert!(cfg.audio.is_none());

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (10..20).collect::<Vec<_>>());
}

#[test]
fn parallel_output_matches_sequential() {
    let Some(fonts) = test_fonts() else {
        return;
    };
    let p = prepared();
    let settings = RenderSettings { fonts };
    let (seq, _) = render_frames(
        &p,
        range(0, 12),
        &mut CpuBackend::new(settings.clone()),
        &RenderThreading::default(),
    )
    .unwrap();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 5,
        threads: Some(2),
    };
    let (par, stats) =
        render_frames(&p, range(0, 12), &mut CpuBackend::new(settings), &threading).unwrap();
    assert_eq!(stats.chunks, 3);
    assert_eq!(seq, par);
}

#[test]
fn missing_narration_file_renders_silent() {
    let mut comp = small_composition();
    comp.config.narration = Some(crate::composition::config::NarrationConfig {
        source: "does-not-exist.mp3".to_owned(),
        ..Default::default()
    });
    let p = PreparedReel::prepare(&comp, &mut ApproxMeasure::default()).unwrap();
    let mut guard = TempFileGuard(None);
    let root = std::env::temp_dir();
    let audio = narration_mix(&p, range(0, 30), &root, &mut guard).unwrap();
    assert!(audio.is_none());
    assert!(guard.0.is_none());
}

#[test]
fn no_narration_configured_means_no_audio() {
    let p = prepared();
    let mut guard = TempFileGuard(None);
    let audio = narration_mix(&p, range(0, 30), Path::new("."), &mut guard).unwrap();
    assert!(audio.is_none());
}

#[test]
fn mp4_opts_default_to_whole_reel_with_audio() {
    let opts = RenderToMp4Opts::new("out/reel.mp4");
    assert!(opts.range.is_none());
    assert!(opts.audio);
    assert!(opts.overwrite);
    assert_eq!(opts.bg_rgba, [0, 0, 0, 255]);
}

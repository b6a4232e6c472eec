use super::*;
use crate::encode::sink::AudioInputConfig;

fn cfg(width: u32, height: u32, audio: Option<AudioInputConfig>) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        audio,
    }
}

#[test]
fn flatten_transparent_pixel_returns_background() {
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_pixel_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_alpha_blends_background() {
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[100, 0, 0, 128], [0, 0, 200, 255])
        .unwrap();
    assert_eq!(dst, vec![100, 0, 100, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn odd_dimensions_are_rejected() {
    assert!(validate_sink_config(&cfg(1080, 1920, None)).is_ok());
    assert!(validate_sink_config(&cfg(1081, 1920, None)).is_err());
    assert!(validate_sink_config(&cfg(0, 1920, None)).is_err());
}

#[test]
fn silent_audio_config_is_rejected() {
    let audio = AudioInputConfig {
        path: PathBuf::from("mix.f32le"),
        sample_rate: 0,
        channels: 2,
    };
    assert!(validate_sink_config(&cfg(2, 2, Some(audio))).is_err());
}

#[test]
fn encoder_args_without_audio_drop_the_audio_stream() {
    let args = encoder_args(&cfg(1080, 1920, None), &FfmpegSinkOpts::new("out/reel.mp4"));
    assert_eq!(args[0], "-y");
    assert!(args.windows(2).any(|w| w == ["-s", "1080x1920"]));
    assert!(args.windows(2).any(|w| w == ["-r", "30/1"]));
    assert!(args.contains(&"-an".to_owned()));
    assert!(!args.contains(&"aac".to_owned()));
    assert_eq!(args.last().map(String::as_str), Some("out/reel.mp4"));
}

#[test]
fn encoder_args_with_audio_mux_aac() {
    let audio = AudioInputConfig {
        path: PathBuf::from("mix.f32le"),
        sample_rate: 48_000,
        channels: 2,
    };
    let mut opts = FfmpegSinkOpts::new("reel.mp4");
    opts.overwrite = false;
    let args = encoder_args(&cfg(1080, 1920, Some(audio)), &opts);
    assert_eq!(args[0], "-n");
    assert!(args.windows(2).any(|w| w == ["-ar", "48000"]));
    assert!(args.windows(2).any(|w| w == ["-ac", "2"]));
    assert!(args.windows(2).any(|w| w == ["-i", "mix.f32le"]));
    assert!(args.windows(2).any(|w| w == ["-c:a", "aac"]));
    assert!(args.contains(&"-shortest".to_owned()));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn encodes_a_short_clip_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = std::env::temp_dir().join(format!(
        "karaoke_reel_sink_{}/clip.mp4",
        std::process::id()
    ));
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16, None)).unwrap();
    for i in 0..5u8 {
        let frame = FrameRGBA {
            width: 16,
            height: 16,
            data: [i * 40, 0, 0, 255].repeat(256),
            premultiplied: true,
        };
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
    let _ = std::fs::remove_dir_all(out.parent().unwrap());
}

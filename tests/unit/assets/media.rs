use super::*;

#[test]
fn pcm_duration_counts_frames() {
    let pcm = AudioPcm {
        sample_rate: 48_000,
        channels: 2,
        interleaved_f32: vec![0.0; 48_000 * 2 * 3],
    };
    assert!((pcm.duration_sec() - 3.0).abs() < 1e-12);
    let empty = AudioPcm {
        sample_rate: 0,
        channels: 2,
        interleaved_f32: Vec::new(),
    };
    assert_eq!(empty.duration_sec(), 0.0);
}

#[test]
fn f32le_conversion_checks_alignment() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.5f32.to_le_bytes());
    bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
    assert_eq!(f32le_bytes_to_samples(&bytes).unwrap(), vec![0.5, -1.0]);
    assert!(f32le_bytes_to_samples(&bytes[..5]).is_err());
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn missing_file_fails_decode() {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let err = decode_audio_f32_stereo(Path::new("/nonexistent/narration.mp3"), MIX_SAMPLE_RATE)
        .unwrap_err();
    assert!(matches!(err, ReelError::Evaluation(_)));
}

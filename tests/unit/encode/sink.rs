use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: [v, v, v, 255].repeat(4),
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
        audio: None,
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("karaoke_reel_{name}_{}", std::process::id()))
}

#[test]
fn in_memory_sink_resets_on_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert_eq!(sink.config().unwrap().width, 2);
}

#[test]
fn frame_file_names_are_zero_padded() {
    assert_eq!(
        PngSequenceSink::frame_file_name(FrameIndex(42)),
        "frame_000042.png"
    );
}

#[test]
fn png_sequence_writes_one_file_per_frame() {
    let dir = scratch_dir("png_seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(10)).unwrap();
    sink.push_frame(FrameIndex(4), &frame(20)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let img = image::open(dir.join("frame_000004.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [20, 20, 20, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sequence_rejects_out_of_order_and_mismatched_frames() {
    let dir = scratch_dir("png_order");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(5), &frame(1)).unwrap();
    assert!(sink.push_frame(FrameIndex(5), &frame(1)).is_err());

    let big = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 64],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(6), &big).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_png_unpremultiplies() {
    let dir = scratch_dir("png_unpremul");
    let path = dir.join("px.png");
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    write_png(&path, &f).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
    let _ = std::fs::remove_dir_all(&dir);
}

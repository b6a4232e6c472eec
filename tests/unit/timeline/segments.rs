use super::*;
use crate::script::model::ScriptMetadata;

fn seg(text: &str, duration: f64) -> ScriptSegment {
    ScriptSegment {
        text: text.to_owned(),
        duration,
        visual: String::new(),
    }
}

fn demo_timeline() -> Timeline {
    Timeline::build(
        &VideoScript::demo(),
        Fps::new(30, 1).unwrap(),
        &SegmentLabels::default(),
    )
    .unwrap()
}

#[test]
fn demo_segments_are_back_to_back() {
    let tl = demo_timeline();
    assert_eq!(tl.duration, 1950);
    let labels: Vec<_> = tl.segments.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "HOOK", "PARTE 1", "PARTE 2", "PARTE 3", "PARTE 4", "PARTE 5", "CTA"
        ]
    );
    let mut cursor = 0;
    for s in &tl.segments {
        assert_eq!(s.range.start.0, cursor);
        cursor = s.range.end.0;
    }
    assert_eq!(cursor, tl.duration);
    assert_eq!(tl.segments[1].range, FrameRange::new(FrameIndex(150), FrameIndex(510)).unwrap());
    assert_eq!(tl.segments[6].kind, SegmentKind::Cta);
    assert_eq!(tl.segments[3].kind, SegmentKind::Body { index: 2 });
}

#[test]
fn segment_lookup_and_labels() {
    let tl = demo_timeline();
    assert_eq!(tl.segment_at(FrameIndex(0)).unwrap().0, 0);
    assert_eq!(tl.segment_at(FrameIndex(149)).unwrap().0, 0);
    assert_eq!(tl.segment_at(FrameIndex(150)).unwrap().0, 1);
    assert_eq!(tl.indicator_label(FrameIndex(509)), "PARTE 1");
    assert_eq!(tl.indicator_label(FrameIndex(510)), "PARTE 2");
    assert_eq!(tl.indicator_label(FrameIndex(1949)), "CTA");
    assert!(tl.segment_at(FrameIndex(1950)).is_none());
    assert_eq!(tl.indicator_label(FrameIndex(5000)), "CTA");
}

#[test]
fn progress_is_linear_and_clamped() {
    let tl = demo_timeline();
    assert_eq!(tl.progress(FrameIndex(0)), 0.0);
    assert!((tl.progress(FrameIndex(975)) - 0.5).abs() < 1e-12);
    assert_eq!(tl.progress(FrameIndex(99_999)), 1.0);
}

#[test]
fn local_frame_restarts_per_segment() {
    let tl = demo_timeline();
    let (_, s) = tl.segment_at(FrameIndex(160)).unwrap();
    assert_eq!(s.local_frame(FrameIndex(160)), 10);
    assert_eq!(s.local_frame(FrameIndex(3)), 0);
}

#[test]
fn durations_round_per_segment() {
    let script = VideoScript {
        hook: seg("a", 0.51),
        body: vec![seg("b", 0.51)],
        cta: seg("c", 0.51),
        metadata: ScriptMetadata::default(),
    };
    let tl = Timeline::build(&script, Fps::new(30, 1).unwrap(), &SegmentLabels::default()).unwrap();
    // 15.3 rounds to 15 three times, not round(45.9) = 46.
    assert_eq!(tl.duration, 45);
}

#[test]
fn zero_frame_segment_is_rejected() {
    let script = VideoScript {
        hook: seg("a", 1.0),
        body: vec![seg("blink", 0.01)],
        cta: seg("c", 1.0),
        metadata: ScriptMetadata::default(),
    };
    let err = Timeline::build(&script, Fps::new(30, 1).unwrap(), &SegmentLabels::default())
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("PARTE 1"));
}

#[test]
fn empty_body_goes_hook_then_cta() {
    let script = VideoScript {
        hook: seg("a", 1.0),
        body: vec![],
        cta: seg("c", 2.0),
        metadata: ScriptMetadata::default(),
    };
    let labels = SegmentLabels {
        hook: "GANCHO".to_owned(),
        ..SegmentLabels::default()
    };
    let tl = Timeline::build(&script, Fps::new(24, 1).unwrap(), &labels).unwrap();
    assert_eq!(tl.segments.len(), 2);
    assert_eq!(tl.indicator_label(FrameIndex(0)), "GANCHO");
    assert_eq!(tl.indicator_label(FrameIndex(24)), "CTA");
    assert_eq!(tl.duration, 72);
}

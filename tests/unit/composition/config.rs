use super::*;

#[test]
fn defaults_reproduce_stock_reel() {
    let cfg = ReelConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas, Canvas { width: 1080, height: 1920 });
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.narration.as_ref().unwrap().source, "narration.mp3");
    assert_eq!(cfg.labels.body(2), "PARTE 3");
    assert_eq!(cfg.theme.words.text.size_px, 72.0);
    assert_eq!(cfg.theme.words.spring.damping, 12.0);
    assert_eq!(cfg.theme.words.spring.stiffness, 200.0);
    assert_eq!(cfg.theme.background.stops.len(), 3);
    assert!(cfg.theme.shadows);
    assert_eq!(
        cfg.theme.indicator.active_background.to_rgba8_straight(),
        [0x8a, 0x2b, 0xe2, 0xff]
    );
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r##"{
        "fps": {"num": 24, "den": 1},
        "theme": {"words": {"text": {"font": "words", "size_px": 64}}, "shadows": false},
        "labels": {"body_prefix": "PART"}
    }"##;
    let cfg = ReelConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.fps.num, 24);
    assert_eq!(cfg.theme.words.text.size_px, 64.0);
    assert_eq!(cfg.theme.words.text.letter_spacing, 0.0);
    assert_eq!(cfg.theme.words.gap, 12.0);
    assert!(!cfg.theme.shadows);
    assert_eq!(cfg.labels.body(0), "PART 1");
    assert_eq!(cfg.labels.hook, "HOOK");
    assert_eq!(cfg.canvas.height, 1920);
}

#[test]
fn null_narration_disables_audio() {
    let cfg = ReelConfig::from_reader(r#"{"narration": null}"#.as_bytes()).unwrap();
    assert!(cfg.narration.is_none());
    cfg.validate().unwrap();
}

#[test]
fn json_round_trip_keeps_config() {
    let cfg = ReelConfig::default();
    let json = cfg.to_json_pretty().unwrap();
    let back = ReelConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back.canvas, cfg.canvas);
    assert_eq!(back.labels, cfg.labels);
    assert_eq!(
        back.theme.words.inactive_color.to_rgba8_straight(),
        [0x66, 0x66, 0x66, 0xff]
    );
}

#[test]
fn label_font_falls_back_to_words_font() {
    let mut fonts = FontConfig::default();
    assert_eq!(fonts.source_for(FontRole::Label), "fonts/Inter-Black.ttf");
    fonts.label = Some("fonts/Inter-Bold.ttf".to_owned());
    assert_eq!(fonts.source_for(FontRole::Label), "fonts/Inter-Bold.ttf");
    assert_eq!(fonts.source_for(FontRole::Words), "fonts/Inter-Black.ttf");
}

#[test]
fn rejects_odd_canvas_and_bad_values() {
    let mut cfg = ReelConfig::default();
    cfg.canvas.height = 1919;
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));

    let mut cfg = ReelConfig::default();
    cfg.fps.den = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    if let Some(n) = cfg.narration.as_mut() {
        n.volume = -1.0;
    }
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.theme.words.max_width = 60.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.theme.background.stops.reverse();
    cfg.theme.background.stops[0].offset = 1.0;
    cfg.theme.background.stops[2].offset = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn display_text_respects_case_transform() {
    let style = WordStyle::default().text;
    assert_eq!(style.display_text("você"), "VOCÊ");
    let plain = TextStyle {
        uppercase: false,
        ..style
    };
    assert_eq!(plain.display_text("você"), "você");
}

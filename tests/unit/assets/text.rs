use super::*;
use crate::composition::config::{FontRole, WordStyle};
use crate::test_support::{test_font, test_fonts};

#[test]
fn rejects_invalid_size() {
    let Some(font) = test_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    assert!(
        engine
            .layout_plain("A", &font, 0.0, 0.0, TextBrushRgba8::default())
            .is_err()
    );
    assert!(
        engine
            .layout_plain("A", &font, f32::NAN, 0.0, TextBrushRgba8::default())
            .is_err()
    );
}

#[test]
fn layout_is_single_line_and_caches_family() {
    let Some(font) = test_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let a = engine
        .layout_plain("TODO CRIADOR DE CONTEÚDO", &font, 72.0, 2.0, TextBrushRgba8::default())
        .unwrap();
    assert_eq!(a.lines().count(), 1);
    engine
        .layout_plain("OUTRA", &font, 72.0, 2.0, TextBrushRgba8::default())
        .unwrap();
    assert_eq!(engine.families.len(), 1);
}

#[test]
fn letter_spacing_widens_text() {
    let Some(font) = test_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let tight = engine
        .layout_plain("VERDADE", &font, 72.0, 0.0, TextBrushRgba8::default())
        .unwrap();
    let loose = engine
        .layout_plain("VERDADE", &font, 72.0, 10.0, TextBrushRgba8::default())
        .unwrap();
    assert!(loose.width() > tight.width() + 50.0);
}

#[test]
fn parley_measure_scales_with_font_size() {
    let Some(fonts) = test_fonts() else {
        return;
    };
    let mut m = ParleyMeasure::new(fonts);
    let style = WordStyle::default().text;
    assert_eq!(style.font, FontRole::Words);
    let big = m.measure("SISTEMA", &style).unwrap();
    let small = m
        .measure(
            "SISTEMA",
            &TextStyle {
                size_px: 36.0,
                ..style
            },
        )
        .unwrap();
    assert!(big.width > small.width * 1.5);
    assert!(big.height > small.height);
    assert!(big.height > 60.0);
}

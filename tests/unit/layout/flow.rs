use super::*;
use crate::composition::config::{FontRole, IndicatorStyle};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_owned()).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn single_word_is_centered_on_canvas() {
    let style = WordStyle::default();
    let rects = layout_words(
        Canvas::default(),
        &words(&["OLHA"]),
        &style,
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert_eq!(rects.len(), 1);
    let r = rects[0];
    assert!(approx(r.width(), 4.0 * (0.6 * 72.0 + 2.0)), "{r:?}");
    assert!(approx(r.height(), 1.2 * 72.0), "{r:?}");
    assert!(approx(r.center().x, 540.0), "{r:?}");
    assert!(approx(r.center().y, 960.0), "{r:?}");
}

#[test]
fn neighbors_on_a_line_are_separated_by_gap() {
    let style = WordStyle::default();
    let rects = layout_words(
        Canvas::default(),
        &words(&["EU", "VOU", "PROVAR"]),
        &style,
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert!(approx(rects[0].y0, rects[1].y0));
    assert!(approx(rects[1].x0 - rects[0].x1, 12.0));
    assert!(approx(rects[2].x0 - rects[1].x1, 12.0));
    let mid = (rects[0].x0 + rects[2].x1) / 2.0;
    assert!(approx(mid, 540.0), "{mid}");
}

#[test]
fn long_text_wraps_into_centered_lines_within_max_width() {
    let style = WordStyle::default();
    let text = "TODO CRIADOR DE CONTEÚDO QUE USA IA PRA FAZER VÍDEOS MAIS RÁPIDO TÁ NA VERDADE PERDENDO MAIS TEMPO";
    let list: Vec<String> = text.split(' ').map(str::to_owned).collect();
    let rects = layout_words(
        Canvas::default(),
        &list,
        &style,
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert_eq!(rects.len(), list.len());

    let inner_left = (1080.0 - 980.0) / 2.0 + 40.0;
    let inner_right = inner_left + 900.0;

    let mut lines: Vec<Vec<Rect>> = Vec::new();
    for r in &rects {
        assert!(r.x0 >= inner_left - 0.01 && r.x1 <= inner_right + 0.01, "{r:?}");
        match lines.last_mut() {
            Some(line) if approx(line[0].y0, r.y0) => {
                assert!(r.x0 > line[line.len() - 1].x0);
                line.push(*r);
            }
            _ => {
                if let Some(prev) = lines.last() {
                    assert!(r.y0 > prev[0].y0);
                }
                lines.push(vec![*r]);
            }
        }
    }
    assert!(lines.len() >= 3, "{} lines", lines.len());
    for line in &lines {
        let mid = (line[0].x0 + line[line.len() - 1].x1) / 2.0;
        assert!(approx(mid, 540.0), "line centered at {mid}");
    }

    let top = rects.first().unwrap().y0;
    let bottom = rects.last().unwrap().y1;
    assert!(approx((top + bottom) / 2.0, 960.0));
}

#[test]
fn overwide_word_keeps_its_measured_width() {
    let style = WordStyle::default();
    let long = "A".repeat(30);
    let rects = layout_words(
        Canvas::default(),
        &[long],
        &style,
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert!(approx(rects[0].width(), 30.0 * 45.2));
}

#[test]
fn empty_word_list_lays_out_nothing() {
    let rects = layout_words(
        Canvas::default(),
        &[],
        &WordStyle::default(),
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert!(rects.is_empty());
}

#[test]
fn label_box_adds_padding() {
    let ind = IndicatorStyle::default();
    assert_eq!(ind.text.font, FontRole::Label);
    let size = label_box(
        "HOOK",
        &ind.text,
        ind.padding_x,
        ind.padding_y,
        &mut ApproxMeasure::default(),
    )
    .unwrap();
    assert!(approx(size.width, 4.0 * (0.6 * 24.0 + 3.0) + 48.0));
    assert!(approx(size.height, 1.2 * 24.0 + 24.0));
}

#[test]
fn non_finite_measurement_is_a_layout_error() {
    struct Broken;
    impl WordMeasure for Broken {
        fn measure(&mut self, _text: &str, _style: &TextStyle) -> ReelResult<Size> {
            Ok(Size::new(f64::NAN, 10.0))
        }
    }
    let err = layout_words(
        Canvas::default(),
        &words(&["X"]),
        &WordStyle::default(),
        &mut Broken,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Layout(_)));
}

#[test]
fn max_width_excludes_padding_like_css_content_box() {
    let style = WordStyle::default();
    let list: Vec<String> = (0..60).map(|_| "A".to_owned()).collect();
    let rects = layout_words(
        Canvas::default(),
        &list,
        &style,
        &mut ApproxMeasure::default(),
    )
    .unwrap();

    // 45.2px words with 12px gaps: 15 fit in 900px (846px), 16 would not (903.2px).
    let first_line = rects
        .iter()
        .filter(|r| approx(r.y0, rects[0].y0))
        .count();
    assert_eq!(first_line, 15);
    let span = rects[14].x1 - rects[0].x0;
    assert!(approx(span, 846.0), "{span}");
    assert!(approx((rects[0].x0 + rects[14].x1) / 2.0, 540.0));
}

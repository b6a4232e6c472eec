use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 1.0));

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    let bad: Result<Color, _> = serde_json::from_value(json!([0.25, 0.5]));
    assert!(bad.is_err());
}

#[test]
fn rejects_malformed_hex() {
    assert!(Color::parse_hex("#12345").is_err());
    assert!(Color::parse_hex("#zzzzzz").is_err());
}

#[test]
fn serializes_as_hex_and_reads_back() {
    let accent = Color::from_rgb8_alpha(0x8a, 0x2b, 0xe2, 1.0);
    let s = serde_json::to_string(&accent).unwrap();
    assert_eq!(s, "\"#8a2be2ff\"");
    let back: Color = serde_json::from_str(&s).unwrap();
    assert_eq!(back.to_rgba8_straight(), [0x8a, 0x2b, 0xe2, 0xff]);
}

#[test]
fn premul_quantization_scales_by_alpha() {
    let glow = Color::from_rgb8_alpha(138, 43, 226, 0.5);
    let p = glow.to_rgba8_premul();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 69);
    assert_eq!(p.b, 113);
}

#[test]
fn alpha_mul_and_lerp() {
    let white = Color::rgba(1.0, 1.0, 1.0, 1.0);
    assert!((white.with_alpha_mul(0.3).a - 0.3).abs() < 1e-12);

    let grey = Color::lerp(Color::rgba(0.0, 0.0, 0.0, 1.0), white, 0.5);
    assert!((grey.r - 0.5).abs() < 1e-12);
}

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn maps_inside_single_segment() {
    let v = interpolate(5.0, &[0.0, 10.0], &[0.0, 100.0], InterpolateOpts::default()).unwrap();
    assert!(approx(v, 50.0));
}

#[test]
fn word_fade_in_shape() {
    // Fade from 0.3 to 1 over the five frames before a word starts.
    let opts = InterpolateOpts::clamped();
    let start = 20.0;
    let at = |f: f64| interpolate(f, &[start - 5.0, start], &[0.3, 1.0], opts).unwrap();
    assert!(approx(at(0.0), 0.3));
    assert!(approx(at(15.0), 0.3));
    assert!(approx(at(17.5), 0.65));
    assert!(approx(at(20.0), 1.0));
    assert!(approx(at(80.0), 1.0));
}

#[test]
fn extend_continues_boundary_segment() {
    let opts = InterpolateOpts::default();
    assert!(approx(
        interpolate(-5.0, &[0.0, 10.0], &[0.0, 1.0], opts).unwrap(),
        -0.5
    ));
    assert!(approx(
        interpolate(20.0, &[0.0, 10.0], &[0.0, 1.0], opts).unwrap(),
        2.0
    ));
}

#[test]
fn identity_returns_input_outside_range() {
    let opts = InterpolateOpts {
        extrapolate_left: Extrapolate::Identity,
        extrapolate_right: Extrapolate::Identity,
        ..InterpolateOpts::default()
    };
    assert!(approx(
        interpolate(-7.0, &[0.0, 1.0], &[10.0, 20.0], opts).unwrap(),
        -7.0
    ));
    assert!(approx(
        interpolate(9.0, &[0.0, 1.0], &[10.0, 20.0], opts).unwrap(),
        9.0
    ));
}

#[test]
fn multi_segment_picks_governing_pair() {
    let ins = [0.0, 10.0, 20.0];
    let outs = [0.0, 1.0, 0.0];
    let opts = InterpolateOpts::clamped();
    assert!(approx(interpolate(5.0, &ins, &outs, opts).unwrap(), 0.5));
    assert!(approx(interpolate(10.0, &ins, &outs, opts).unwrap(), 1.0));
    assert!(approx(interpolate(15.0, &ins, &outs, opts).unwrap(), 0.5));
    assert!(approx(interpolate(25.0, &ins, &outs, opts).unwrap(), 0.0));
}

#[test]
fn easing_applies_within_segment() {
    let opts = InterpolateOpts::clamped().with_ease(Ease::InQuad);
    let v = interpolate(5.0, &[0.0, 10.0], &[0.0, 1.0], opts).unwrap();
    assert!(approx(v, 0.25));
}

#[test]
fn rejects_bad_ranges() {
    let opts = InterpolateOpts::default();
    assert!(interpolate(0.0, &[0.0], &[0.0], opts).is_err());
    assert!(interpolate(0.0, &[0.0, 1.0], &[0.0], opts).is_err());
    assert!(interpolate(0.0, &[1.0, 1.0], &[0.0, 1.0], opts).is_err());
    assert!(interpolate(0.0, &[2.0, 1.0], &[0.0, 1.0], opts).is_err());
    assert!(interpolate(f64::NAN, &[0.0, 1.0], &[0.0, 1.0], opts).is_err());
    let err = interpolate(0.0, &[0.0, f64::INFINITY], &[0.0, 1.0], opts).unwrap_err();
    assert!(matches!(err, ReelError::Animation(_)));
}

#[test]
fn flat_output_is_constant() {
    let v = interpolate(50.0, &[0.0, 1.0], &[4.0, 4.0], InterpolateOpts::default()).unwrap();
    assert!(approx(v, 4.0));
}

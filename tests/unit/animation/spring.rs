use super::*;

fn word_pop() -> SpringConfig {
    SpringConfig {
        damping: 12.0,
        stiffness: 200.0,
        ..SpringConfig::default()
    }
}

#[test]
fn starts_at_rest() {
    assert_eq!(spring(0.0, 30.0, SpringConfig::default()).unwrap(), 0.0);
    assert_eq!(spring(-4.0, 30.0, word_pop()).unwrap(), 0.0);
}

#[test]
fn settles_at_target() {
    let v = spring(300.0, 30.0, word_pop()).unwrap();
    assert!((v - 1.0).abs() < 1e-4, "{v}");
}

#[test]
fn rises_quickly_in_first_frames() {
    let f1 = spring(1.0, 30.0, word_pop()).unwrap();
    let f3 = spring(3.0, 30.0, word_pop()).unwrap();
    assert!(f1 > 0.0 && f1 < 1.0, "{f1}");
    assert!(f3 > f1, "{f1} {f3}");
}

#[test]
fn underdamped_spring_overshoots_unless_clamped() {
    let cfg = SpringConfig::default();
    assert!(cfg.damping_ratio() < 1.0);
    let peak = (0..90)
        .map(|f| spring(f64::from(f), 30.0, cfg).unwrap())
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.05, "{peak}");

    let clamped = SpringConfig {
        overshoot_clamping: true,
        ..cfg
    };
    for f in 0..90 {
        assert!(spring(f64::from(f), 30.0, clamped).unwrap() <= 1.0);
    }
}

#[test]
fn critically_damped_spring_never_overshoots() {
    let cfg = SpringConfig {
        damping: 20.0,
        stiffness: 100.0,
        ..SpringConfig::default()
    };
    assert!(cfg.damping_ratio() >= 1.0);
    let mut prev = 0.0;
    for f in 0..120 {
        let v = spring(f64::from(f), 30.0, cfg).unwrap();
        assert!(v <= 1.0 + 1e-12, "{v}");
        assert!(v >= prev - 1e-12);
        prev = v;
    }
}

#[test]
fn fractional_frames_fall_between_neighbors() {
    let a = spring(2.0, 30.0, word_pop()).unwrap();
    let mid = spring(2.5, 30.0, word_pop()).unwrap();
    let b = spring(3.0, 30.0, word_pop()).unwrap();
    assert!(a < mid && mid < b, "{a} {mid} {b}");
}

#[test]
fn is_deterministic() {
    let a = spring(17.25, 30.0, word_pop()).unwrap();
    let b = spring(17.25, 30.0, word_pop()).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn rejects_invalid_parameters() {
    assert!(spring(1.0, 0.0, SpringConfig::default()).is_err());
    assert!(spring(f64::NAN, 30.0, SpringConfig::default()).is_err());
    let zero_damping = SpringConfig {
        damping: 0.0,
        ..SpringConfig::default()
    };
    let err = spring(1.0, 30.0, zero_damping).unwrap_err();
    assert!(matches!(err, ReelError::Animation(_)));
}

//! Damped spring sampled on the frame grid.
//!
//! The spring starts at rest at 0 and is pulled towards 1. Its state is advanced frame by
//! frame with the closed-form damped harmonic oscillator solution, so a given frame always
//! yields the same value regardless of which frames were sampled before.

use crate::foundation::error::{ReelError, ReelResult};

// Longest single integration step, in milliseconds.
const MAX_STEP_MS: f64 = 64.0;

/// Physical parameters of a spring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Damping coefficient.
    pub damping: f64,
    /// Mass of the moving body.
    pub mass: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Never report a position past the target.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Reject non-finite or non-positive parameters.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("mass", self.mass),
            ("stiffness", self.stiffness),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::animation(format!(
                    "spring {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Damping ratio `zeta`. Values below 1 oscillate around the target.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

#[derive(Clone, Copy, Debug)]
struct SpringState {
    last_ms: f64,
    position: f64,
    velocity: f64,
}

/// Position of a 0 -> 1 spring at `frame` (fractional frames allowed, negatives count as 0).
pub fn spring(frame: f64, fps: f64, cfg: SpringConfig) -> ReelResult<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ReelError::animation(format!(
            "spring fps must be finite and > 0, got {fps}"
        )));
    }
    if frame.is_nan() {
        return Err(ReelError::animation("spring frame must not be NaN"));
    }
    cfg.validate()?;

    const TARGET: f64 = 1.0;

    let frame = frame.max(0.0);
    let whole = frame.floor();
    let remainder = frame - whole;

    let mut state = SpringState {
        last_ms: 0.0,
        position: 0.0,
        velocity: 0.0,
    };

    // Past a few hundred seconds every spring has long settled.
    let steps = whole.min(1.0e6) as u64;
    for f in 0..=steps {
        let f = if f == steps {
            f as f64 + remainder
        } else {
            f as f64
        };
        let now_ms = f / fps * 1000.0;
        state = advance(state, now_ms, TARGET, &cfg);
    }

    let value = if cfg.overshoot_clamping {
        state.position.min(TARGET)
    } else {
        state.position
    };
    Ok(value)
}

fn advance(state: SpringState, now_ms: f64, target: f64, cfg: &SpringConfig) -> SpringState {
    let dt_ms = (now_ms - state.last_ms).min(MAX_STEP_MS);
    let t = dt_ms / 1000.0;

    let v0 = -state.velocity;
    let x0 = target - state.position;
    let zeta = cfg.damping_ratio();
    let omega0 = (cfg.stiffness / cfg.mass).sqrt();

    let (position, velocity) = if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let (sin1, cos1) = (omega1 * t).sin_cos();
        let envelope = (-zeta * omega0 * t).exp();
        let frag = envelope * (sin1 * ((v0 + zeta * omega0 * x0) / omega1) + x0 * cos1);
        let position = target - frag;
        let velocity = zeta * omega0 * frag
            - envelope * (cos1 * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin1);
        (position, velocity)
    } else {
        let envelope = (-omega0 * t).exp();
        let position = target - envelope * (x0 + (v0 + omega0 * x0) * t);
        let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
        (position, velocity)
    };

    SpringState {
        last_ms: now_ms,
        position,
        velocity,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;

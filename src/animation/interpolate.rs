//! Piecewise-linear value mapping.
//!
//! `interpolate(frame, [a, b], [from, to], opts)` is the building block for every time-driven
//! value in a reel: word fade-ins, the progress bar, anything keyed on frame numbers.

use crate::animation::ease::Ease;
use crate::foundation::error::{ReelError, ReelResult};

/// What happens to inputs outside the input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Continue the boundary segment's linear function.
    #[default]
    Extend,
    /// Hold the boundary output value.
    Clamp,
    /// Return the input unchanged.
    Identity,
}

/// Options for [`interpolate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InterpolateOpts {
    /// Curve applied inside each segment.
    pub ease: Ease,
    /// Behavior below the first input.
    pub extrapolate_left: Extrapolate,
    /// Behavior above the last input.
    pub extrapolate_right: Extrapolate,
}

impl InterpolateOpts {
    /// Clamp on both sides.
    pub fn clamped() -> Self {
        Self {
            ease: Ease::Linear,
            extrapolate_left: Extrapolate::Clamp,
            extrapolate_right: Extrapolate::Clamp,
        }
    }

    /// Replace the easing curve.
    pub fn with_ease(self, ease: Ease) -> Self {
        Self { ease, ..self }
    }
}

/// Map `input` through the piecewise-linear function defined by `input_range -> output_range`.
///
/// `input_range` must be strictly increasing and both ranges must have the same length (>= 2).
pub fn interpolate(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    opts: InterpolateOpts,
) -> ReelResult<f64> {
    validate_ranges(input, input_range, output_range)?;

    let seg = find_segment(input, input_range);
    Ok(interpolate_segment(
        input,
        (input_range[seg], input_range[seg + 1]),
        (output_range[seg], output_range[seg + 1]),
        opts,
    ))
}

fn validate_ranges(input: f64, input_range: &[f64], output_range: &[f64]) -> ReelResult<()> {
    if !input.is_finite() {
        return Err(ReelError::animation("interpolate input must be finite"));
    }
    if input_range.len() != output_range.len() {
        return Err(ReelError::animation(format!(
            "interpolate ranges must have the same length (input {}, output {})",
            input_range.len(),
            output_range.len()
        )));
    }
    if input_range.len() < 2 {
        return Err(ReelError::animation(
            "interpolate ranges must have at least 2 values",
        ));
    }
    if input_range
        .iter()
        .chain(output_range.iter())
        .any(|v| !v.is_finite())
    {
        return Err(ReelError::animation("interpolate ranges must be finite"));
    }
    for w in input_range.windows(2) {
        if w[0] >= w[1] {
            return Err(ReelError::animation(format!(
                "interpolate input range must be strictly increasing, got {} then {}",
                w[0], w[1]
            )));
        }
    }
    Ok(())
}

// Index of the segment `[range[i], range[i + 1]]` that governs `input`.
fn find_segment(input: f64, range: &[f64]) -> usize {
    let last = range.len() - 2;
    (1..range.len() - 1)
        .find(|&i| range[i] >= input)
        .map_or(last, |i| i - 1)
}

fn interpolate_segment(
    input: f64,
    (in_min, in_max): (f64, f64),
    (out_min, out_max): (f64, f64),
    opts: InterpolateOpts,
) -> f64 {
    let mut x = input;
    if x < in_min {
        match opts.extrapolate_left {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_min,
            Extrapolate::Extend => {}
        }
    }
    if x > in_max {
        match opts.extrapolate_right {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_max,
            Extrapolate::Extend => {}
        }
    }

    if out_min == out_max {
        return out_min;
    }

    let t = (x - in_min) / (in_max - in_min);
    // Easing curves are defined on [0, 1]; extended segments continue linearly.
    let eased = if (0.0..=1.0).contains(&t) {
        opts.ease.apply(t)
    } else {
        t
    };
    out_min + eased * (out_max - out_min)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;

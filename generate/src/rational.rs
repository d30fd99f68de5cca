//! LCM-based `multipleOf` alignment and exclusive-bound epsilon handling
//! (§4.5 "Primitive precedence").

/// Scale a decimal value to an integer at `precision` decimal places,
/// rounding to the nearest representable unit.
fn scale(value: f64, precision: u32) -> i64 {
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    (value * factor).round() as i64
}

fn unscale(value: i64, precision: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    value as f64 / factor
}

fn gcd_u64(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd_u64(b, a % b)
    }
}

fn lcm_u64(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd_u64(a, b) * b
    }
}

/// Combine `allOf`-merged `multipleOf` steps into a single step via LCM over
/// their fixed-point representations at `decimal_precision`. Returns `None`
/// when `steps` is empty.
#[must_use]
pub fn combine_multiple_of(steps: &[f64], decimal_precision: u32) -> Option<f64> {
    let mut iter = steps.iter().copied();
    let first = scale(iter.next()?, decimal_precision).unsigned_abs();
    let combined = iter.fold(first, |acc, step| lcm_u64(acc, scale(step, decimal_precision).unsigned_abs()));
    if combined == 0 {
        None
    } else {
        Some(unscale(i64::try_from(combined).unwrap_or(i64::MAX), decimal_precision))
    }
}

/// Round `value` up to the nearest multiple of `step` at or above `value`.
#[must_use]
pub fn align_up_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).ceil() * step
}

/// The epsilon used to push past an exclusive bound: the larger of the
/// configured decimal-precision unit and a step-relative tolerance so large
/// magnitudes are nudged proportionally rather than by a fixed tiny amount.
#[must_use]
pub fn exclusive_epsilon(bound: f64, decimal_precision: u32) -> f64 {
    let precision_unit = 10f64.powi(-i32::try_from(decimal_precision).unwrap_or(0));
    let relative = bound.abs() * 1e-9;
    precision_unit.max(relative).max(f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_multiple_of_takes_lcm_of_integers() {
        let combined = combine_multiple_of(&[2.0, 3.0], 0).unwrap();
        assert_eq!(combined, 6.0);
    }

    #[test]
    fn combine_multiple_of_handles_decimals() {
        let combined = combine_multiple_of(&[0.1, 0.25], 2).unwrap();
        assert!((combined - 0.5).abs() < 1e-9);
    }

    #[test]
    fn align_up_to_step_rounds_up() {
        assert_eq!(align_up_to_step(7.0, 5.0), 10.0);
        assert_eq!(align_up_to_step(10.0, 5.0), 10.0);
    }

    #[test]
    fn exclusive_epsilon_scales_with_magnitude() {
        let small = exclusive_epsilon(1.0, 6);
        let large = exclusive_epsilon(1e12, 6);
        assert!(large > small);
    }

    #[test]
    fn combine_multiple_of_empty_is_none() {
        assert!(combine_multiple_of(&[], 6).is_none());
    }
}

//! "Nice number" axis ticks and tick label formatting.
//!
//! Ticks land on multiples of 1, 2 or 5 times a power of ten. The same call feeds
//! drawn tick marks, tick labels and grid lines, so they always agree.

/// Default number of ticks requested per axis.
pub const DEFAULT_TICK_COUNT: usize = 5;

/// Generate ascending "nice" tick values covering `[min, max]`.
///
/// Returns a single tick when `min == max`, and no ticks when either bound is not
/// finite. Bounds given in the wrong order are swapped. A `target` of zero is
/// treated as one. When the range is too narrow for its magnitude to hold evenly
/// spaced values, the two bounds themselves are returned.
///
/// ```
/// use trueno_chart::ticks::nice_ticks;
///
/// assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
/// assert_eq!(nice_ticks(3.0, 3.0, 5), vec![3.0]);
/// ```
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    if min == max {
        return vec![min];
    }

    let step = nice_step(max - min, target.max(1));
    if !(step.is_finite() && step > 0.0) {
        return vec![min];
    }

    // Steps this close to the float spacing at the bounds cannot stay constant.
    let magnitude = min.abs().max(max.abs());
    if step < 4.0 * f64::EPSILON * magnitude {
        return vec![min, max];
    }

    let first = (min / step).ceil() * step;
    let limit = max + step * 0.001;
    let mut ticks: Vec<f64> = Vec::new();
    let mut i = 0u32;
    loop {
        let tick = first + f64::from(i) * step;
        if tick > limit || ticks.last().is_some_and(|&prev| tick <= prev) {
            break;
        }
        ticks.push(tick);
        i += 1;
    }
    ticks
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten.
#[must_use]
pub fn nice_step(range: f64, target: usize) -> f64 {
    let raw = range / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let snapped = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    snapped * magnitude
}

/// Format a value with at most six decimals, trailing zeros removed.
///
/// ```
/// use trueno_chart::ticks::format_value;
///
/// assert_eq!(format_value(2.5), "2.5");
/// assert_eq!(format_value(3.0), "3");
/// assert_eq!(format_value(0.1 + 0.2), "0.3");
/// assert_eq!(format_value(-0.0), "0");
/// ```
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ticks_zero_to_97() {
        let ticks = nice_ticks(0.0, 97.0, 6);
        assert_eq!(ticks[0], 0.0);
        let step = ticks[1] - ticks[0];
        assert!(step == 10.0 || step == 20.0);
        assert!(*ticks.last().unwrap() <= 100.0);
    }

    #[test]
    fn test_ticks_single_when_equal() {
        assert_eq!(nice_ticks(-4.5, -4.5, 5), vec![-4.5]);
    }

    #[test]
    fn test_ticks_swapped_bounds() {
        assert_eq!(nice_ticks(10.0, 0.0, 5), nice_ticks(0.0, 10.0, 5));
    }

    #[test]
    fn test_ticks_non_finite() {
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, f64::INFINITY, 5).is_empty());
    }

    #[test]
    fn test_ticks_small_range() {
        // raw step 0.00105 snaps up to 0.002
        let ticks = nice_ticks(0.0, 0.0042, 4);
        assert_eq!(ticks[0], 0.0);
        assert_relative_eq!(ticks[1] - ticks[0], 0.002, epsilon = 1e-12);
        assert_eq!(ticks.len(), 3);
    }

    #[test]
    fn test_ticks_large_magnitude() {
        let ticks = nice_ticks(1e16, 1e16 + 2.0, 5);
        assert_eq!(ticks, vec![1e16, 1e16 + 2.0]);

        let ticks = nice_ticks(1e12, 1e12 + 100.0, 5);
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 20.0).abs() < 1e-3));
    }

    #[test]
    fn test_ticks_negative_range() {
        let ticks = nice_ticks(-7.3, 2.1, 5);
        assert_eq!(ticks, vec![-6.0, -4.0, -2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_ticks_zero_target() {
        assert_eq!(nice_ticks(0.0, 10.0, 0), vec![0.0, 10.0]);
    }

    #[test]
    fn test_nice_step_snapping() {
        assert_relative_eq!(nice_step(10.0, 5), 2.0, epsilon = 1e-12);
        assert_relative_eq!(nice_step(100.0, 3), 50.0, epsilon = 1e-12);
        assert_relative_eq!(nice_step(7.0, 1), 10.0, epsilon = 1e-12);
        assert_relative_eq!(nice_step(1.0, 10), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(100.0), "100");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(-1.5), "-1.5");
        assert_eq!(format_value(1e-9), "0");
        assert_eq!(format_value(2.000_000_4), "2");
        assert_eq!(format_value(1234.5678), "1234.5678");
    }
}

//! Walking-distance label shown on cards and detail pages.

use std::f64::consts::LOG10_E;

/// Format a distance in metres as `"<m> m"` or `"<km> km"`.
///
/// The switch to kilometres happens when the integer part of
/// `ln(d) * LOG10_E + 1` exceeds 3. That is a digit count for whole metres,
/// but it is computed with exactly this float arithmetic rather than a
/// `d >= 1000.0` comparison, so fractional distances just below a power of
/// ten stay in metres. Non-finite distances count as zero digits.
///
/// Kilometres are `d / 1000` rounded to one decimal from its exact binary
/// value, so 1150 m (1.1499..) shows as `1.1 km`. A value lying exactly
/// halfway between two tenths rounds up.
#[must_use]
pub fn format_distance(distance: f64) -> String {
    if magnitude_digits(distance) > 3 {
        format!("{} km", one_decimal(distance / 1000.0))
    } else if distance.is_infinite() {
        let sign = if distance < 0.0 { "-" } else { "" };
        format!("{sign}Infinity m")
    } else {
        format!("{distance} m")
    }
}

// `as` saturates: ln(0) gives -inf -> i64::MIN, NaN -> 0.
#[allow(clippy::cast_possible_truncation)]
fn magnitude_digits(distance: f64) -> i64 {
    if !distance.is_finite() {
        return 0;
    }
    (distance.ln() * LOG10_E + 1.0) as i64
}

// `{:.1}` rounds exact ties to even; ties here go to the larger tenth. A
// tie is an odd multiple of 0.25, where `* 10` and `round` are exact.
#[allow(clippy::float_cmp)]
fn one_decimal(km: f64) -> String {
    let quarters = km * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        format!("{:.1}", (km * 10.0).round() / 10.0)
    } else {
        format!("{km:.1}")
    }
}

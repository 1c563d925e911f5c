//! Post-draw numeric shaping shared by every generated field.

/// Restrict `value` to the closed interval [lo, hi].
/// Works for integers and floats alike; callers guarantee lo <= hi.
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Round to two decimal places (currency and hours).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_truncates_to_nearest_bound() {
        assert_eq!(clamp(0, 1, 15), 1);
        assert_eq!(clamp(22, 1, 15), 15);
        assert_eq!(clamp(7, 1, 15), 7);
        assert_eq!(clamp(-3i64, 0, 10), 0);
        assert_eq!(clamp(1500.0, 20.0, 1200.0), 1200.0);
        assert_eq!(clamp(0.05, 0.2, 72.0), 0.2);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(219.996), 220.0);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(20.0), 20.0);
    }
}

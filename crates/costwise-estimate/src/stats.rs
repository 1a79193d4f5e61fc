//! Order statistics over amounts.
//!
//! Unweighted percentiles interpolate linearly between order statistics
//! (position `p * (n - 1)`). Weighted percentiles use the cumulative-weight
//! step function: the smallest value whose cumulative weight reaches `p * W`.
//! Both are monotone in `p`, which keeps `low <= point <= high`.

/// Percentile of an ascending-sorted slice, in minor units.
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[i64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let lo = sorted[lower] as f64;
    let hi = sorted[upper] as f64;
    Some(lo + (hi - lo) * (pos - lower as f64))
}

/// Median of an ascending-sorted slice.
pub fn median(sorted: &[i64]) -> Option<f64> {
    percentile(sorted, 0.5)
}

/// Weighted percentile of `(value, weight)` pairs sorted ascending by value.
///
/// Non-positive weights are ignored. Returns `None` when no positive weight remains.
pub fn weighted_percentile(sorted: &[(i64, f64)], p: f64) -> Option<f64> {
    let total: f64 = sorted.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let target = p.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last = None;
    for &(value, weight) in sorted {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last = Some(value as f64);
        if cumulative >= target {
            return last;
        }
    }
    // Float accumulation can leave `cumulative` a hair under `total`.
    last
}

/// Weighted median of `(value, weight)` pairs sorted ascending by value.
pub fn weighted_median(sorted: &[(i64, f64)]) -> Option<f64> {
    weighted_percentile(sorted, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let v = [100, 200, 300, 400];
        assert_eq!(percentile(&v, 0.0), Some(100.0));
        assert_eq!(percentile(&v, 1.0), Some(400.0));
        assert_eq!(median(&v), Some(250.0));
        assert_eq!(percentile(&v, 0.25), Some(175.0));
    }

    #[test]
    fn percentile_of_empty_is_none() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(weighted_percentile(&[], 0.5), None);
    }

    #[test]
    fn weighted_median_leans_toward_heavier_values() {
        let v = [(100, 1.0), (200, 1.0), (900, 5.0)];
        assert_eq!(weighted_median(&v), Some(900.0));
        assert_eq!(weighted_percentile(&v, 0.1), Some(100.0));
    }

    #[test]
    fn weighted_percentile_skips_zero_weights() {
        let v = [(100, 0.0), (200, 1.0)];
        assert_eq!(weighted_percentile(&v, 0.0), Some(200.0));
    }
}

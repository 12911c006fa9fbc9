/// US EPA PM2.5 breakpoints: (concentration low, concentration high,
/// index low, index high). Ranges are ascending, inclusive both ends, and
/// checked in order, so a value on a range boundary resolves to the lower
/// range. Consecutive ranges touch at one-decimal bounds (12.0 then 12.1);
/// concentrations between them fall in no range and yield no index.
pub const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 7] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

/// Estimate an air-quality index from a PM2.5 concentration by linear
/// interpolation within the containing breakpoint range, rounded to the
/// nearest whole unit. Negative, non-finite, missing, or above-top-breakpoint
/// concentrations yield None; there is no extrapolation.
pub fn pm25_to_aqi(concentration: Option<f64>) -> Option<f64> {
    let pm = concentration?;
    if !pm.is_finite() || pm < 0.0 {
        return None;
    }

    for (clow, chigh, ilow, ihigh) in PM25_BREAKPOINTS {
        if pm >= clow && pm <= chigh {
            let index = (ihigh - ilow) / (chigh - clow) * (pm - clow) + ilow;
            return Some(index.round());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_values_resolve_to_lower_range() {
        assert_eq!(pm25_to_aqi(Some(0.0)), Some(0.0));
        assert_eq!(pm25_to_aqi(Some(12.0)), Some(50.0));
        assert_eq!(pm25_to_aqi(Some(12.1)), Some(51.0));
        assert_eq!(pm25_to_aqi(Some(35.4)), Some(100.0));
        assert_eq!(pm25_to_aqi(Some(35.5)), Some(101.0));
    }

    #[test]
    fn test_monotonic_over_increasing_concentrations() {
        let inputs = [0.0, 12.0, 12.1, 35.4, 35.5, 55.4, 55.5, 150.4, 500.4];
        let outputs: Vec<f64> = inputs
            .iter()
            .map(|&pm| pm25_to_aqi(Some(pm)).unwrap())
            .collect();
        assert!(outputs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_interpolation_within_range() {
        // 14 µg/m³ sits in the 12.1-35.4 range mapped to 51-100
        assert_eq!(pm25_to_aqi(Some(14.0)), Some(55.0));
        // 60 µg/m³ sits in the 55.5-150.4 range mapped to 151-200
        assert_eq!(pm25_to_aqi(Some(60.0)), Some(153.0));
    }

    #[test]
    fn test_out_of_domain_yields_none() {
        assert_eq!(pm25_to_aqi(None), None);
        assert_eq!(pm25_to_aqi(Some(-1.0)), None);
        assert_eq!(pm25_to_aqi(Some(f64::NAN)), None);
        // No extrapolation above the top breakpoint
        assert_eq!(pm25_to_aqi(Some(500.5)), None);
        assert_eq!(pm25_to_aqi(Some(1000.0)), None);
    }

    #[test]
    fn test_gap_between_ranges_yields_none() {
        // Breakpoints touch at one decimal; 12.05 falls between ranges
        assert_eq!(pm25_to_aqi(Some(12.05)), None);
    }
}

/// Split an unsigned angle into whole degrees, whole minutes and seconds
///
/// Rounding happens on the smallest printed unit, so 59.9996" at three
/// decimals carries into the next minute instead of printing 60.000.
///
/// # Examples
/// ```
/// use coord_converter::utils::coordinates::decompose_dms;
///
/// let (degrees, minutes, seconds) = decompose_dms(50.504167, 2);
/// assert_eq!((degrees, minutes), (50, 30));
/// assert!((seconds - 15.0).abs() < 1e-9);
/// ```
pub fn decompose_dms(magnitude: f64, precision: usize) -> (u64, u64, f64) {
    let scale = 10u64.pow(precision as u32);
    let total = (magnitude.abs() * 3600.0 * scale as f64).round() as u64;

    let per_degree = 3600 * scale;
    let per_minute = 60 * scale;

    let degrees = total / per_degree;
    let remainder = total % per_degree;
    let minutes = remainder / per_minute;
    let seconds = (remainder % per_minute) as f64 / scale as f64;

    (degrees, minutes, seconds)
}

/// Split an unsigned angle into whole degrees and decimal minutes
pub fn decompose_ddm(magnitude: f64, precision: usize) -> (u64, f64) {
    let scale = 10u64.pow(precision as u32);
    let total = (magnitude.abs() * 60.0 * scale as f64).round() as u64;

    let per_degree = 60 * scale;
    let degrees = total / per_degree;
    let minutes = (total % per_degree) as f64 / scale as f64;

    (degrees, minutes)
}

pub fn format_fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_dms() {
        let (d, m, s) = decompose_dms(122.4194, 3);
        assert_eq!((d, m), (122, 25));
        assert_eq!(format_fixed(s, 3), "9.840");

        let (d, m, s) = decompose_dms(0.1275, 2);
        assert_eq!((d, m), (0, 7));
        assert_eq!(format_fixed(s, 2), "39.00");
    }

    #[test]
    fn test_rounding_carries_into_next_unit() {
        // 10° 59' 59.9999"
        let magnitude = 10.0 + 59.0 / 60.0 + 59.9999 / 3600.0;
        let (d, m, s) = decompose_dms(magnitude, 3);
        assert_eq!((d, m), (11, 0));
        assert_eq!(format_fixed(s, 3), "0.000");

        let (d, m) = decompose_ddm(45.999_999_9, 3);
        assert_eq!(d, 46);
        assert_eq!(format_fixed(m, 3), "0.000");
    }

    #[test]
    fn test_decompose_ddm() {
        let (d, m) = decompose_ddm(51.508333, 3);
        assert_eq!(d, 51);
        assert_eq!(format_fixed(m, 3), "30.500");
    }

    #[test]
    fn test_boundary_decomposes_to_zero() {
        assert_eq!(decompose_dms(180.0, 3), (180, 0, 0.0));
        assert_eq!(decompose_ddm(90.0, 3), (90, 0.0));
    }
}

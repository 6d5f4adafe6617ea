use crate::error::{ConversionError, Result};
use crate::models::{Axis, Hemisphere, MgrsReference, Notation, ParsedAngle, UtmCoordinate};
use crate::parsers::format_validator::MatchResult;
use crate::utils::constants::LATITUDE_BANDS;

/// Pull sign, degrees, minutes and seconds out of an angular match
pub fn extract(result: &MatchResult<'_>, notation: Notation, axis: Axis) -> Result<ParsedAngle> {
    let sign_glyph = result.group("sign");
    let hemisphere = result.group("hemi");

    let sign = match (sign_glyph, hemisphere) {
        (Some(_), Some(_)) => {
            return Err(ConversionError::malformed(
                format!("Ambiguous sign in '{}': both sign and hemisphere given", result.text),
                Some(axis),
            ));
        }
        (Some("-"), None) => -1.0,
        (Some(_), None) => 1.0,
        (None, Some(letter)) => hemisphere_sign(letter, axis)?,
        (None, None) => 1.0,
    };

    // Boundary values only exist with zero minutes and seconds
    if result.has("bound") {
        return ParsedAngle::new(sign, axis.limit(), 0.0, 0.0, axis);
    }

    let degrees = parse_component(result, "deg", axis)?;
    let (minutes, seconds) = match notation {
        Notation::DecimalDegrees => (0.0, 0.0),
        Notation::DecimalMinutes => (parse_component(result, "min", axis)?, 0.0),
        _ => (
            parse_component(result, "min", axis)?,
            parse_component(result, "sec", axis)?,
        ),
    };

    ParsedAngle::new(sign, degrees, minutes, seconds, axis)
}

fn hemisphere_sign(letter: &str, axis: Axis) -> Result<f64> {
    let letter = letter.to_ascii_uppercase();
    if letter.starts_with(axis.positive_hemisphere()) {
        Ok(1.0)
    } else if letter.starts_with(axis.negative_hemisphere()) {
        Ok(-1.0)
    } else {
        Err(ConversionError::malformed(
            format!("'{}' is not a {} hemisphere", letter, axis),
            Some(axis),
        ))
    }
}

fn parse_component(result: &MatchResult<'_>, name: &str, axis: Axis) -> Result<f64> {
    let raw = result.group(name).ok_or_else(|| {
        ConversionError::malformed(
            format!("Missing {} component in '{}'", name, result.text),
            Some(axis),
        )
    })?;

    raw.parse::<f64>().map_err(|_| {
        ConversionError::malformed(format!("Invalid {} value: '{}'", name, raw), Some(axis))
    })
}

fn parse_zone(result: &MatchResult<'_>) -> Result<u8> {
    let raw = result.group("zone").unwrap_or_default();
    match raw.parse::<u8>() {
        Ok(zone) if (1..=60).contains(&zone) => Ok(zone),
        _ => Err(ConversionError::malformed(
            format!("UTM zone must be between 1 and 60, got: '{}'", raw),
            None,
        )),
    }
}

fn upper(result: &MatchResult<'_>, name: &str) -> Result<char> {
    result
        .group(name)
        .and_then(|s| s.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| {
            ConversionError::malformed(format!("Missing {} in '{}'", name, result.text), None)
        })
}

/// Split an MGRS match into zone, band, 100 km square and digits
pub fn extract_mgrs(result: &MatchResult<'_>) -> Result<MgrsReference> {
    let zone = parse_zone(result)?;
    let digits = result.group("digits").unwrap_or_default();
    if digits.len() % 2 != 0 {
        return Err(ConversionError::malformed(
            format!("MGRS reference '{}' has an odd number of digits", result.text),
            None,
        ));
    }
    let (easting, northing) = digits.split_at(digits.len() / 2);

    Ok(MgrsReference {
        zone,
        band: upper(result, "band")?,
        column: upper(result, "col")?,
        row: upper(result, "row")?,
        easting: easting.to_string(),
        northing: northing.to_string(),
    })
}

/// Read zone, latitude band, easting and northing out of a UTM match
///
/// The letter is always a latitude band, so `S` means 32°N to 40°N; the
/// hemisphere follows from it.
pub fn extract_utm(result: &MatchResult<'_>) -> Result<UtmCoordinate> {
    let zone = parse_zone(result)?;
    let band = upper(result, "band")?;
    if !LATITUDE_BANDS.contains(band) {
        return Err(ConversionError::malformed(
            format!("'{}' is not a latitude band", band),
            None,
        ));
    }

    let metres = |name: &str| -> Result<f64> {
        let raw = result.group(name).unwrap_or_default();
        raw.parse::<f64>().map_err(|_| {
            ConversionError::malformed(format!("Invalid {} value: '{}'", name, raw), None)
        })
    };

    Ok(UtmCoordinate {
        zone,
        band,
        hemisphere: Hemisphere::for_band(band),
        easting: metres("easting")?,
        northing: metres("northing")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::format_validator::validate;

    fn angle(text: &str, notation: Notation, axis: Axis) -> Result<ParsedAngle> {
        let result = validate(text, notation, Some(axis))?;
        extract(&result, notation, axis)
    }

    #[test]
    fn test_extract_dms_with_hemisphere() {
        let parsed = angle("45/30/15N", Notation::DegreesMinutesSeconds, Axis::Latitude).unwrap();
        assert_eq!(parsed.sign, 1.0);
        assert_eq!(parsed.degrees, 45.0);
        assert_eq!(parsed.minutes, 30.0);
        assert_eq!(parsed.seconds, 15.0);
        assert!((parsed.to_decimal() - 45.504_166_666_7).abs() < 1e-9);

        let parsed = angle("122º25'9.840\"w", Notation::DegreesMinutesSeconds, Axis::Longitude).unwrap();
        assert!((parsed.to_decimal() - -122.4194).abs() < 1e-9);
    }

    #[test]
    fn test_sign_glyph_sets_sign() {
        let parsed = angle("-0:07:39", Notation::DegreesMinutesSeconds, Axis::Longitude).unwrap();
        assert!((parsed.to_decimal() - -0.1275).abs() < 1e-10);

        let parsed = angle("+12.5", Notation::DecimalDegrees, Axis::Longitude).unwrap();
        assert_eq!(parsed.to_decimal(), 12.5);
    }

    #[test]
    fn test_sign_and_hemisphere_is_ambiguous() {
        let err = angle("+45N", Notation::DecimalDegrees, Axis::Latitude).unwrap_err();
        assert!(matches!(err, ConversionError::MalformedValue { .. }));

        let err = angle("-45/30/15S", Notation::DegreesMinutesSeconds, Axis::Latitude).unwrap_err();
        assert!(matches!(err, ConversionError::MalformedValue { .. }));
    }

    #[test]
    fn test_boundaries_parse_exactly() {
        let north = angle("90°00'00\"N", Notation::DegreesMinutesSeconds, Axis::Latitude).unwrap();
        assert_eq!(north.to_decimal(), 90.0);

        let south = angle("-90.0", Notation::DecimalDegrees, Axis::Latitude).unwrap();
        assert_eq!(south.to_decimal(), -90.0);

        let west = angle("180 0 0 W", Notation::DegreesMinutesSeconds, Axis::Longitude).unwrap();
        assert_eq!(west.to_decimal(), -180.0);

        assert!(angle("90°00'01\"N", Notation::DegreesMinutesSeconds, Axis::Latitude).is_err());
        assert!(angle("180:00:00.5", Notation::DegreesMinutesSeconds, Axis::Longitude).is_err());
    }

    #[test]
    fn test_decimal_minutes() {
        let parsed = angle("51 30.5 N", Notation::DecimalMinutes, Axis::Latitude).unwrap();
        assert_eq!(parsed.minutes, 30.5);
        assert!((parsed.to_decimal() - 51.508_333_333).abs() < 1e-8);
    }

    #[test]
    fn test_extract_mgrs_reference() {
        let result = validate("33uxp1234", Notation::Mgrs, None).unwrap();
        let reference = extract_mgrs(&result).unwrap();

        assert_eq!(reference.zone, 33);
        assert_eq!(reference.band, 'U');
        assert_eq!(reference.column, 'X');
        assert_eq!(reference.row, 'P');
        assert_eq!(reference.easting, "12");
        assert_eq!(reference.northing, "34");

        let result = validate("61UXP1234", Notation::Mgrs, None).unwrap();
        assert!(extract_mgrs(&result).is_err());
    }

    #[test]
    fn test_extract_utm_band_sets_hemisphere() {
        let result = validate("33T 500000 4649776", Notation::Utm, None).unwrap();
        let utm = extract_utm(&result).unwrap();
        assert_eq!(utm.zone, 33);
        assert_eq!(utm.band, 'T');
        assert_eq!(utm.hemisphere, Hemisphere::North);
        assert_eq!(utm.easting, 500000.0);
        assert_eq!(utm.northing, 4649776.0);

        let result = validate("4 q 610937 2363778", Notation::Utm, None).unwrap();
        let utm = extract_utm(&result).unwrap();
        assert_eq!((utm.band, utm.hemisphere), ('Q', Hemisphere::North));

        let result = validate("23K 333000 7395000", Notation::Utm, None).unwrap();
        assert_eq!(extract_utm(&result).unwrap().hemisphere, Hemisphere::South);

        let result = validate("0N 500000 0", Notation::Utm, None).unwrap();
        assert!(extract_utm(&result).is_err());
    }

    #[test]
    fn test_band_s_is_northern() {
        // Southern California, not the southern hemisphere
        let result = validate("11S 500000 4000000", Notation::Utm, None).unwrap();
        let utm = extract_utm(&result).unwrap();
        assert_eq!(utm.band, 'S');
        assert_eq!(utm.hemisphere, Hemisphere::North);

        let result = validate("56H 334369 6250948", Notation::Utm, None).unwrap();
        assert_eq!(extract_utm(&result).unwrap().hemisphere, Hemisphere::South);
    }
}

use crate::error::{ConversionError, Result};
use crate::models::{GeoPoint, Hemisphere, MgrsReference, UtmCoordinate};
use crate::projection::utm;
use crate::utils::constants::{MGRS_COLUMN_SETS, MGRS_ROW_SETS};

const SQUARE: f64 = 100_000.0;

fn column_set(zone: u8) -> &'static str {
    MGRS_COLUMN_SETS[(zone as usize - 1) % 3]
}

fn row_set(zone: u8) -> &'static str {
    MGRS_ROW_SETS[(zone as usize - 1) % 2]
}

fn letter_at(set: &str, index: usize) -> char {
    set.as_bytes()[index % set.len()] as char
}

/// Encode a point as an MGRS reference with `precision` digits per axis
pub fn encode(point: &GeoPoint, precision: usize) -> Result<MgrsReference> {
    if precision > 5 {
        return Err(ConversionError::Configuration(format!(
            "MGRS precision must be between 0 and 5 digits, got: {}",
            precision
        )));
    }

    let band = utm::latitude_band(point.latitude)?;
    let position = utm::project(point)?;

    // Absorb series noise so exact square corners stay in their square
    let easting = (position.easting * 1e6).round() / 1e6;
    let northing = (position.northing * 1e6).round() / 1e6;

    let column = (easting / SQUARE).floor() as usize;
    if column == 0 {
        return Err(ConversionError::malformed(
            format!("Easting {} is outside the MGRS grid", easting),
            None,
        ));
    }
    let row = (northing / SQUARE).floor() as usize;

    let divisor = 10f64.powi(5 - precision as i32);
    let digits = |metres: f64| -> String {
        if precision == 0 {
            return String::new();
        }
        let value = ((metres % SQUARE) / divisor).floor() as u64;
        format!("{:0width$}", value, width = precision)
    };

    Ok(MgrsReference {
        zone: position.zone,
        band,
        column: letter_at(column_set(position.zone), column - 1),
        row: letter_at(row_set(position.zone), row),
        easting: digits(easting),
        northing: digits(northing),
    })
}

/// Decode a grid reference to the UTM position of its south-west corner
pub fn to_utm(reference: &MgrsReference) -> Result<UtmCoordinate> {
    let (band_south, _) = utm::band_limits(reference.band)?;

    let column = column_set(reference.zone)
        .find(reference.column)
        .ok_or_else(|| {
            ConversionError::malformed(
                format!(
                    "Column letter '{}' is not used in zone {}",
                    reference.column, reference.zone
                ),
                None,
            )
        })?;
    let row = row_set(reference.zone).find(reference.row).ok_or_else(|| {
        ConversionError::malformed(
            format!(
                "Row letter '{}' is not used in zone {}",
                reference.row, reference.zone
            ),
            None,
        )
    })?;

    let precision = reference.precision();
    let scale = 10f64.powi(5 - precision as i32);
    let metres = |digits: &str| -> f64 {
        if digits.is_empty() {
            0.0
        } else {
            digits.parse::<f64>().unwrap_or(0.0) * scale
        }
    };

    let easting = (column as f64 + 1.0) * SQUARE + metres(&reference.easting);
    let square_northing = row as f64 * SQUARE + metres(&reference.northing);

    let hemisphere = Hemisphere::for_band(reference.band);

    // Row letters repeat every 2000 km; lift the northing to the band's southern edge
    let band_edge = GeoPoint {
        longitude: utm::central_meridian(reference.zone),
        latitude: band_south,
    };
    let band_northing = (utm::project_in_zone(&band_edge, reference.zone).northing / SQUARE)
        .floor()
        * SQUARE;

    let mut northing = square_northing;
    while northing < band_northing {
        northing += 2_000_000.0;
    }

    Ok(UtmCoordinate {
        zone: reference.zone,
        band: reference.band,
        hemisphere,
        easting,
        northing,
    })
}

pub fn decode(reference: &MgrsReference) -> Result<GeoPoint> {
    utm::unproject(&to_utm(reference)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(text: &str) -> MgrsReference {
        use crate::models::Notation;
        use crate::parsers::{extract_mgrs, validate};

        let result = validate(text, Notation::Mgrs, None).unwrap();
        extract_mgrs(&result).unwrap()
    }

    #[test]
    fn test_decode_square_corner() {
        let utm = to_utm(&reference("33UXP0000")).unwrap();
        assert_eq!(utm.zone, 33);
        assert_eq!(utm.hemisphere, Hemisphere::North);
        assert_eq!(utm.easting, 600_000.0);
        assert_eq!(utm.northing, 5_300_000.0);
    }

    #[test]
    fn test_square_and_digits_survive_round_trip() {
        // The 1 km cell 33UXP0000 sits just south of 48°N, so its band resolves to T
        let original = reference("33UXP0000");
        let encoded = encode(&decode(&original).unwrap(), original.precision()).unwrap();
        assert_eq!(encoded.zone, 33);
        assert_eq!(encoded.band, 'T');
        assert_eq!((encoded.column, encoded.row), ('X', 'P'));
        assert_eq!((encoded.easting.as_str(), encoded.northing.as_str()), ("00", "00"));
    }

    #[test]
    fn test_round_trip_at_same_precision() {
        for text in ["33UXP1234567890", "18TWL8562811322", "4QFJ1093763778", "4QFJ12345678"] {
            let original = reference(text);
            let point = decode(&original).unwrap();
            let encoded = encode(&point, original.precision()).unwrap();
            assert_eq!(encoded.to_string(), text);
        }
    }

    #[test]
    fn test_point_round_trip_both_hemispheres() {
        for (longitude, latitude) in [
            (151.2153, -33.8568),
            (18.4241, -33.9249),
            (-58.3816, -34.6037),
            (2.2945, 48.8584),
            (139.6917, 35.6895),
        ] {
            let point = GeoPoint::new(longitude, latitude).unwrap();
            let encoded = encode(&point, 5).unwrap();
            let decoded = decode(&encoded).unwrap();
            assert_eq!(encode(&decoded, 5).unwrap(), encoded);
            assert!((decoded.latitude - latitude).abs() < 2e-5);
            assert!((decoded.longitude - longitude).abs() < 2e-5);
        }
    }

    #[test]
    fn test_encode_known_position() {
        let point = GeoPoint::new(-73.985656, 40.748433).unwrap();
        let encoded = encode(&point, 5).unwrap();
        assert_eq!(encoded.grid_zone(), "18TWL");
        assert_eq!(encode(&point, 1).unwrap().to_string(), "18TWL81");
    }

    #[test]
    fn test_unknown_square_letters_are_malformed() {
        // Zone 33 columns run S..Z
        assert!(to_utm(&reference("33UAP0000")).is_err());
        // Zone 1 columns run A..H
        assert!(to_utm(&reference("1CJJ0000")).is_err());
    }

    #[test]
    fn test_precision_above_five_is_rejected() {
        let point = GeoPoint::new(15.0, 48.0).unwrap();
        assert!(encode(&point, 6).is_err());
    }
}

//! Transverse Mercator on the WGS84 ellipsoid using the Krüger n-series
//! (sixth order), accurate to well under a millimetre inside a UTM zone.

use crate::error::{ConversionError, Result};
use crate::models::{GeoPoint, Hemisphere, UtmCoordinate};
use crate::utils::constants::{
    LATITUDE_BANDS, UTM_BAND_TOLERANCE, UTM_FALSE_EASTING, UTM_FALSE_NORTHING, UTM_K0,
    UTM_MAX_EASTING, UTM_MAX_LAT, UTM_MAX_MERIDIAN_OFFSET, UTM_MAX_NORTHING_NORTH,
    UTM_MIN_EASTING, UTM_MIN_LAT, UTM_MIN_NORTHING_SOUTH, WGS84_A, WGS84_F,
};
use once_cell::sync::Lazy;

struct KruegerSeries {
    /// First eccentricity
    e: f64,
    /// 2πA is the meridian circumference
    a: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

static SERIES: Lazy<KruegerSeries> = Lazy::new(|| {
    let e = (WGS84_F * (2.0 - WGS84_F)).sqrt();
    let n = WGS84_F / (2.0 - WGS84_F);
    let (n2, n3, n4, n5, n6) = (n * n, n.powi(3), n.powi(4), n.powi(5), n.powi(6));

    let a = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

    let alpha = [
        n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
            + 7891.0 / 37800.0 * n6,
        13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
            - 1983433.0 / 1935360.0 * n6,
        61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5
            + 167603.0 / 181440.0 * n6,
        49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
        34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
        212378941.0 / 319334400.0 * n6,
    ];

    let beta = [
        n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
            + 96199.0 / 604800.0 * n6,
        1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
            - 1118711.0 / 3870720.0 * n6,
        17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
        4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
        4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
        20648693.0 / 638668800.0 * n6,
    ];

    KruegerSeries { e, a, alpha, beta }
});

pub fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

pub fn check_coverage(point: &GeoPoint) -> Result<()> {
    if !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&point.latitude) {
        return Err(ConversionError::malformed(
            format!(
                "Latitude {} is outside UTM coverage [{}, {}]",
                point.latitude, UTM_MIN_LAT, UTM_MAX_LAT
            ),
            None,
        ));
    }
    Ok(())
}

/// UTM zone for a point, including the Norway and Svalbard exceptions
pub fn zone_for(point: &GeoPoint) -> u8 {
    let (lat, lon) = (point.latitude, point.longitude);
    let mut zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        zone = 32;
    }

    if (72.0..=84.0).contains(&lat) && (0.0..42.0).contains(&lon) {
        zone = match lon {
            l if l < 9.0 => 31,
            l if l < 21.0 => 33,
            l if l < 33.0 => 35,
            _ => 37,
        };
    }

    zone
}

pub fn latitude_band(latitude: f64) -> Result<char> {
    if !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&latitude) {
        return Err(ConversionError::malformed(
            format!("Latitude {} has no UTM latitude band", latitude),
            Some(crate::models::Axis::Latitude),
        ));
    }

    Ok(band_letter(latitude))
}

/// Band for a latitude already known to be inside UTM coverage
fn band_letter(latitude: f64) -> char {
    let index = ((latitude + 80.0) / 8.0).floor().max(0.0) as usize;
    LATITUDE_BANDS.as_bytes()[index.min(LATITUDE_BANDS.len() - 1)] as char
}

/// Southern and northern latitude of a band; X is 12° tall
pub fn band_limits(band: char) -> Result<(f64, f64)> {
    let index = LATITUDE_BANDS
        .find(band.to_ascii_uppercase())
        .ok_or_else(|| ConversionError::malformed(format!("'{}' is not a latitude band", band), None))?;

    let south = index as f64 * 8.0 + UTM_MIN_LAT;
    let north = if index == LATITUDE_BANDS.len() - 1 {
        UTM_MAX_LAT
    } else {
        south + 8.0
    };
    Ok((south, north))
}

/// Check that a decoded point lies in the band its UTM reference names
pub fn check_band(utm: &UtmCoordinate, point: &GeoPoint) -> Result<()> {
    let (south, north) = band_limits(utm.band)?;
    if point.latitude < south - UTM_BAND_TOLERANCE || point.latitude > north + UTM_BAND_TOLERANCE {
        return Err(ConversionError::malformed(
            format!(
                "UTM position {} decodes to latitude {:.6}, outside band {} [{}, {}]",
                utm, point.latitude, utm.band, south, north
            ),
            None,
        ));
    }
    Ok(())
}

/// Reject eastings and northings no UTM zone can produce
pub fn check_domain(utm: &UtmCoordinate) -> Result<()> {
    if !(UTM_MIN_EASTING..=UTM_MAX_EASTING).contains(&utm.easting) {
        return Err(ConversionError::malformed(
            format!(
                "Easting {} is outside the UTM range [{}, {}]",
                utm.easting, UTM_MIN_EASTING, UTM_MAX_EASTING
            ),
            None,
        ));
    }

    let northings = match utm.hemisphere {
        Hemisphere::North => 0.0..=UTM_MAX_NORTHING_NORTH,
        Hemisphere::South => UTM_MIN_NORTHING_SOUTH..=UTM_FALSE_NORTHING,
    };
    if !northings.contains(&utm.northing) {
        return Err(ConversionError::malformed(
            format!(
                "Northing {} is outside the UTM range [{}, {}] for the {:?} hemisphere",
                utm.northing,
                northings.start(),
                northings.end(),
                utm.hemisphere
            ),
            None,
        ));
    }
    Ok(())
}

/// Project a point into its own UTM zone
pub fn project(point: &GeoPoint) -> Result<UtmCoordinate> {
    check_coverage(point)?;
    Ok(project_in_zone(point, zone_for(point)))
}

/// Project a point against the central meridian of `zone`
pub fn project_in_zone(point: &GeoPoint, zone: u8) -> UtmCoordinate {
    let series = &*SERIES;
    let e = series.e;

    let phi = point.latitude.to_radians();
    let lambda = (point.longitude - central_meridian(zone)).to_radians();

    let tau = phi.tan();
    let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
    let tau_prime = tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt();

    let xi_prime = tau_prime.atan2(lambda.cos());
    let eta_prime = (lambda.sin() / (tau_prime * tau_prime + lambda.cos().powi(2)).sqrt()).asinh();

    let mut xi = xi_prime;
    let mut eta = eta_prime;
    for (j, alpha) in series.alpha.iter().enumerate() {
        let k = 2.0 * (j as f64 + 1.0);
        xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
        eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
    }

    let easting = UTM_K0 * series.a * eta + UTM_FALSE_EASTING;
    let mut northing = UTM_K0 * series.a * xi;

    let hemisphere = if point.latitude < 0.0 {
        northing += UTM_FALSE_NORTHING;
        Hemisphere::South
    } else {
        Hemisphere::North
    };

    UtmCoordinate {
        zone,
        band: band_letter(point.latitude),
        hemisphere,
        easting,
        northing,
    }
}

/// Inverse projection back to a WGS84 point
pub fn unproject(utm: &UtmCoordinate) -> Result<GeoPoint> {
    check_domain(utm)?;

    let series = &*SERIES;
    let e = series.e;

    let x = utm.easting - UTM_FALSE_EASTING;
    let y = match utm.hemisphere {
        Hemisphere::South => utm.northing - UTM_FALSE_NORTHING,
        Hemisphere::North => utm.northing,
    };

    let eta = x / (UTM_K0 * series.a);
    let xi = y / (UTM_K0 * series.a);

    let mut xi_prime = xi;
    let mut eta_prime = eta;
    for (j, beta) in series.beta.iter().enumerate() {
        let k = 2.0 * (j as f64 + 1.0);
        xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
        eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
    }

    let sinh_eta = eta_prime.sinh();
    let sin_xi = xi_prime.sin();
    let cos_xi = xi_prime.cos();

    let tau_prime = sin_xi / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();

    // Newton-Raphson for tau from tau'
    let one_minus_e2 = 1.0 - e * e;
    let mut tau = tau_prime;
    for _ in 0..16 {
        let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        let tau_i = tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt();
        let delta = (tau_prime - tau_i) / (1.0 + tau_i * tau_i).sqrt()
            * (1.0 + one_minus_e2 * tau * tau)
            / (one_minus_e2 * (1.0 + tau * tau).sqrt());
        tau += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }

    let latitude = tau.atan().to_degrees();
    let offset = sinh_eta.atan2(cos_xi).to_degrees();

    if !latitude.is_finite() || !offset.is_finite() {
        return Err(ConversionError::malformed(
            format!("UTM position {} does not invert to a geodetic point", utm),
            None,
        ));
    }
    if offset.abs() > UTM_MAX_MERIDIAN_OFFSET {
        return Err(ConversionError::malformed(
            format!(
                "UTM position {} lies {:.1}° from the zone {} central meridian",
                utm,
                offset.abs(),
                utm.zone
            ),
            None,
        ));
    }

    let longitude = offset + central_meridian(utm.zone);

    let longitude = wrap_longitude(longitude);
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ConversionError::malformed(
            format!("UTM position {} is outside the valid latitude range", utm),
            None,
        ));
    }

    Ok(GeoPoint {
        longitude,
        latitude,
    })
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

use crate::error::{ConversionError, Result};
use crate::models::Axis;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Canonical WGS84 position shared by every notation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        let point = Self {
            longitude,
            latitude,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn value(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.latitude,
            Axis::Longitude => self.longitude,
        }
    }
}

/// Unsigned components of an angle plus the resolved sign
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAngle {
    pub sign: f64,
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl ParsedAngle {
    pub fn new(sign: f64, degrees: f64, minutes: f64, seconds: f64, axis: Axis) -> Result<Self> {
        if !(0.0..60.0).contains(&minutes) {
            return Err(ConversionError::malformed(
                format!("Minutes must be between 0 and 60, got: {}", minutes),
                Some(axis),
            ));
        }

        if !(0.0..60.0).contains(&seconds) {
            return Err(ConversionError::malformed(
                format!("Seconds must be between 0 and 60, got: {}", seconds),
                Some(axis),
            ));
        }

        let angle = Self {
            sign,
            degrees,
            minutes,
            seconds,
        };

        if degrees < 0.0 || angle.magnitude() > axis.limit() {
            return Err(ConversionError::malformed(
                format!(
                    "{} magnitude {} is outside [0, {}]",
                    axis,
                    angle.magnitude(),
                    axis.limit()
                ),
                Some(axis),
            ));
        }

        Ok(angle)
    }

    pub fn magnitude(&self) -> f64 {
        self.degrees + self.minutes / 60.0 + self.seconds / 3600.0
    }

    pub fn to_decimal(&self) -> f64 {
        self.sign * self.magnitude()
    }
}

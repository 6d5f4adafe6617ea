use crate::error::{ConversionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Notation {
    DecimalDegrees,
    DegreesMinutesSeconds,
    DecimalMinutes,
    Mgrs,
    Utm,
}

impl Notation {
    /// Selection order of the original format list
    pub const ALL: [Notation; 5] = [
        Notation::DecimalDegrees,
        Notation::DegreesMinutesSeconds,
        Notation::DecimalMinutes,
        Notation::Mgrs,
        Notation::Utm,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ConversionError::UnsupportedNotation(index))
    }

    pub fn index(&self) -> usize {
        match self {
            Notation::DecimalDegrees => 0,
            Notation::DegreesMinutesSeconds => 1,
            Notation::DecimalMinutes => 2,
            Notation::Mgrs => 3,
            Notation::Utm => 4,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Notation::DecimalDegrees => "DD",
            Notation::DegreesMinutesSeconds => "DMS",
            Notation::DecimalMinutes => "DDM",
            Notation::Mgrs => "MGRS",
            Notation::Utm => "UTM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Notation::DecimalDegrees => "DD-Decimal degrees",
            Notation::DegreesMinutesSeconds => "DMS-Degrees-minutes-seconds",
            Notation::DecimalMinutes => "DDM-Decimal minutes",
            Notation::Mgrs => "MGRS-Military Grid Reference System",
            Notation::Utm => "UTM-Universal Transverse Mercator",
        }
    }

    /// MGRS and UTM carry both coordinates in a single token
    pub fn is_single_field(&self) -> bool {
        matches!(self, Notation::Mgrs | Notation::Utm)
    }

    pub fn is_numeric_output(&self) -> bool {
        matches!(self, Notation::DecimalDegrees)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Notation {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return Self::from_index(index);
        }

        let code = trimmed
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match code.as_str() {
            "DD" => Ok(Notation::DecimalDegrees),
            "DMS" => Ok(Notation::DegreesMinutesSeconds),
            "DDM" | "DM" => Ok(Notation::DecimalMinutes),
            "MGRS" => Ok(Notation::Mgrs),
            "UTM" => Ok(Notation::Utm),
            _ => Err(ConversionError::Configuration(format!(
                "Unknown coordinate format: '{}'. Expected one of DD, DMS, DDM, MGRS, UTM",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Notation {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Notation> for String {
    fn from(notation: Notation) -> Self {
        notation.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest magnitude in degrees
    pub fn limit(&self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    pub fn positive_hemisphere(&self) -> char {
        match self {
            Axis::Latitude => 'N',
            Axis::Longitude => 'E',
        }
    }

    pub fn negative_hemisphere(&self) -> char {
        match self {
            Axis::Latitude => 'S',
            Axis::Longitude => 'W',
        }
    }

    pub fn hemisphere_for(&self, value: f64) -> char {
        if value < 0.0 {
            self.negative_hemisphere()
        } else {
            self.positive_hemisphere()
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

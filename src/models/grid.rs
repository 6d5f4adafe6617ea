use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Bands `C` to `M` lie south of the equator
    pub fn for_band(band: char) -> Self {
        if band.to_ascii_uppercase() >= 'N' {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }
}

/// Projected UTM position; northing includes the southern false northing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoordinate {
    pub zone: u8,
    /// Latitude band letter, `C` to `X`
    pub band: char,
    pub hemisphere: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

impl UtmCoordinate {
    /// Easting part of the split X/Y rendering
    pub fn x_part(&self) -> String {
        format!("{}{} {:.0}", self.zone, self.band, whole_metres(self.easting))
    }

    pub fn y_part(&self) -> String {
        format!("{:.0}", whole_metres(self.northing))
    }
}

/// Truncate to the metre after absorbing sub-micrometre projection noise
fn whole_metres(value: f64) -> f64 {
    ((value * 1e6).round() / 1e6).floor()
}

impl fmt::Display for UtmCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x_part(), self.y_part())
    }
}

/// MGRS grid reference split into its parts
///
/// `easting` and `northing` are the digit strings inside the 100 km square;
/// both carry `precision` digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgrsReference {
    pub zone: u8,
    pub band: char,
    pub column: char,
    pub row: char,
    pub easting: String,
    pub northing: String,
}

impl MgrsReference {
    pub fn precision(&self) -> usize {
        self.easting.len()
    }

    pub fn grid_zone(&self) -> String {
        format!("{}{}{}{}", self.zone, self.band, self.column, self.row)
    }

    /// Easting part of the split X/Y rendering
    pub fn x_part(&self) -> String {
        format!("{}{}", self.grid_zone(), self.easting)
    }

    pub fn y_part(&self) -> String {
        self.northing.clone()
    }
}

impl fmt::Display for MgrsReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.grid_zone(), self.easting, self.northing)
    }
}

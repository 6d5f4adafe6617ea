use crate::error::{ConversionError, Result};
use crate::models::{Axis, Notation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Any separator between degrees, minutes and seconds, with optional padding
const SEPARATOR: &str = r#"\s*[/:\sº°'"]\s*"#;
const FRACTION: &str = r"(?:\.[0-9]{1,15})?";
const ZERO_FRACTION: &str = r"(?:\.0{1,15})?";
const ZERO_PART: &str = r"0{1,2}";
const MINUTES: &str = r"[0-5]?[0-9]";

const LAT_DEGREES: &str = r"0?[0-9]|[1-8][0-9]";
const LON_DEGREES: &str = r"0{0,2}[0-9]|0?[1-9][0-9]|1[0-7][0-9]";

const ZONE: &str = r"[0-9]{1,2}";
const BAND: &str = r"[C-HJ-NP-Xc-hj-np-x]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKey {
    Angle { notation: Notation, axis: Axis },
    Grid(Notation),
}

impl GrammarKey {
    pub fn for_notation(notation: Notation, axis: Option<Axis>) -> Result<Self> {
        if notation.is_single_field() {
            return Ok(GrammarKey::Grid(notation));
        }

        axis.map(|axis| GrammarKey::Angle { notation, axis })
            .ok_or_else(|| {
                ConversionError::Configuration(format!(
                    "{} values need a latitude or longitude axis",
                    notation
                ))
            })
    }

    pub fn axis(&self) -> Option<Axis> {
        match self {
            GrammarKey::Angle { axis, .. } => Some(*axis),
            GrammarKey::Grid(_) => None,
        }
    }

    /// Human readable name used in error messages
    pub fn label(&self) -> String {
        match self {
            GrammarKey::Angle { notation, axis } => format!("{} {}", notation, axis),
            GrammarKey::Grid(notation) => notation.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Grammar {
    pub key: GrammarKey,
    pub regex: Regex,
}

static GRAMMARS: Lazy<HashMap<GrammarKey, Grammar>> = Lazy::new(|| {
    let mut grammars = HashMap::new();

    for axis in [Axis::Latitude, Axis::Longitude] {
        for notation in [
            Notation::DecimalDegrees,
            Notation::DegreesMinutesSeconds,
            Notation::DecimalMinutes,
        ] {
            let key = GrammarKey::Angle { notation, axis };
            grammars.insert(key, compile(key, &angle_pattern(notation, axis)));
        }
    }

    for notation in [Notation::Mgrs, Notation::Utm] {
        let key = GrammarKey::Grid(notation);
        grammars.insert(key, compile(key, &grid_pattern(notation)));
    }

    grammars
});

fn compile(key: GrammarKey, pattern: &str) -> Grammar {
    let regex = Regex::new(pattern)
        .unwrap_or_else(|e| panic!("grammar for {} does not compile: {}", key.label(), e));
    Grammar { key, regex }
}

/// Look up the compiled grammar for a notation/axis pair
pub fn grammar_for(key: GrammarKey) -> Result<&'static Grammar> {
    GRAMMARS
        .get(&key)
        .ok_or_else(|| ConversionError::Configuration(format!("No grammar for {}", key.label())))
}

pub fn angle_pattern(notation: Notation, axis: Axis) -> String {
    let (bound, degrees, hemispheres) = match axis {
        Axis::Latitude => ("90", LAT_DEGREES, "NnSs"),
        Axis::Longitude => ("180", LON_DEGREES, "EeWw"),
    };

    let body = match notation {
        Notation::DecimalDegrees => format!(
            r"(?:(?P<bound>{bound}){ZERO_FRACTION}|(?P<deg>(?:{degrees}){FRACTION}))\s*[º°]?"
        ),
        Notation::DecimalMinutes => format!(
            r"(?:(?P<bound>{bound}){SEPARATOR}{ZERO_PART}{ZERO_FRACTION}|(?P<deg>{degrees}){SEPARATOR}(?P<min>{MINUTES}{FRACTION}))\s*'?"
        ),
        _ => format!(
            r#"(?:(?P<bound>{bound}){SEPARATOR}{ZERO_PART}{SEPARATOR}{ZERO_PART}{ZERO_FRACTION}|(?P<deg>{degrees}){SEPARATOR}(?P<min>{MINUTES}){SEPARATOR}(?P<sec>{MINUTES}{FRACTION}))\s*"?"#
        ),
    };

    format!(r"^(?P<sign>[+-])?\s*{body}\s*(?P<hemi>[{hemispheres}])?$")
}

pub fn grid_pattern(notation: Notation) -> String {
    match notation {
        Notation::Utm => format!(
            r"^(?P<zone>{ZONE})\s*[/:]?\s*(?P<band>{BAND})\s*[/:]?\s*(?P<easting>[0-9]{{1,7}}(?:\.[0-9]{{1,6}})?)(?:\s*[/:]\s*|\s+)(?P<northing>[0-9]{{1,8}}(?:\.[0-9]{{1,6}})?)$"
        ),
        _ => format!(
            r"^(?P<zone>{ZONE})(?P<band>{BAND})(?P<col>[A-HJ-NP-Za-hj-np-z])(?P<row>[A-HJ-NP-Va-hj-np-v])(?P<digits>(?:[0-9]{{2}}){{0,5}})$"
        ),
    }
}

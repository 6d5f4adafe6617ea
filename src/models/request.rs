use crate::formatters::RenderTemplate;
use crate::models::{Axis, Notation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a converted point is rendered to
#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    Notation(Notation),
    Custom(RenderTemplate),
}

/// One row's worth of raw coordinate text
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub raw_x: Option<String>,
    pub raw_y: Option<String>,
    pub source: Notation,
}

impl ConversionRequest {
    pub fn new(raw_x: Option<&str>, raw_y: Option<&str>, source: Notation) -> Self {
        Self {
            raw_x: non_empty(raw_x),
            raw_y: non_empty(raw_y),
            source,
        }
    }

    pub fn pair(longitude: &str, latitude: &str, source: Notation) -> Self {
        Self::new(Some(longitude), Some(latitude), source)
    }

    pub fn single(token: &str, source: Notation) -> Self {
        Self::new(Some(token), None, source)
    }

    pub fn raw(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Longitude => self.raw_x.as_deref(),
            Axis::Latitude => self.raw_y.as_deref(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Text form with numbers at a fixed number of decimals
    pub fn to_text(&self, decimal_precision: usize) -> String {
        match self {
            FieldValue::Number(value) => format!("{:.*}", decimal_precision, value),
            FieldValue::Text(text) => text.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPoint {
    pub x: FieldValue,
    pub y: FieldValue,
}

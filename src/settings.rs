use crate::error::{ConversionError, Result};
use crate::formatters::{RenderTemplate, Renderer};
use crate::models::{Notation, RenderTarget};
use crate::utils::constants::{
    CUSTOM_COORD_FORMAT, DECIMAL_PRECISION, DEFAULT_DELIMITER, ENV_PREFIX, FIELD_LENGTH,
    FIELD_PRECISION, MGRS_PRECISION, SINGLE_FIELD_COORD_FORMAT, XY_FIELD_LENGTH,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Everything a conversion run needs to know before reading rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConversionSettings {
    pub source_x_field: Option<String>,
    pub source_y_field: Option<String>,
    pub source_format: Notation,
    pub destination_format: Option<Notation>,
    pub custom_format: Option<String>,
    pub output_x_field: Option<String>,
    pub output_y_field: Option<String>,
    pub output_xy_field: Option<String>,
    pub output_coordinate_format: String,

    #[validate(range(min = 1, max = 255))]
    pub field_length: usize,

    #[validate(range(max = 12))]
    pub field_precision: usize,

    #[validate(range(max = 15))]
    pub decimal_precision: usize,

    #[validate(range(max = 5))]
    pub mgrs_precision: usize,

    #[validate(length(equal = 1))]
    pub delimiter: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            source_x_field: None,
            source_y_field: None,
            source_format: Notation::DecimalDegrees,
            destination_format: None,
            custom_format: Some(CUSTOM_COORD_FORMAT.to_string()),
            output_x_field: None,
            output_y_field: None,
            output_xy_field: None,
            output_coordinate_format: SINGLE_FIELD_COORD_FORMAT.to_string(),
            field_length: FIELD_LENGTH,
            field_precision: FIELD_PRECISION,
            decimal_precision: DECIMAL_PRECISION,
            mgrs_precision: MGRS_PRECISION,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputRole {
    X,
    Y,
    Combined,
}

/// Schema of one appended output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputColumn {
    pub name: String,
    pub role: OutputRole,
    pub kind: ColumnKind,
    pub length: usize,
    pub precision: usize,
}

impl ConversionSettings {
    /// Layer an optional settings file under `COORDCONV_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConversionError::Configuration(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let settings: ConversionSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Rules that only depend on the settings themselves
    pub fn check_consistency(&self) -> Result<()> {
        self.validate()?;

        let x = non_blank(&self.source_x_field);
        let y = non_blank(&self.source_y_field);

        if x.is_none() && y.is_none() {
            return Err(ConversionError::Configuration(
                "At least one source field must be set".to_string(),
            ));
        }

        if !self.source_format.is_single_field() && (x.is_none() || y.is_none()) {
            return Err(ConversionError::Configuration(format!(
                "{} input needs both an X and a Y source field",
                self.source_format
            )));
        }

        self.target()?;

        let outputs = self.output_names();
        if outputs.is_empty() {
            return Err(ConversionError::Configuration(
                "At least one output field (X, Y or XY) must be set".to_string(),
            ));
        }

        if non_blank(&self.output_xy_field).is_some() && self.output_coordinate_format.trim().is_empty() {
            return Err(ConversionError::Configuration(
                "A combined XY output field needs an output coordinate format".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &outputs {
            if !seen.insert(name.as_str()) {
                return Err(ConversionError::Configuration(format!(
                    "Output field '{}' is used more than once",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Rules that depend on the input table header
    pub fn check_against(&self, headers: &[String]) -> Result<()> {
        for field in self.source_fields() {
            if !headers.iter().any(|h| h == field) {
                return Err(ConversionError::Configuration(format!(
                    "Source field '{}' does not exist in the input table",
                    field
                )));
            }
        }

        for name in self.output_names() {
            if headers.iter().any(|h| h == &name) {
                return Err(ConversionError::Configuration(format!(
                    "Output field '{}' already exists in the input table",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Destination notation wins over a custom template
    pub fn target(&self) -> Result<RenderTarget> {
        if let Some(notation) = self.destination_format {
            return Ok(RenderTarget::Notation(notation));
        }

        match self.custom_format.as_deref().map(str::trim) {
            Some(format) if !format.is_empty() => {
                Ok(RenderTarget::Custom(RenderTemplate::parse(format)))
            }
            _ => Err(ConversionError::Configuration(
                "Either a destination format or a custom format must be set".to_string(),
            )),
        }
    }

    pub fn target_label(&self) -> String {
        match self.target() {
            Ok(RenderTarget::Notation(notation)) => notation.to_string(),
            Ok(RenderTarget::Custom(template)) => format!("custom '{}'", template),
            Err(_) => "none".to_string(),
        }
    }

    pub fn layout(&self) -> RenderTemplate {
        RenderTemplate::parse(&self.output_coordinate_format)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new()
            .with_precision(self.field_precision)
            .with_decimal_precision(self.decimal_precision)
            .with_mgrs_precision(self.mgrs_precision)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(ConversionError::Configuration(format!(
                "Delimiter must be a single ASCII character, got: '{}'",
                self.delimiter
            ))),
        }
    }

    pub fn source_x(&self) -> Option<&str> {
        non_blank(&self.source_x_field)
    }

    pub fn source_y(&self) -> Option<&str> {
        non_blank(&self.source_y_field)
    }

    fn source_fields(&self) -> Vec<&str> {
        self.source_x().into_iter().chain(self.source_y()).collect()
    }

    fn output_names(&self) -> Vec<String> {
        [&self.output_x_field, &self.output_y_field, &self.output_xy_field]
            .into_iter()
            .filter_map(|field| non_blank(field).map(str::to_string))
            .collect()
    }

    /// Appended columns in output order: X, Y, then the combined field
    pub fn output_columns(&self) -> Vec<OutputColumn> {
        let numeric = matches!(
            self.target(),
            Ok(RenderTarget::Notation(notation)) if notation.is_numeric_output()
        );
        let (kind, precision) = if numeric {
            (ColumnKind::Numeric, self.decimal_precision)
        } else {
            (ColumnKind::Text, self.field_precision)
        };

        let mut columns = Vec::new();
        for (field, role) in [
            (&self.output_x_field, OutputRole::X),
            (&self.output_y_field, OutputRole::Y),
        ] {
            if let Some(name) = non_blank(field) {
                columns.push(OutputColumn {
                    name: name.to_string(),
                    role,
                    kind,
                    length: self.field_length,
                    precision,
                });
            }
        }

        if let Some(name) = non_blank(&self.output_xy_field) {
            columns.push(OutputColumn {
                name: name.to_string(),
                role: OutputRole::Combined,
                kind: ColumnKind::Text,
                length: XY_FIELD_LENGTH,
                precision: self.field_precision,
            });
        }

        for column in &columns {
            debug!(
                "Output column '{}': {:?} {:?} length {} precision {}",
                column.name, column.role, column.kind, column.length, column.precision
            );
        }

        columns
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|f| !f.is_empty())
}

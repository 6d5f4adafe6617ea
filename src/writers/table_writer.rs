use crate::error::{ConversionError, Result};
use crate::readers::Table;
use crate::settings::OutputColumn;
use crate::utils::constants::DEFAULT_DELIMITER;
use std::path::Path;
use tracing::info;

/// Writes the input table back out with the converted columns appended
pub struct TableWriter {
    delimiter: u8,
}

impl TableWriter {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// `values[row][column]` holds the appended cells; `None` is written empty
    pub fn write_table(
        &self,
        path: &Path,
        table: &Table,
        columns: &[OutputColumn],
        values: &[Vec<Option<String>>],
    ) -> Result<()> {
        if values.len() != table.rows.len() {
            return Err(ConversionError::Configuration(format!(
                "Got {} converted rows for a table of {} rows",
                values.len(),
                table.rows.len()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?;

        let header = table
            .headers
            .iter()
            .map(String::as_str)
            .chain(columns.iter().map(|c| c.name.as_str()));
        writer.write_record(header)?;

        let width = table.headers.len();
        for (cells, appended) in table.rows.iter().zip(values) {
            let mut record: Vec<&str> = cells.iter().map(String::as_str).collect();
            record.resize(width, "");
            record.extend(appended.iter().map(|v| v.as_deref().unwrap_or("")));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        info!(
            "Wrote {} rows with {} appended columns to {}",
            table.rows.len(),
            columns.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

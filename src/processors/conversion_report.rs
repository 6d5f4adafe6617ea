use crate::error::{ConversionError, Result};
use crate::processors::notation_converter::{ConversionStage, StageError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub generated_at: DateTime<Utc>,
    pub source_format: String,
    pub target: String,
    pub total_rows: usize,
    pub converted_rows: usize,
    pub failed_rows: usize,
    pub failures: Vec<RowFailure>,
}

/// One row that could not be converted
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// 1-based data row, header excluded
    pub row: usize,
    pub field: String,
    pub stage: ConversionStage,
    pub kind: String,
    pub message: String,
}

impl RowFailure {
    pub fn from_stage_error(row: usize, field: &str, error: &StageError) -> Self {
        Self {
            row,
            field: field.to_string(),
            stage: error.stage,
            kind: error.error.kind().to_string(),
            message: error.error.to_string(),
        }
    }
}

impl ConversionReport {
    pub fn new(source_format: &str, target: &str) -> Self {
        Self {
            generated_at: Utc::now(),
            source_format: source_format.to_string(),
            target: target.to_string(),
            total_rows: 0,
            converted_rows: 0,
            failed_rows: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.total_rows += 1;
        self.converted_rows += 1;
    }

    pub fn record_failure(&mut self, failure: RowFailure) {
        self.total_rows += 1;
        self.failed_rows += 1;
        self.failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.failed_rows == 0
    }

    /// Failure counts grouped by error kind
    pub fn failures_by_kind(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.kind.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        let percent = |count: usize| {
            if self.total_rows == 0 {
                0.0
            } else {
                100.0 * count as f64 / self.total_rows as f64
            }
        };

        summary.push_str("=== Conversion Report ===\n");
        summary.push_str(&format!("Source Format: {}\n", self.source_format));
        summary.push_str(&format!("Target: {}\n", self.target));
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Converted Rows: {} ({:.1}%)\n",
            self.converted_rows,
            percent(self.converted_rows)
        ));
        summary.push_str(&format!(
            "Failed Rows: {} ({:.1}%)\n",
            self.failed_rows,
            percent(self.failed_rows)
        ));

        if !self.failures.is_empty() {
            summary.push_str("\nFailures by Kind:\n");
            for (kind, count) in self.failures_by_kind() {
                summary.push_str(&format!("  {}: {}\n", kind, count));
            }

            summary.push_str("\nFirst 10 Failures:\n");
            for failure in self.failures.iter().take(10) {
                summary.push_str(&format!(
                    "  Row {} [{}] while {}: {}\n",
                    failure.row, failure.field, failure.stage, failure.message
                ));
            }
        }

        summary
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?).map_err(ConversionError::from)
    }
}

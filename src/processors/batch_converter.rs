use crate::error::{ConversionError, Result};
use crate::formatters::RenderTemplate;
use crate::models::{Axis, ConversionRequest, RenderedPoint};
use crate::processors::conversion_report::{ConversionReport, RowFailure};
use crate::processors::notation_converter::{NotationConverter, StageError};
use crate::readers::Table;
use crate::settings::{ConversionSettings, OutputColumn, OutputRole};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Appended cells per row plus the run report
#[derive(Debug)]
pub struct BatchOutcome {
    pub columns: Vec<OutputColumn>,
    pub values: Vec<Vec<Option<String>>>,
    pub report: ConversionReport,
}

pub struct BatchConverter {
    settings: ConversionSettings,
    max_workers: usize,
}

impl BatchConverter {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert every row of the table; row failures are reported, never fatal
    pub fn convert_table(
        &self,
        table: &Table,
        progress: Option<&ProgressReporter>,
    ) -> Result<BatchOutcome> {
        let settings = &self.settings;
        settings.check_consistency()?;
        settings.check_against(&table.headers)?;

        let target = settings.target()?;
        let layout = settings.layout();
        let columns = settings.output_columns();
        let converter = NotationConverter::new(settings.renderer());

        let x_index = settings.source_x().and_then(|f| table.field_index(f));
        let y_index = settings.source_y().and_then(|f| table.field_index(f));

        info!(
            "Converting {} rows from {} to {} with {} workers",
            table.len(),
            settings.source_format,
            settings.target_label(),
            self.max_workers
        );

        if let Some(p) = progress {
            p.set_message(&format!("Converting {} rows...", table.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ConversionError::Configuration(e.to_string()))?;

        let processed_count = AtomicUsize::new(0);

        // par_iter + collect keeps input order
        let outcomes: Vec<std::result::Result<RenderedPoint, StageError>> = pool.install(|| {
            (0..table.len())
                .into_par_iter()
                .map(|row| {
                    let request = ConversionRequest::new(
                        x_index.and_then(|i| table.cell(row, i)),
                        y_index.and_then(|i| table.cell(row, i)),
                        settings.source_format,
                    );
                    let outcome = converter.convert_staged(&request, &target);

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    outcome
                })
                .collect()
        });

        let mut report = ConversionReport::new(settings.source_format.code(), &settings.target_label());
        let mut values = Vec::with_capacity(outcomes.len());

        for (row, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(rendered) => {
                    values.push(self.cells(&rendered, &columns, &converter, &layout));
                    report.record_success();
                }
                Err(error) if error.error.is_row_error() => {
                    let field = self.failed_field(&error);
                    warn!("Row {} ({}): {}", row + 1, field, error);
                    report.record_failure(RowFailure::from_stage_error(row + 1, &field, &error));
                    values.push(vec![None; columns.len()]);
                }
                Err(error) => return Err(error.into()),
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Converted {} of {} rows",
                report.converted_rows, report.total_rows
            ));
        }

        info!(
            "Conversion finished: {} converted, {} failed",
            report.converted_rows, report.failed_rows
        );

        Ok(BatchOutcome {
            columns,
            values,
            report,
        })
    }

    fn cells(
        &self,
        rendered: &RenderedPoint,
        columns: &[OutputColumn],
        converter: &NotationConverter,
        layout: &RenderTemplate,
    ) -> Vec<Option<String>> {
        let precision = self.settings.decimal_precision;
        columns
            .iter()
            .map(|column| {
                Some(match column.role {
                    OutputRole::X => rendered.x.to_text(precision),
                    OutputRole::Y => rendered.y.to_text(precision),
                    OutputRole::Combined => converter.renderer().render_combined(rendered, layout),
                })
            })
            .collect()
    }

    /// Name of the source field a failure belongs to
    fn failed_field(&self, error: &StageError) -> String {
        let x = self.settings.source_x();
        let y = self.settings.source_y();

        let field = match error.error.axis() {
            Some(Axis::Longitude) => x,
            Some(Axis::Latitude) => y,
            None => None,
        };

        match (field, x, y) {
            (Some(field), _, _) => field.to_string(),
            (None, Some(x), Some(y)) => format!("{}/{}", x, y),
            (None, Some(single), None) | (None, None, Some(single)) => single.to_string(),
            (None, None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notation;
    use crate::processors::ConversionStage;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn dms_settings() -> ConversionSettings {
        ConversionSettings {
            source_x_field: Some("lon".to_string()),
            source_y_field: Some("lat".to_string()),
            source_format: Notation::DegreesMinutesSeconds,
            destination_format: Some(Notation::DecimalDegrees),
            output_x_field: Some("x".to_string()),
            output_y_field: Some("y".to_string()),
            decimal_precision: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_failed_rows_are_blank_and_reported() {
        let input = table(
            &["id", "lon", "lat"],
            &[
                &["1", "122º25'9.840\"W", "37º46'29.640\"N"],
                &["2", "10/0/0", "+45/0/0N"],
                &["3", "0/7/39W", "91/0/0"],
                &["4", "180/0/0", "-90/0/0"],
            ],
        );

        let outcome = BatchConverter::new(dms_settings())
            .with_max_workers(2)
            .convert_table(&input, None)
            .unwrap();

        assert_eq!(
            outcome.values,
            vec![
                vec![Some("-122.4194".to_string()), Some("37.7749".to_string())],
                vec![None, None],
                vec![None, None],
                vec![Some("180.0000".to_string()), Some("-90.0000".to_string())],
            ]
        );

        let report = &outcome.report;
        assert_eq!((report.total_rows, report.converted_rows, report.failed_rows), (4, 2, 2));
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(report.failures[0].field, "lat");
        assert_eq!(report.failures[0].kind, "MalformedValue");
        assert_eq!(report.failures[0].stage, ConversionStage::Extracting);
        assert_eq!(report.failures[1].row, 3);
        assert_eq!(report.failures[1].kind, "InvalidFormat");
        assert_eq!(report.failures[1].stage, ConversionStage::Validating);
    }

    #[test]
    fn test_configuration_errors_abort_before_rows() {
        let input = table(&["id", "longitude", "lat"], &[&["1", "10/0/0", "10/0/0"]]);
        let err = BatchConverter::new(dms_settings())
            .convert_table(&input, None)
            .unwrap_err();
        assert!(matches!(err, ConversionError::Configuration(_)));
    }

    #[test]
    fn test_mgrs_to_combined_field() {
        let settings = ConversionSettings {
            source_x_field: Some("grid".to_string()),
            source_y_field: Some("other".to_string()),
            source_format: Notation::Mgrs,
            destination_format: Some(Notation::Utm),
            output_xy_field: Some("utm".to_string()),
            ..Default::default()
        };
        let input = table(
            &["grid", "other"],
            &[&["33UXP0000", ""], &["", "18TWL8562811322"], &["33UXP0000", "33UXP0000"]],
        );

        let outcome = BatchConverter::new(settings).convert_table(&input, None).unwrap();
        assert_eq!(outcome.columns.len(), 1);
        assert_eq!(
            outcome.values[0][0].as_deref().map(|v| v.starts_with("33T 6")),
            Some(true)
        );
        assert!(outcome.values[1][0].as_deref().unwrap().starts_with("18T 585628 "));
        assert_eq!(outcome.values[2], vec![None]);
        assert_eq!(outcome.report.failures[0].field, "grid/other");
        assert_eq!(outcome.report.failures[0].kind, "MalformedValue");
    }

    #[test]
    fn test_impossible_utm_row_fails_alone() {
        let settings = ConversionSettings {
            source_x_field: Some("utm".to_string()),
            source_y_field: None,
            source_format: Notation::Utm,
            destination_format: Some(Notation::DecimalDegrees),
            output_x_field: Some("x".to_string()),
            output_y_field: Some("y".to_string()),
            decimal_precision: 2,
            ..Default::default()
        };
        let input = table(
            &["utm"],
            &[&["11S 500000 4000000"], &["33N 500000 20000000"], &["33X 500000 1000000"]],
        );

        let outcome = BatchConverter::new(settings).convert_table(&input, None).unwrap();
        assert_eq!(
            outcome.values,
            vec![
                vec![Some("-117.00".to_string()), Some("36.14".to_string())],
                vec![None, None],
                vec![None, None],
            ]
        );

        let report = &outcome.report;
        assert_eq!(report.failed_rows, 2);
        for failure in &report.failures {
            assert_eq!(failure.field, "utm");
            assert_eq!(failure.kind, "MalformedValue");
            assert_eq!(failure.stage, ConversionStage::Converting);
        }
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let rows: Vec<Vec<String>> = (0..200)
            .map(|i| vec![format!("{}.5", i % 180), format!("{}.25", i % 90)])
            .collect();
        let input = Table {
            headers: vec!["lon".to_string(), "lat".to_string()],
            rows,
        };
        let settings = ConversionSettings {
            source_format: Notation::DecimalDegrees,
            destination_format: None,
            output_x_field: Some("x".to_string()),
            output_y_field: None,
            ..dms_settings()
        };

        let outcome = BatchConverter::new(settings)
            .with_max_workers(4)
            .convert_table(&input, None)
            .unwrap();
        for (i, cells) in outcome.values.iter().enumerate() {
            let expected = format!("{}º30'0.000\"E", i % 180);
            assert_eq!(cells[0].as_deref(), Some(expected.as_str()));
        }
    }
}

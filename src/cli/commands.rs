use crate::cli::args::{Cli, Commands, SettingsArgs};
use crate::error::Result;
use crate::formatters::RenderTemplate;
use crate::models::{ConversionRequest, RenderTarget};
use crate::processors::{BatchConverter, BatchOutcome, ConversionReport, NotationConverter};
use crate::readers::{Table, TableReader};
use crate::settings::ConversionSettings;
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::TableWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            settings,
            max_workers,
            report,
            quiet,
        } => {
            let settings = resolve_settings(&settings)?;
            let delimiter = settings.delimiter_byte()?;
            let output_file = output.unwrap_or_else(generate_default_output_filename);

            println!("Converting coordinates...");
            println!("Input file: {}", input.display());
            println!("Output file: {}", output_file.display());
            println!(
                "Source: {}, Target: {}, Workers: {}",
                settings.source_format,
                settings.target_label(),
                max_workers
            );

            let (table, outcome) = convert_in_background(input, settings, max_workers, quiet).await?;

            TableWriter::with_delimiter(delimiter).write_table(
                &output_file,
                &table,
                &outcome.columns,
                &outcome.values,
            )?;

            println!("\n{}", outcome.report.summary());
            write_report(&outcome.report, report.as_deref())?;
            println!("Conversion complete!");
        }

        Commands::Validate {
            input,
            settings,
            max_workers,
        } => {
            let settings = resolve_settings(&settings)?;

            println!("Validating coordinates...");
            println!("Input file: {}", input.display());

            let (_table, outcome) = convert_in_background(input, settings, max_workers, false).await?;

            println!("\n{}", outcome.report.summary());
            if outcome.report.is_clean() {
                println!("✅ All rows converted successfully");
            } else {
                println!("⚠️  Found {} rows that could not be converted", outcome.report.failed_rows);
            }
        }

        Commands::Parse {
            source_format,
            x,
            y,
            destination_format,
            custom_format,
            output_coordinate_format,
        } => {
            let converter = NotationConverter::default();
            let request = ConversionRequest::new(Some(x.as_str()), y.as_deref(), source_format);
            let point = converter.to_canonical(&request)?;

            println!("Longitude: {:.8}", point.longitude);
            println!("Latitude: {:.8}", point.latitude);

            let target = match (destination_format, custom_format) {
                (Some(notation), _) => Some(RenderTarget::Notation(notation)),
                (None, Some(format)) => Some(RenderTarget::Custom(RenderTemplate::parse(&format))),
                (None, None) => None,
            };

            if let Some(target) = target {
                let renderer = converter.renderer();
                let rendered = renderer.render_point(&point, &target)?;
                let layout = RenderTemplate::parse(&output_coordinate_format);

                println!("X: {}", rendered.x.to_text(renderer.decimal_precision()));
                println!("Y: {}", rendered.y.to_text(renderer.decimal_precision()));
                println!("XY: {}", renderer.render_combined(&rendered, &layout));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = std::fs::File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed when running embedded or under tests
    if let Err(e) = result {
        debug!("Keeping existing tracing subscriber: {}", e);
    }
    Ok(())
}

/// Settings file and environment first, then command line overrides
fn resolve_settings(args: &SettingsArgs) -> Result<ConversionSettings> {
    let mut settings = ConversionSettings::load(args.settings.as_deref())?;
    args.apply_to(&mut settings);
    settings.check_consistency()?;
    Ok(settings)
}

/// Read and convert on the blocking pool; rayon does the per-row fan-out
async fn convert_in_background(
    input: PathBuf,
    settings: ConversionSettings,
    max_workers: usize,
    quiet: bool,
) -> Result<(Table, BatchOutcome)> {
    tokio::task::spawn_blocking(move || -> Result<(Table, BatchOutcome)> {
        let table = TableReader::with_delimiter(settings.delimiter_byte()?).read_table(&input)?;
        info!("Read {} rows from {}", table.len(), input.display());

        let progress = ProgressReporter::new(table.len() as u64, "Converting coordinates...", quiet);
        let outcome = BatchConverter::new(settings)
            .with_max_workers(max_workers)
            .convert_table(&table, Some(&progress))?;

        Ok((table, outcome))
    })
    .await?
}

fn write_report(report: &ConversionReport, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

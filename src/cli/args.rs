use crate::models::Notation;
use crate::settings::ConversionSettings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coord-converter")]
#[command(about = "Validate and convert geographic coordinates between DD, DMS, DDM, MGRS and UTM")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the coordinate columns of a CSV table
    Convert {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output CSV file path [default: output/coordinates-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Write the conversion report as JSON")]
        report: Option<PathBuf>,

        #[arg(short, long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// Run the conversion without writing output and print the report
    Validate {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Convert a single value and print the canonical point
    Parse {
        #[arg(long, help = "Notation of the input value (DD, DMS, DDM, MGRS, UTM)")]
        source_format: Notation,

        #[arg(allow_negative_numbers = true, help = "Longitude, or the whole MGRS/UTM reference")]
        x: String,

        #[arg(allow_negative_numbers = true, help = "Latitude for DD, DMS and DDM")]
        y: Option<String>,

        #[arg(long, conflicts_with = "custom_format")]
        destination_format: Option<Notation>,

        #[arg(long, help = "Per-axis template such as {degree}º{minutes}'{seconds}\"")]
        custom_format: Option<String>,

        #[arg(long, default_value = "{X} {Y}")]
        output_coordinate_format: String,
    },
}

/// Setting overrides; each one wins over the settings file and environment
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    #[arg(long, help = "Settings file (TOML, JSON or YAML)")]
    pub settings: Option<PathBuf>,

    #[arg(long)]
    pub source_x_field: Option<String>,

    #[arg(long)]
    pub source_y_field: Option<String>,

    #[arg(long)]
    pub source_format: Option<Notation>,

    #[arg(long)]
    pub destination_format: Option<Notation>,

    #[arg(long)]
    pub custom_format: Option<String>,

    #[arg(long)]
    pub output_x_field: Option<String>,

    #[arg(long)]
    pub output_y_field: Option<String>,

    #[arg(long)]
    pub output_xy_field: Option<String>,

    #[arg(long)]
    pub output_coordinate_format: Option<String>,

    #[arg(long)]
    pub field_length: Option<usize>,

    #[arg(long)]
    pub field_precision: Option<usize>,

    #[arg(long)]
    pub decimal_precision: Option<usize>,

    #[arg(long)]
    pub mgrs_precision: Option<usize>,

    #[arg(long)]
    pub delimiter: Option<char>,
}

impl SettingsArgs {
    pub fn apply_to(&self, settings: &mut ConversionSettings) {
        let strings = [
            (&self.source_x_field, &mut settings.source_x_field),
            (&self.source_y_field, &mut settings.source_y_field),
            (&self.custom_format, &mut settings.custom_format),
            (&self.output_x_field, &mut settings.output_x_field),
            (&self.output_y_field, &mut settings.output_y_field),
            (&self.output_xy_field, &mut settings.output_xy_field),
        ];
        for (value, target) in strings {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        if let Some(notation) = self.source_format {
            settings.source_format = notation;
        }
        if let Some(notation) = self.destination_format {
            settings.destination_format = Some(notation);
        }
        if let Some(ref format) = self.output_coordinate_format {
            settings.output_coordinate_format = format.clone();
        }

        let numbers = [
            (self.field_length, &mut settings.field_length),
            (self.field_precision, &mut settings.field_precision),
            (self.decimal_precision, &mut settings.decimal_precision),
            (self.mgrs_precision, &mut settings.mgrs_precision),
        ];
        for (value, target) in numbers {
            if let Some(value) = value {
                *target = value;
            }
        }

        if let Some(delimiter) = self.delimiter {
            settings.delimiter = delimiter.to_string();
        }
    }
}

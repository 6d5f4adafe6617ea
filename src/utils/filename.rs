use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Default output path: output/coordinates-{YYMMDD}.csv
pub fn generate_default_output_filename() -> PathBuf {
    let now = Local::now();
    let filename = format!(
        "coordinates-{:02}{:02}{:02}.csv",
        now.year() % 100,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_filename() {
        let filename = generate_default_output_filename();
        assert_eq!(filename.parent(), Some(std::path::Path::new("output")));

        let file_part = filename.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_part.starts_with("coordinates-"));
        assert!(file_part.ends_with(".csv"));
        // "coordinates-" + YYMMDD + ".csv"
        assert_eq!(file_part.len(), 22);
        assert!(file_part[12..18].chars().all(|c| c.is_ascii_digit()));
    }
}

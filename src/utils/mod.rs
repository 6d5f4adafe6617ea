pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{decompose_ddm, decompose_dms, format_fixed};
pub use filename::generate_default_output_filename;
pub use progress::ProgressReporter;

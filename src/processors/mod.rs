pub mod batch_converter;
pub mod conversion_report;
pub mod notation_converter;

pub use batch_converter::{BatchConverter, BatchOutcome};
pub use conversion_report::{ConversionReport, RowFailure};
pub use notation_converter::{ConversionStage, NotationConverter, StageError};

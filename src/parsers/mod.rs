pub mod extractor;
pub mod format_validator;
pub mod grammar;

pub use extractor::{extract, extract_mgrs, extract_utm};
pub use format_validator::{normalise, validate, MatchResult};
pub use grammar::{grammar_for, Grammar, GrammarKey};

pub mod cli;
pub mod error;
pub mod formatters;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod projection;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ConversionError, Result};

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, SettingsArgs};
pub use commands::run;

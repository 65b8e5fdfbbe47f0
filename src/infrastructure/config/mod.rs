//! Configuration loading and validation.

pub mod logging;
pub mod settings;

pub use settings::Config;

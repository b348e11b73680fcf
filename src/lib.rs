pub mod cache;
pub mod config;
pub mod menu_digitizer;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use menu_digitizer::MenuDigitizer;

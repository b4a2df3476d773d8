//! CLI library for testing purposes

pub mod config;
pub mod report;
pub mod validation;
pub mod view;

pub use config::{Config, load_config};
pub use report::{describe_error, duration_string};
pub use validation::{parse_assignment, validate_language_code, validate_string_id};

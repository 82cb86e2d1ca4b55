//! CLI command implementations

pub mod generate_service;

pub use generate_service::GenerateServiceCommand;

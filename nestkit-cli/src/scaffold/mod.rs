//! Service scaffold generation
//!
//! Turns collected answers into a [`TemplateContext`] and renders the
//! service's source files from it.

pub mod context;
pub mod generator;

pub use context::TemplateContext;
pub use generator::{GeneratedFile, ServiceGenerator};

//! Configuration module for critical CSS generation
//!
//! This module provides the `GeneratorConfig` struct and its builder
//! for configuring a run with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::GeneratorConfigBuilder;
pub use types::{GeneratorConfig, ScreenshotFormat};

//! iso3166-countries library
//!
//! This crate provides the core functionality for the `iso3166-countries` binary.
//! Keep the crate root minimal: implementation and tests live in their modules.
//!
//! ## Overview
//!
//! A single run is a linear pipeline:
//!
//! - [`fetcher`] - Downloads the ISO 3166-1 XML list and extracts its entry elements
//! - [`converter`] - Builds country records, applies override rules and orders them
//! - [`exporter`] - Writes the ordered countries to an XML file on disk
//! - [`cli`] - Command-line entry point that resolves configuration and runs the pipeline
//! - [`config`] - TOML configuration, override-rule parsing and path resolution
//! - [`models`] - Raw entries, country records and override rules
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use iso3166_countries::{cli, config::ResolvedConfig, errors::AppResult};
//! use std::path::Path;
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::from_toml_str(
//!     r#"
//!     source_url = "https://example.com/list_en.xml"
//!     countries_in_order = "{US:United States},{CA:Canada}"
//!     "#,
//! )?;
//!
//! let client = reqwest::Client::new();
//! cli::run_workflow(&client, &config, Path::new("Export")).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod converter;
pub mod errors;
pub mod exporter;
pub mod fetcher;
pub mod models;

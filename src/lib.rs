//! Human-in-the-loop correction of predicted match labels.
//!
//! Library exports for the console binary, benchmarks and tests.
/// Remote labels API and the traits the labeling core loads and uploads through.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// Predictable catalogs and their type/rarity groupings.
pub mod catalog;
/// `config.toml` loading.
pub mod config;
/// Interactive labeling console.
pub mod console;
/// Crop image locations.
pub mod crops;
/// Shared HTTP agent.
pub(crate) mod http_client;
/// Pagination over pending labels, session registry and submit flow.
pub mod labeling;
/// Logging setup.
pub mod logging;
/// Dropdown option lists and cross-kind correlations.
pub mod options;
/// Predictable kinds and orientations.
pub mod predictables;
/// In-memory match and label tables.
pub mod tables;

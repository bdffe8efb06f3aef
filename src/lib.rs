//! Library exports for reuse in binaries, benchmarks and tests.
/// Application folder helpers.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// Training data parsing and download.
pub mod dataset;
/// Wine feature layout.
pub mod features;
/// Shared blocking HTTP helpers.
pub mod http_client;
/// Cultivar display names.
pub mod labels;
/// Logging setup.
pub mod logging;
/// Classifier, persistence and metrics.
pub mod ml;
/// HTTP presentation shell.
pub mod server;
/// Model handle and request records shared by the shells.
pub mod serving;
/// egui presentation shell.
pub mod ui;

//! Training data access: CSV parsing and the network download collaborator.

pub mod download;
pub mod loader;

pub use download::{DEFAULT_DATASET_URL, DownloadError, DownloadOptions, fetch_dataset};
pub use loader::{DatasetError, load_csv, parse_csv};

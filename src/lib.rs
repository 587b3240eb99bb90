//! Date-range exploration of a daily bike rental dataset: rental totals,
//! seasonal breakdowns and a simulated RFM customer ranking.

pub mod aggregate;
pub mod category;
pub mod charts;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod models;
pub mod report;
pub mod rfm;

pub use config::Settings;
pub use dashboard::{build_dashboard, Dashboard, Explorer};
pub use dataset::{load_dataset, read_dataset, Dataset};
pub use error::LoadError;
pub use filter::{filter_range, DateRange, FilteredView};

pub mod api;
pub mod config;
pub mod extractor;
pub mod reconciler;
pub mod reports;
pub mod runner;
pub mod store;
pub mod types;
pub mod utils;

pub use api::{MarkupSource, ResultsPage};
pub use config::Config;
pub use extractor::{Extractor, ParseError};
pub use reconciler::{MergeReport, Reconciler};
pub use runner::{RunSummary, run};
pub use store::JsonStore;
pub use types::{Dataset, DrawResult, RecordError};

use scraper::Html;

pub mod data;
pub mod detect;
pub mod fetch;
pub mod kibidango;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod store;

mod error;
mod utils;

pub use data::{Field, FieldValue, Fields, Observation};
pub use detect::{detect, ChangeRecord, ChangeReport};
pub use error::MonitorError;
pub use monitor::{Config, Monitor, Notification, RunOutcome};
pub use report::render;
pub use store::SnapshotStore;

/// Pulls the tracked fields out of a parsed project page. A field that cannot
/// be found is left as `None`.
pub trait Extractor {
    fn extract(&self, doc: &Html) -> Fields;
}

/// Where the page HTML comes from.
#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, MonitorError>;
}

#[async_trait::async_trait]
pub trait Notifier {
    /// Returns a link to whatever was created.
    async fn notify(&self, issue: &notify::Issue) -> Result<String, MonitorError>;
}

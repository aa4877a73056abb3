pub mod dedup;
mod pipeline;
mod servicenow;
mod sync_error;

pub use pipeline::{SyncPipeline, SyncReport};
pub use servicenow::ServiceNowClient;
pub use sync_error::SyncError;

pub mod extract;
mod langflow;

pub use langflow::{FlowClient, PushOutcome};

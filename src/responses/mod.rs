pub mod errors;
pub mod html;
pub mod json;

pub use errors::error_to_response;
pub use html::html_response;
pub use json::{apply_cors, json_response, preflight_response};

pub use crate::errors::ResultResp;

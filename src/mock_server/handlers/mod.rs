//! HTTP request handlers for mock API endpoints.

mod vars;

pub use vars::*;

//! Trait definitions for Terraform Cloud operations.
//!
//! Each resource type implements the traits its endpoints support.

mod create;
mod fetch;

pub use create::Create;
pub use fetch::Fetch;

//! Advisory API access

mod client;

pub use client::{AdvisorySource, ApiEndpoint, ApiError, HttpAdvisorySource};

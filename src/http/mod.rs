//! Blocking HTTP client used to fetch source archives.

mod client;

pub use client::{HttpClient, is_acceptable_status};

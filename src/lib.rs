//! Locate a platform-specific executable, downloading it on first use.
//!
//! A [`FetchConfig`] lists download candidates ([`SourceSpec`]) tagged with
//! an OS and an architecture. [`Fetcher::resolve`] returns the executable's
//! path when it already exists; otherwise it downloads the candidate matching
//! the running [`Platform`], unpacks it into the destination directory and
//! optionally strips leading directories from the unpacked tree.

pub mod archive;
pub mod cleanup;
pub mod config;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod platform;
pub mod resolve;
pub mod runtime;
pub mod source;

pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use platform::{Platform, select_source};
pub use source::SourceSpec;

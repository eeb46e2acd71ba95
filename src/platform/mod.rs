//! Platform detection and source selection.
//!
//! [`Platform`] describes the running OS and architecture using the same
//! identifiers source candidates are tagged with. [`select_source`] picks the
//! candidate that applies to a platform.

mod detection;
mod matcher;

pub use detection::Platform;
pub use matcher::select_source;

use super::Platform;
use crate::source::SourceSpec;

/// Pick the source candidate that applies to `platform`.
///
/// The first candidate whose OS and architecture are either empty or equal to
/// the platform's wins. Returns `None` when nothing applies.
pub fn select_source<'a>(sources: &'a [SourceSpec], platform: &Platform) -> Option<&'a SourceSpec> {
    sources
        .iter()
        .find(|s| s.matches(&platform.os, &platform.arch))
}

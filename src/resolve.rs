//! Executable path computation.
//!
//! Pure functions: the platform and the matched source are passed in, nothing
//! touches the filesystem.

use crate::platform::Platform;
use crate::runtime::clean_path;
use crate::source::SourceSpec;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Append `.exe` on Windows when `auto_extension` is set and the name does
/// not already carry it (case-insensitive). Applying it twice is a no-op.
pub fn platform_executable_name(name: &str, platform: &Platform, auto_extension: bool) -> String {
    if auto_extension && platform.is_windows() && !name.to_lowercase().ends_with(".exe") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// The executable name after the matched source's override and the
/// platform extension are applied.
pub fn executable_name(
    base: &str,
    source: Option<&SourceSpec>,
    platform: &Platform,
    auto_extension: bool,
) -> String {
    let name = source.and_then(SourceSpec::exec_override).unwrap_or(base);
    platform_executable_name(name, platform, auto_extension)
}

/// Join the destination and the executable name.
///
/// A destination of exactly `.` is joined with a literal separator so callers
/// get `./name` back verbatim. Any other destination is joined and cleaned
/// lexically. Without a destination the cleaned name is returned.
pub fn executable_path(destination: Option<&Path>, executable: &str) -> PathBuf {
    match destination {
        Some(dest) if dest.as_os_str() == "." => {
            PathBuf::from(format!(".{}{}", MAIN_SEPARATOR, executable))
        }
        Some(dest) => clean_path(&dest.join(executable)),
        None => clean_path(Path::new(executable)),
    }
}

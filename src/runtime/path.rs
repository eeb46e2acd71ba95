//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Clean a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
///
/// Leading `..` components of a relative path are kept, `..` directly under
/// the root is dropped, and an empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(component),
            },
            _ => result.push(component),
        }
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Returns the path if it is relative and stays inside its base directory
/// once `..` components are folded. Used to reject hostile archive entries.
pub fn enclosed_path(path: &Path) -> Option<PathBuf> {
    let mut depth = 0usize;
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                depth += 1;
                result.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth.checked_sub(1)?;
                result.pop();
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(result)
}

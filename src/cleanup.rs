use crate::runtime::Runtime;
use log::debug;
use std::path::{Path, PathBuf};

/// RAII guard that removes a temporary file when dropped.
///
/// Register the guard right after the file is created; it fires on every exit
/// path, including early returns through `?`.
pub struct TempFileGuard<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> TempFileGuard<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Runtime> Drop for TempFileGuard<'_, R> {
    fn drop(&mut self) {
        debug!("Cleaning up: {:?}", self.path);
        if let Err(e) = self.runtime.remove_file(&self.path) {
            debug!("Failed to remove {:?}: {}", self.path, e);
        }
    }
}

//! Runtime abstraction for filesystem operations.
//!
//! Every filesystem touch made while resolving an executable goes through the
//! [`Runtime`] trait so the orchestration can be exercised against a mock.
//!
//! # Structure
//!
//! - `path` - Lexical path helpers (clean, enclosed)
//! - `fs` - File system operations backing [`RealRuntime`]
//! - `link` - Symbolic and hard links

mod fs;
mod link;
pub mod path;

use anyhow::Result;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub use path::{clean_path, enclosed_path};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    /// Returns `Ok(false)` when nothing exists at `path`. Any other stat
    /// failure is returned as an error.
    fn try_exists(&self, path: &Path) -> Result<bool>;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// List the entries of a directory, sorted by file name.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Create a symbolic link at `link` pointing to `original`. A relative
    /// `original` is interpreted from the link's directory.
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn hard_link(&self, original: &Path, link: &Path) -> Result<()>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn try_exists(&self, path: &Path) -> Result<bool> {
        self.try_exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.open_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_impl(original, link)
    }

    fn hard_link(&self, original: &Path, link: &Path) -> Result<()> {
        self.hard_link_impl(original, link)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }
}

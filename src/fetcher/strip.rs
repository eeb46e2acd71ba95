//! Flattening of leading directories after extraction.

use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};

/// Remove `levels` leading directories under `root`.
///
/// Each level descends into the first directory in the runtime's listing
/// (name order for [`crate::runtime::RealRuntime`]), so when several
/// directories sit side by side only the first one is flattened. Descent stops
/// early at a level without subdirectories. The contents of the deepest
/// directory reached are moved into `root`, replacing same-named entries, and
/// the descended tree is removed.
pub(crate) fn strip_components<R: Runtime>(runtime: &R, root: &Path, levels: usize) -> Result<()> {
    let mut dir = root.to_path_buf();
    let mut descended: Vec<PathBuf> = Vec::new();

    for _ in 0..levels {
        let entries = runtime.read_dir(&dir)?;
        match entries.into_iter().find(|entry| runtime.is_dir(entry)) {
            Some(next) => {
                descended.push(next.clone());
                dir = next;
            }
            None => {
                debug!("No directory left to strip in {:?}", dir);
                break;
            }
        }
    }

    let Some(top) = descended.first() else {
        return Ok(());
    };

    // Park the top directory so an entry sharing its name can move into root.
    let top_name = top
        .file_name()
        .ok_or_else(|| anyhow!("Invalid directory {:?}", top))?;
    let mut staging_name = std::ffi::OsString::from(".strip-");
    staging_name.push(top_name);
    let staging = root.join(staging_name);
    if runtime.try_exists(&staging)? {
        runtime.remove_dir_all(&staging)?;
    }
    runtime.rename(top, &staging)?;

    let deepest = staging.join(
        dir.strip_prefix(top)
            .with_context(|| format!("{:?} is not under {:?}", dir, top))?,
    );
    debug!("Moving contents from {:?} to {:?}", deepest, root);

    for entry in runtime.read_dir(&deepest)? {
        let name = entry
            .file_name()
            .ok_or_else(|| anyhow!("Invalid entry {:?}", entry))?;
        let target = root.join(name);
        if runtime.try_exists(&target)? {
            if runtime.is_dir(&target) {
                runtime.remove_dir_all(&target)?;
            } else {
                runtime.remove_file(&target)?;
            }
        }
        runtime.rename(&entry, &target)?;
    }

    runtime.remove_dir_all(&staging)?;
    Ok(())
}

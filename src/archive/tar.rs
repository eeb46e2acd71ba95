use crate::runtime::{Runtime, enclosed_path};
use anyhow::{Context, Result, anyhow};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use log::{debug, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use xz2::read::XzDecoder;

use super::ArchiveExtractor;

/// Compression wrapped around a tarball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarCompression {
    None,
    Gzip,
    Xz,
    Bzip2,
    Zstd,
}

impl TarCompression {
    fn decoder(self, reader: Box<dyn Read + Send>) -> Result<Box<dyn Read>> {
        Ok(match self {
            TarCompression::None => Box::new(reader),
            TarCompression::Gzip => Box::new(GzDecoder::new(reader)),
            TarCompression::Xz => Box::new(XzDecoder::new(reader)),
            TarCompression::Bzip2 => Box::new(BzDecoder::new(reader)),
            TarCompression::Zstd => Box::new(
                zstd::stream::read::Decoder::new(reader)
                    .context("Failed to initialize zstd decoder")?,
            ),
        })
    }
}

/// Extractor for tarballs, plain or compressed.
pub struct TarExtractor {
    compression: TarCompression,
}

impl TarExtractor {
    pub fn new(compression: TarCompression) -> Self {
        Self { compression }
    }
}

impl ArchiveExtractor for TarExtractor {
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!(
            "Extracting tar archive ({:?}) to {:?}...",
            self.compression, extract_to
        );
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        unpack(runtime, self.compression.decoder(file)?, extract_to)
    }
}

fn unpack<R: Runtime, T: Read>(runtime: &R, reader: T, extract_to: &Path) -> Result<()> {
    let mut archive = ::tar::Archive::new(reader);
    let mut unpacked = 0usize;

    for entry in archive
        .entries()
        .context("Failed to read tar entries")?
    {
        let mut entry = entry.context("Failed to read tar entry")?;
        let entry_path = entry
            .path()
            .context("Failed to read tar entry path")?
            .into_owned();

        let relative = match enclosed_path(&entry_path) {
            Some(path) if !path.as_os_str().is_empty() => path,
            Some(_) => continue,
            None => {
                debug!("Skipping entry with invalid path {:?}", entry_path);
                continue;
            }
        };
        let full_path = extract_to.join(&relative);

        match entry.header().entry_type() {
            ::tar::EntryType::Directory => {
                runtime.create_dir_all(&full_path)?;
            }
            ::tar::EntryType::Regular | ::tar::EntryType::Continuous => {
                create_parent(runtime, &full_path)?;
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;
                drop(dest_file);

                #[cfg(unix)]
                if let Ok(mode) = entry.header().mode()
                    && let Err(e) = runtime.set_permissions(&full_path, mode & 0o7777)
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            }
            ::tar::EntryType::Symlink => {
                let target = link_target(&entry, &entry_path)?;
                // The target is relative to the link's directory.
                let resolved = relative
                    .parent()
                    .unwrap_or(Path::new(""))
                    .join(&target);
                if target.is_absolute() || enclosed_path(&resolved).is_none() {
                    debug!(
                        "Skipping symlink {:?} pointing outside the archive: {:?}",
                        entry_path, target
                    );
                    continue;
                }
                create_parent(runtime, &full_path)?;
                remove_stale(runtime, &full_path);
                runtime.symlink(&target, &full_path)?;
            }
            ::tar::EntryType::Link => {
                let target = link_target(&entry, &entry_path)?;
                // Hard link targets are named from the archive root.
                let Some(original) = enclosed_path(&target) else {
                    debug!(
                        "Skipping hard link {:?} pointing outside the archive: {:?}",
                        entry_path, target
                    );
                    continue;
                };
                create_parent(runtime, &full_path)?;
                remove_stale(runtime, &full_path);
                runtime.hard_link(&extract_to.join(original), &full_path)?;
            }
            other => {
                debug!("Skipping {:?} entry {:?}", other, entry_path);
                continue;
            }
        }
        unpacked += 1;
    }

    if unpacked == 0 {
        return Err(anyhow!("Archive appears to be empty."));
    }

    info!("Extraction complete.");
    Ok(())
}

fn link_target<T: Read>(entry: &::tar::Entry<'_, T>, entry_path: &Path) -> Result<PathBuf> {
    entry
        .link_name()
        .with_context(|| format!("Failed to read link target of {:?}", entry_path))?
        .map(|target| target.into_owned())
        .ok_or_else(|| anyhow!("Link entry {:?} has no target", entry_path))
}

fn create_parent<R: Runtime>(runtime: &R, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        runtime.create_dir_all(parent)?;
    }
    Ok(())
}

/// Links cannot overwrite an existing entry; clear one left by an earlier
/// extraction. A missing entry is the normal case.
fn remove_stale<R: Runtime>(runtime: &R, path: &Path) {
    if runtime.remove_file(path).is_ok() {
        debug!("Replaced existing {:?}", path);
    }
}

mod tar;
mod zip;

use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::Path;

pub use tar::{TarCompression, TarExtractor};
pub use zip::ZipExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract the archive into the specified directory.
    ///
    /// Entries keep their relative paths. Entries with absolute paths or
    /// paths escaping `extract_to` are skipped. A failure may leave some
    /// entries already written.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Archive container formats understood by [`ArchiveExtractorImpl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar(TarCompression),
    Zip,
}

/// File name suffixes, checked in order against the lowercased name.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    (".tar.gz", ArchiveFormat::Tar(TarCompression::Gzip)),
    (".tgz", ArchiveFormat::Tar(TarCompression::Gzip)),
    (".tar.xz", ArchiveFormat::Tar(TarCompression::Xz)),
    (".txz", ArchiveFormat::Tar(TarCompression::Xz)),
    (".tar.bz2", ArchiveFormat::Tar(TarCompression::Bzip2)),
    (".tbz2", ArchiveFormat::Tar(TarCompression::Bzip2)),
    (".tbz", ArchiveFormat::Tar(TarCompression::Bzip2)),
    (".tar.zst", ArchiveFormat::Tar(TarCompression::Zstd)),
    (".tzst", ArchiveFormat::Tar(TarCompression::Zstd)),
    (".tar", ArchiveFormat::Tar(TarCompression::None)),
    (".zip", ArchiveFormat::Zip),
];

impl ArchiveFormat {
    /// Guess the format from the file name (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, format)| *format)
    }

    /// Guess the format from the first bytes of the file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(&[0x1f, 0x8b]) {
            Some(ArchiveFormat::Tar(TarCompression::Gzip))
        } else if header.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
            Some(ArchiveFormat::Tar(TarCompression::Xz))
        } else if header.starts_with(b"BZh") {
            Some(ArchiveFormat::Tar(TarCompression::Bzip2))
        } else if header.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
            Some(ArchiveFormat::Tar(TarCompression::Zstd))
        } else if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
            Some(ArchiveFormat::Zip)
        } else if header.len() >= 262 && &header[257..262] == b"ustar" {
            Some(ArchiveFormat::Tar(TarCompression::None))
        } else {
            None
        }
    }
}

/// Dispatcher that selects the appropriate extractor based on archive format.
/// The file name decides first; unknown names fall back to the magic bytes.
pub struct ArchiveExtractorImpl {
    zip: ZipExtractor,
}

impl Default for ArchiveExtractorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractorImpl {
    pub fn new() -> Self {
        Self { zip: ZipExtractor }
    }

    fn detect_format<R: Runtime>(runtime: &R, archive_path: &Path) -> Result<ArchiveFormat> {
        if let Some(format) = ArchiveFormat::from_path(archive_path) {
            return Ok(format);
        }

        let mut header = Vec::with_capacity(512);
        runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?
            .take(512)
            .read_to_end(&mut header)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        ArchiveFormat::sniff(&header).ok_or_else(|| {
            anyhow!(
                "Unsupported archive format: {}",
                archive_path.display()
            )
        })
    }
}

impl ArchiveExtractor for ArchiveExtractorImpl {
    #[tracing::instrument(skip(self, runtime, archive_path, extract_to))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        match Self::detect_format(runtime, archive_path)? {
            ArchiveFormat::Tar(compression) => {
                TarExtractor::new(compression).extract(runtime, archive_path, extract_to)
            }
            ArchiveFormat::Zip => self.zip.extract(runtime, archive_path, extract_to),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_archives {
    use anyhow::Result;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    pub fn tar_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut builder = ::tar::Builder::new(Vec::new());
        for (name, content) in files {
            let mut header = ::tar::Header::new_gnu();
            header.set_path(name)?;
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, content.as_bytes())?;
        }
        Ok(builder.into_inner()?)
    }

    /// A tarball holding `pkg/bin/cwebp-0.6`, a hard link to it at
    /// `pkg/bin/dwebp`, and one symlink per `(path, target)` pair.
    pub fn linked_tar_bytes(symlinks: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut builder = ::tar::Builder::new(Vec::new());

        let mut header = ::tar::Header::new_gnu();
        header.set_path("pkg/bin/cwebp-0.6")?;
        header.set_size(6);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append(&header, "binary".as_bytes())?;

        for (path, target) in symlinks {
            let mut header = ::tar::Header::new_gnu();
            header.set_entry_type(::tar::EntryType::Symlink);
            header.set_path(path)?;
            header.set_link_name(target)?;
            header.set_size(0);
            header.set_mode(0o777);
            header.set_cksum();
            builder.append(&header, std::io::empty())?;
        }

        let mut header = ::tar::Header::new_gnu();
        header.set_entry_type(::tar::EntryType::Link);
        header.set_path("pkg/bin/dwebp")?;
        header.set_link_name("pkg/bin/cwebp-0.6")?;
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append(&header, std::io::empty())?;

        Ok(builder.into_inner()?)
    }

    pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    pub fn tar_gz_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        gzip(&tar_bytes(files)?)
    }

    pub fn tar_xz_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(&tar_bytes(files)?)?;
        Ok(encoder.finish()?)
    }

    pub fn tar_bz2_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&tar_bytes(files)?)?;
        Ok(encoder.finish()?)
    }

    pub fn tar_zst_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        Ok(zstd::encode_all(tar_bytes(files)?.as_slice(), 3)?)
    }

    pub fn zip_bytes(files: &[(&str, &str)]) -> Result<Vec<u8>> {
        use ::zip::CompressionMethod;
        use ::zip::ZipWriter;
        use ::zip::write::FileOptions;

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options: FileOptions<()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in files {
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

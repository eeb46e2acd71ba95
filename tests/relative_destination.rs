//! Runs in its own test binary because it changes the working directory.

use binfetch::archive::ArchiveExtractorImpl;
use binfetch::download::HttpDownloader;
use binfetch::runtime::RealRuntime;
use binfetch::{FetchConfig, Fetcher, Platform, SourceSpec};
use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::Server;
use std::io::Write;
use std::path::{MAIN_SEPARATOR, PathBuf};
use tempfile::tempdir;

fn create_tar_gz(name: &str, content: &str) -> Vec<u8> {
    let mut tar_builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_path(name).unwrap();
    header.set_mode(0o755);
    header.set_cksum();
    tar_builder.append(&header, content.as_bytes()).unwrap();
    let tar = tar_builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_relative_paths_are_returned_as_configured() {
    let mut server = Server::new();
    let base = server.url();
    let _archive = server
        .mock("GET", "/cwebp.tar.gz")
        .with_status(200)
        .with_body(create_tar_gz("libwebp/bin/cwebp", "binary"))
        .create();

    let dir = tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let vendored = FetchConfig {
        sources: vec![SourceSpec::new(format!("{base}/cwebp.tar.gz"))],
        destination: Some(PathBuf::from("vendor/cwebp")),
        strip_levels: 2,
        ..FetchConfig::new("cwebp")
    };
    let path = Fetcher::with_parts(
        vendored,
        Platform::new("linux", "x64"),
        RealRuntime,
        HttpDownloader::build().unwrap(),
        ArchiveExtractorImpl::new(),
    )
    .unwrap()
    .resolve()
    .unwrap();
    assert_eq!(path, PathBuf::from("vendor/cwebp/cwebp"));
    assert!(dir.path().join("vendor/cwebp/cwebp").is_file());

    // No destination downloads into the working directory.
    let current = FetchConfig {
        sources: vec![SourceSpec::new(format!("{base}/cwebp.tar.gz"))],
        strip_levels: 2,
        ..FetchConfig::new("cwebp")
    };
    let path = Fetcher::with_parts(
        current,
        Platform::new("linux", "x64"),
        RealRuntime,
        HttpDownloader::build().unwrap(),
        ArchiveExtractorImpl::new(),
    )
    .unwrap()
    .resolve()
    .unwrap();
    assert_eq!(path, PathBuf::from(format!(".{}cwebp", MAIN_SEPARATOR)));
    assert!(dir.path().join("cwebp").is_file());
}

//! End-to-end install pipeline test against a mock release server.

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zv_toolchain::{
    Activator, Fetcher, HostTarget, IndexClient, Installer, VersionStore, ZvRoot, read_marker,
    resolve,
};

/// Build a tar.gz release archive in memory with the standard
/// single-root-folder shape.
fn release_archive(root_folder: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, contents) in [("zig", b"#!/bin/true".as_slice()), ("LICENSE", b"MIT".as_slice())] {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/{}", root_folder, name), contents)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn index_json(server_uri: &str, archive: &[u8]) -> String {
    let shasum = format!("{:x}", Sha256::digest(archive));
    format!(
        r#"{{
        "master": {{
            "version": "0.12.0-dev.100+abcdef123",
            "date": "2023-09-10",
            "x86_64-linux": {{
                "tarball": "{uri}/builds/zig-linux-x86_64-0.12.0-dev.tar.gz",
                "shasum": "{shasum}",
                "size": "{size}"
            }}
        }},
        "0.11.0": {{
            "date": "2023-08-01",
            "x86_64-linux": {{
                "tarball": "{uri}/download/0.11.0/zig-linux-x86_64-0.11.0.tar.gz",
                "shasum": "{shasum}",
                "size": "{size}"
            }}
        }},
        "0.10.0": {{
            "date": "2023-03-01",
            "x86_64-linux": {{
                "tarball": "{uri}/download/0.10.0/zig-linux-x86_64-0.10.0.tar.gz",
                "shasum": "{shasum}",
                "size": "{size}"
            }}
        }}
    }}"#,
        uri = server_uri,
        shasum = shasum,
        size = archive.len()
    )
}

#[tokio::test]
async fn install_stable_end_to_end() {
    let server = MockServer::start().await;
    let archive = release_archive("zig-linux-x86_64-0.11.0");

    Mock::given(method("GET"))
        .and(path("/download/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_json(&server.uri(), &archive)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/0.11.0/zig-linux-x86_64-0.11.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = ZvRoot::at(temp.path().join("zv"));
    let host = HostTarget::new("x86_64", "linux");

    // resolve -> fetch -> install -> activate, the pipeline the CLI runs
    let client = IndexClient::new().with_url(format!("{}/download/index.json", server.uri()));
    let index = client.fetch_index().await.unwrap();

    let resolved = resolve(&index, "stable", &host).unwrap();
    assert_eq!(resolved.label, "0.11.0");

    let fetcher = Fetcher::new(&root);
    let archive_path = fetcher
        .fetch(resolved.artifact, &resolved.label, &host)
        .await
        .unwrap();

    let installer = Installer::new(&root);
    let store = VersionStore::new(&root);
    let target = store.version_dir(&resolved.label);
    installer
        .install(&archive_path, &target, &resolved.version)
        .unwrap();

    let activator = Activator::new(&root);
    activator.activate(&target).unwrap();

    // The version landed in the store with its contents and marker
    assert!(target.join("zig").exists());
    assert_eq!(read_marker(&target).as_deref(), Some("0.11.0"));

    // The store reports it as current
    let versions = store.list().unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].label, "0.11.0");
    #[cfg(unix)]
    assert!(versions[0].current);

    // Re-running the fetch hits the cache (the mock expects exactly one
    // download)
    let again = fetcher
        .fetch(resolved.artifact, &resolved.label, &host)
        .await
        .unwrap();
    assert_eq!(again, archive_path);
}

#[tokio::test]
async fn install_master_uses_concrete_version_marker() {
    let server = MockServer::start().await;
    let archive = release_archive("zig-linux-x86_64-0.12.0-dev");

    Mock::given(method("GET"))
        .and(path("/download/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_json(&server.uri(), &archive)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/builds/zig-linux-x86_64-0.12.0-dev.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = ZvRoot::at(temp.path().join("zv"));
    let host = HostTarget::new("x86_64", "linux");

    let client = IndexClient::new().with_url(format!("{}/download/index.json", server.uri()));
    let index = client.fetch_index().await.unwrap();
    let resolved = resolve(&index, "master", &host).unwrap();
    assert_eq!(resolved.label, "master");

    let fetcher = Fetcher::new(&root);
    let archive_path = fetcher
        .fetch(resolved.artifact, &resolved.label, &host)
        .await
        .unwrap();
    // Synthesized cache name keeps master distinct from stable
    assert!(archive_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("zig-master-"));

    let installer = Installer::new(&root);
    let store = VersionStore::new(&root);
    let target = store.version_dir("master");
    installer
        .install(&archive_path, &target, &resolved.version)
        .unwrap();

    // The channel directory is named master; the marker pins the dev build
    assert_eq!(
        read_marker(&target).as_deref(),
        Some("0.12.0-dev.100+abcdef123")
    );
}

#[tokio::test]
async fn unreachable_index_is_a_network_error() {
    let client = IndexClient::new().with_url("http://127.0.0.1:1/download/index.json");
    let err = client.fetch_index().await.unwrap_err();
    assert_eq!(err.code(), zv_core::ErrorCode::Network);
}

#[test]
fn reinstall_after_interrupted_extraction_recovers() {
    // A partially populated version directory from a crashed run is
    // replaced wholesale on the next install.
    let temp = tempfile::tempdir().unwrap();
    let root = ZvRoot::at(temp.path());
    let store = VersionStore::new(&root);
    let target = store.version_dir("0.11.0");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("half-written"), b"junk").unwrap();

    let archive_path = root.path().join("zig.tar.gz");
    let mut file = File::create(&archive_path).unwrap();
    file.write_all(&release_archive("zig-linux-x86_64-0.11.0"))
        .unwrap();
    drop(file);

    let installer = Installer::new(&root);
    installer.install(&archive_path, &target, "0.11.0").unwrap();

    assert!(!target.join("half-written").exists());
    assert!(target.join("zig").exists());
}

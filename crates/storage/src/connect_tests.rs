// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    relative = { "sqlite://cairn.db", "cairn.db" },
    absolute = { "sqlite:///var/db/cairn.db", "/var/db/cairn.db" },
    upper_scheme = { "SQLITE://cairn.db", "cairn.db" },
    memory = { "sqlite://:memory:", ":memory:" },
)]
fn sqlite_urls(url: &str, path: &str) {
    assert_eq!(
        Backend::parse(Some(url)).unwrap(),
        Backend::Sqlite(PathBuf::from(path))
    );
}

#[parameterized(
    short = { "postgres://localhost/app" },
    long = { "postgresql://user:pw@db:5432/app?sslmode=disable" },
)]
fn postgres_urls_pass_through(url: &str) {
    assert_eq!(
        Backend::parse(Some(url)).unwrap(),
        Backend::Postgres(url.to_string())
    );
}

#[test]
fn missing_url() {
    assert!(matches!(Backend::parse(None), Err(StoreError::MissingUrl)));
    assert!(matches!(
        Backend::parse(Some("  ")),
        Err(StoreError::MissingUrl)
    ));
}

#[parameterized(
    no_separator = { "cairn.db" },
    empty_scheme = { "://cairn.db" },
    empty_sqlite_path = { "sqlite://" },
)]
fn invalid_urls(url: &str) {
    assert!(matches!(
        Backend::parse(Some(url)),
        Err(StoreError::InvalidUrl(_))
    ));
}

#[test]
fn unsupported_scheme() {
    match Backend::parse(Some("mysql://localhost/app")) {
        Err(StoreError::UnsupportedScheme(scheme)) => assert_eq!(scheme, "mysql"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn connect_opens_sqlite_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("cairn.db");
    let url = format!("sqlite://{}", path.display());

    let store = connect(Some(&url)).await.unwrap();
    store.init().await.unwrap();
    assert!(!store.has_pending_migration().await.unwrap());
    assert!(path.exists());
}

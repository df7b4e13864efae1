#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use carfinder_db::{create_pool, DbRuntimeSettings};
use carfinder_server::{app, AppState};
use rusqlite::Connection;
use std::time::Duration;
use tower::ServiceExt;

/// Keeps the temporary database and static directory alive for a test.
pub struct TestApp {
    pub router: Router,
    pub db_file: tempfile::NamedTempFile,
    pub static_dir: tempfile::TempDir,
}

pub const SCHEMA: &str = "
    CREATE TABLE brands (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE models (id INTEGER PRIMARY KEY, brand_id INTEGER NOT NULL REFERENCES brands(id), name TEXT NOT NULL);
    CREATE TABLE cars (id INTEGER PRIMARY KEY, model_id INTEGER NOT NULL REFERENCES models(id), year INTEGER NOT NULL, price INTEGER NOT NULL);
";

pub const TOYOTA: &str = "
    INSERT INTO brands (id, name) VALUES (1, 'Toyota');
    INSERT INTO models (id, brand_id, name) VALUES (1, 1, 'Corolla');
    INSERT INTO cars (id, model_id, year, price) VALUES (1, 1, 2020, 20000);
";

/// Builds the router over a temp database seeded with `seed_sql`.
pub fn build_app(seed_sql: &str) -> TestApp {
    let db_file = tempfile::NamedTempFile::new().unwrap();
    {
        let conn = Connection::open(db_file.path()).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(seed_sql).unwrap();
    }

    let static_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(static_dir.path().join("js")).unwrap();
    std::fs::write(static_dir.path().join("js/search.js"), "// search").unwrap();

    let pool = create_pool(db_file.path().to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    let state = AppState {
        pool,
        request_timeout: Duration::from_secs(5),
        static_dir: static_dir.path().to_string_lossy().into_owned(),
    };

    TestApp {
        router: app(state),
        db_file,
        static_dir,
    }
}

/// Sends a GET with an `Origin` header and returns the response.
pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

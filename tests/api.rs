use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_postgres::NoTls;
use tower::ServiceExt;

use character_api::{config::DatabaseConfig, create_router, AppState, Database};

/// A pool aimed at a port nothing listens on; every checkout fails fast.
fn unreachable_database() -> Database {
    let config = DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        database: "characters".to_string(),
        username: "root".to_string(),
        password: "root".to_string(),
        charset: "UTF8".to_string(),
        ssl_mode: "disable".to_string(),
        max_connections: 2,
        connection_timeout: Duration::from_secs(2),
    };

    Database::connect_lazy(config).expect("pool creation does not touch the server")
}

fn app_with(db: Database, greeting: &str) -> Router {
    create_router(AppState::new(db, greeting), Duration::from_secs(10))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_root_greets_without_database() {
    let app = app_with(unreachable_database(), "mars");

    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "hello": "mars" }));
}

#[tokio::test]
async fn test_root_uses_configured_greeting() {
    let app = app_with(unreachable_database(), "world");

    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "hello": "world" }));
}

#[tokio::test]
async fn test_data_routes_fail_when_database_unreachable() {
    let app = app_with(unreachable_database(), "mars");

    for uri in ["/names", "/users", "/absurd", "/health"] {
        let (status, body) = get(&app, uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} should fail", uri);
        assert!(!body.is_array(), "{} must not answer with an array", uri);
        if uri != "/health" {
            assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        }
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app_with(unreachable_database(), "mars");

    let (status, _) = get(&app, "/characters").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app_with(unreachable_database(), "mars");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

/// Reads `TEST_DB_*` variables; `None` unless `TEST_DB_HOST` is set.
fn live_database_config() -> Option<DatabaseConfig> {
    std::env::var("TEST_DB_HOST").ok()?;

    let config = DatabaseConfig::from_lookup(&|key: &str| std::env::var(format!("TEST_{}", key)).ok())
        .expect("TEST_DB_* variables should form a valid database config");
    Some(config)
}

async fn seed_users(config: &DatabaseConfig, users: &[(&str, &str)]) {
    let mut pg = tokio_postgres::Config::new();
    pg.host(&config.host)
        .port(config.port)
        .user(&config.username)
        .password(&config.password)
        .dbname(&config.database);

    let (client, connection) = pg.connect(NoTls).await.expect("seed connection");
    tokio::spawn(connection);

    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS users (firstname TEXT, lastname TEXT); TRUNCATE users;",
        )
        .await
        .unwrap();

    for (firstname, lastname) in users {
        client
            .execute(
                "INSERT INTO users (firstname, lastname) VALUES ($1, $2)",
                &[firstname, lastname],
            )
            .await
            .unwrap();
    }
}

// Runs the whole live scenario in one test so the shared table is never seeded concurrently.
#[tokio::test]
async fn test_live_database_round_trip() {
    let Some(config) = live_database_config() else {
        eprintln!("TEST_DB_HOST not set, skipping live database test");
        return;
    };

    seed_users(
        &config,
        &[
            ("Arthur", "Dent"),
            ("Ford", "Prefect"),
            ("Zaphod", "Beeblebrox"),
            ("Zaphod", "Dent"),
        ],
    )
    .await;

    let db = Database::new(config).await.expect("live database reachable");
    let app = app_with(db, "mars");

    let (status, body) = get(&app, "/names").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array of users");
    assert_eq!(rows.len(), 4);
    for row in rows {
        let mut keys: Vec<&str> = row.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["firstname", "lastname"]);
    }

    let (status, alias) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alias.as_array().unwrap().len(), 4);

    let (status, body) = get(&app, "/absurd").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "firstname": "Zaphod", "lastname": "Beeblebrox" }]));

    let (_, again) = get(&app, "/absurd").await;
    assert_eq!(body, again);

    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

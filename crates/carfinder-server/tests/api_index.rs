mod common;

use axum::http::{header, StatusCode};
use common::{body_string, build_app, get, TOYOTA};

#[tokio::test]
async fn index_embeds_brands_and_models() {
    let test = build_app(
        "INSERT INTO brands (id, name) VALUES (1, 'Toyota'), (2, 'Honda');
         INSERT INTO models (id, brand_id, name) VALUES (1, 1, 'Corolla'), (2, 2, 'Civic');",
    );

    let resp = get(&test.router, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none(),
        "the page is not a CORS endpoint"
    );

    let body = body_string(resp).await;
    assert!(body.contains(r#"[{"id":1,"name":"Toyota"},{"id":2,"name":"Honda"}]"#));
    assert!(body.contains(
        r#"[{"id":1,"brand_id":1,"name":"Corolla"},{"id":2,"brand_id":2,"name":"Civic"}]"#
    ));
}

#[tokio::test]
async fn index_fails_with_500_when_a_table_is_missing() {
    let test = build_app("DROP TABLE models;");

    let resp = get(&test.router, "/").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(resp).await;
    assert!(body.starts_with("failed to load models"), "body: {body}");
}

#[tokio::test]
async fn static_files_are_served() {
    let test = build_app(TOYOTA);

    let resp = get(&test.router, "/static/js/search.js").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "// search");

    let resp = get(&test.router, "/static/js/missing.js").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_returns_ok() {
    let test = build_app("");

    let resp = get(&test.router, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json["status"], "ok");
}

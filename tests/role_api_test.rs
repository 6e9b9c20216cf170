use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use identity_backend::{api_router, config::Config, AppState};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup() -> Option<(Router, PgPool)> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };
    let config = Config {
        port: 0,
        database_url: url,
        secret_key: "test_secret_key".to_string(),
    };
    let pool = identity_backend::database::pool::create_pool(&config)
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    let app = api_router(AppState::new(pool.clone(), &config));
    Some((app, pool))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[tokio::test]
async fn create_role_twice_conflicts() {
    let Some((app, _pool)) = setup().await else { return };
    let name = format!("Admin-{}", suffix());

    let (status, body) = send(&app, "POST", "/role", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], JsonValue::String(name.clone()));

    let (status, body) = send(&app, "POST", "/role", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Role name already exists");
}

#[tokio::test]
async fn create_role_rejects_empty_name() {
    let Some((app, _pool)) = setup().await else { return };
    let (status, body) = send(&app, "POST", "/role", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e.as_str().unwrap().starts_with("name:")));
}

#[tokio::test]
async fn update_role_name_rules() {
    let Some((app, _pool)) = setup().await else { return };
    let first = format!("editor-{}", suffix());
    let second = format!("viewer-{}", suffix());

    let (_, created_first) = send(&app, "POST", "/role", Some(json!({"name": first}))).await;
    let (status, _) = send(&app, "POST", "/role", Some(json!({"name": second}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = created_first["data"]["id"].as_str().unwrap().to_string();

    // Keeping the current name is not a conflict.
    let (status, _) = send(
        &app,
        "PUT",
        "/role",
        Some(json!({"id": first_id, "name": first})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Taking another role's name is.
    let (status, body) = send(
        &app,
        "PUT",
        "/role",
        Some(json!({"id": first_id, "name": second})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Role name already exists");

    // Renaming to a fresh name succeeds and is reflected in the response.
    let renamed = format!("lead-{}", suffix());
    let (status, body) = send(
        &app,
        "PUT",
        "/role",
        Some(json!({"id": first_id, "name": renamed})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], JsonValue::String(renamed));
}

#[tokio::test]
async fn update_missing_role_is_not_found() {
    let Some((app, _pool)) = setup().await else { return };
    let (status, body) = send(
        &app,
        "PUT",
        "/role",
        Some(json!({"id": Uuid::new_v4(), "name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_role_returns_prior_shape_then_not_found() {
    let Some((app, _pool)) = setup().await else { return };
    let name = format!("temp-{}", suffix());
    let (_, created) = send(&app, "POST", "/role", Some(json!({"name": name}))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/role/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], JsonValue::String(name));

    let (status, _) = send(&app, "DELETE", &format!("/role/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filter_without_pagination_returns_everything_sorted_by_name() {
    let Some((app, _pool)) = setup().await else { return };
    let sfx = suffix();
    for letter in ["b", "a", "c"] {
        let (status, _) = send(
            &app,
            "POST",
            "/role",
            Some(json!({"name": format!("flt-{}-{}", sfx, letter)})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/role/filter?page=0&size=0", None).await;
    assert_eq!(status, StatusCode::OK);

    let envelope = &body["data"];
    let data = envelope["data"].as_array().unwrap();
    assert_eq!(envelope["page"], 1);
    assert_eq!(envelope["size"], envelope["total"]);
    assert_eq!(data.len() as i64, envelope["total"].as_i64().unwrap());

    // Our three roles come back label-sorted ascending.
    let ours: Vec<String> = data
        .iter()
        .filter_map(|item| item["label"].as_str())
        .filter(|label| label.contains(&sfx))
        .map(str::to_string)
        .collect();
    assert_eq!(
        ours,
        vec![
            format!("flt-{}-a", sfx),
            format!("flt-{}-b", sfx),
            format!("flt-{}-c", sfx)
        ]
    );
    assert!(data.iter().all(|item| item["value"].is_string()));
}

#[tokio::test]
async fn role_list_paginates_and_reports_full_total() {
    let Some((app, pool)) = setup().await else { return };
    let sfx = suffix();

    // Seed with strictly increasing creation times a bit in the future so
    // these twelve stay the newest rows even while other tests insert.
    for i in 0..12 {
        sqlx::query(
            "INSERT INTO roles (name, created_at) VALUES ($1, NOW() + make_interval(secs => $2))",
        )
        .bind(format!("pag-{}-{:02}", sfx, i))
        .bind(60.0 + i as f64)
        .execute(&pool)
        .await
        .expect("seed role");
    }
    let expected_page = |range: std::ops::Range<i64>| -> Vec<String> {
        range.rev().map(|i| format!("pag-{}-{:02}", sfx, i)).collect()
    };
    let names = |body: &JsonValue| -> Vec<String> {
        body["data"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["name"].as_str())
            .map(str::to_string)
            .collect()
    };

    let (status, first) = send(&app, "GET", "/role?page=1&size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["page"], 1);
    assert_eq!(first["data"]["size"], 5);
    assert_eq!(names(&first), expected_page(7..12));

    // Page 2 holds exactly the 6th through 10th newest.
    let (status, second) = send(&app, "GET", "/role?page=2&size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["page"], 2);
    assert_eq!(second["data"]["size"], 5);
    assert_eq!(names(&second), expected_page(2..7));

    // Total is the full count on every page, independent of the slice.
    assert!(first["data"]["total"].as_i64().unwrap() >= 12);
    assert!(second["data"]["total"].as_i64().unwrap() >= 12);
}

#[tokio::test]
async fn role_list_survives_absurd_page_numbers() {
    let Some((app, _pool)) = setup().await else { return };

    let uri = format!("/role?page={}&size=2", i64::MAX);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 0);
}

//! Document center: registration, search, downloads and history.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_ok, get_auth, post_json_auth, put_json_auth, seed_user, TestUser};
use serde_json::{json, Value};
use sqlx::PgPool;
use xeetrack_core::roles::Role;

struct Setup {
    manager: TestUser,
    designer: TestUser,
    outsider: TestUser,
    client: TestUser,
    project_id: i64,
}

async fn setup(pool: &PgPool, app: axum::Router) -> Setup {
    let manager = seed_user(pool, "Maya", Role::Manager).await;
    let designer = seed_user(pool, "Dana", Role::Employee).await;
    let outsider = seed_user(pool, "Otto", Role::Employee).await;
    let client = seed_user(pool, "Cora", Role::Client).await;

    let project = create_ok(
        app,
        "/api/v1/projects",
        json!({
            "title": "Rebrand",
            "client_id": client.id(),
            "assigned_employees": [designer.id()]
        }),
        &manager.token,
    )
    .await;

    Setup {
        manager,
        designer,
        outsider,
        client,
        project_id: project["id"].as_i64().unwrap(),
    }
}

async fn upload(app: axum::Router, s: &Setup, body: Value) -> Value {
    create_ok(
        app,
        &format!("/api/v1/projects/{}/files", s.project_id),
        body,
        &s.designer.token,
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_register_files(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let s = setup(&pool, app.clone()).await;

    let file = upload(
        app.clone(),
        &s,
        json!({
            "filename": "Design-Mockups.FIG",
            "file_url": "https://cdn.xee.test/mockups.fig",
            "size_bytes": 1536,
            "category": "assets",
            "tags": "design, mockups,, design"
        }),
    )
    .await;
    assert_eq!(file["file_type"], "fig");
    assert_eq!(file["size_display"], "1.5 KB");
    assert_eq!(file["tags"], json!(["design", "mockups"]));
    assert_eq!(file["uploader_name"], "Dana");
    assert_eq!(file["download_count"], 0);
    assert_eq!(file["is_archived"], false);

    let listed = upload(
        app.clone(),
        &s,
        json!({
            "filename": "brief.pdf",
            "file_url": "https://cdn.xee.test/brief.pdf",
            "size_bytes": 0,
            "tags": ["brief", " brief "]
        }),
    )
    .await;
    assert_eq!(listed["category"], "other");
    assert_eq!(listed["tags"], json!(["brief"]));

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{}/files", s.project_id),
        json!({ "filename": "x.png", "file_url": "u", "size_bytes": 1 }),
        &s.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{}/files", s.project_id),
        json!({ "filename": "", "file_url": "u", "size_bytes": -5 }),
        &s.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn search_respects_project_visibility(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let s = setup(&pool, app.clone()).await;
    upload(
        app.clone(),
        &s,
        json!({
            "filename": "logo-final.svg",
            "file_url": "https://cdn.xee.test/logo.svg",
            "size_bytes": 2048,
            "category": "assets",
            "tags": ["branding"]
        }),
    )
    .await;
    upload(
        app.clone(),
        &s,
        json!({
            "filename": "notes.txt",
            "file_url": "https://cdn.xee.test/notes.txt",
            "size_bytes": 10
        }),
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/files?q=BRAND", &s.client.token).await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["logo-final.svg"]);

    let response = get_auth(app.clone(), "/api/v1/files?category=assets", &s.designer.token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), "/api/v1/files", &s.outsider.token).await;
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}/files", s.project_id),
        &s.outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn downloads_are_counted_and_logged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let s = setup(&pool, app.clone()).await;
    let file = upload(
        app.clone(),
        &s,
        json!({
            "filename": "brief.pdf",
            "file_url": "https://cdn.xee.test/brief.pdf",
            "size_bytes": 4096
        }),
    )
    .await;
    let id = file["id"].as_i64().unwrap();

    for user in [&s.client, &s.client, &s.designer] {
        let response = post_json_auth(
            app.clone(),
            &format!("/api/v1/files/{id}/download"),
            json!({}),
            &user.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(app.clone(), &format!("/api/v1/files/{id}"), &s.client.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["download_count"], 3);
    assert_eq!(json["data"]["last_downloaded_by"], s.designer.id());
    assert_eq!(json["data"]["file_url"], "https://cdn.xee.test/brief.pdf");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/files/{id}/download"),
        json!({}),
        &s.outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // History is for staff only.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/files/{id}/history"),
        &s.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.clone(), "/api/v1/download-history", &s.client.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/files/{id}/history"),
        &s.designer.token,
    )
    .await;
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["file_name"], "brief.pdf");
    assert_eq!(entries[0]["file_size"], 4096);

    let response = get_auth(app.clone(), "/api/v1/download-history", &s.manager.token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);

    let response = get_auth(app, "/api/v1/download-history", &s.outsider.token).await;
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bulk_download_is_all_or_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let s = setup(&pool, app.clone()).await;
    let mut ids = Vec::new();
    for name in ["a.png", "b.png"] {
        let file = upload(
            app.clone(),
            &s,
            json!({ "filename": name, "file_url": format!("https://cdn.xee.test/{name}"), "size_bytes": 1 }),
        )
        .await;
        ids.push(file["id"].as_i64().unwrap());
    }

    let response = post_json_auth(
        app.clone(),
        "/api/v1/files/download",
        json!({ "file_ids": [] }),
        &s.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/files/download",
        json!({ "file_ids": [ids[0], 999_999] }),
        &s.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/files/download",
        json!({ "file_ids": ids }),
        &s.outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/files/download",
        json!({ "file_ids": [ids[1], ids[0], ids[1]] }),
        &s.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let files = json["data"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f["download_count"] == 1));

    // The refused attempts recorded nothing.
    let response = get_auth(app, "/api/v1/download-history", &s.manager.token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn managers_curate_and_archive(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let s = setup(&pool, app.clone()).await;
    let file = upload(
        app.clone(),
        &s,
        json!({ "filename": "draft.docx", "file_url": "https://cdn.xee.test/d.docx", "size_bytes": 1 }),
    )
    .await;
    let id = file["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/files/{id}"),
        json!({ "category": "content" }),
        &s.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/files/{id}"),
        json!({ "category": "content", "tags": "copy, v2", "description": "Second pass" }),
        &s.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["category"], "content");
    assert_eq!(json["data"]["tags"], json!(["copy", "v2"]));
    assert_eq!(json["data"]["filename"], "draft.docx");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/files/{id}/archive"),
        json!({}),
        &s.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_archived"], true);

    let response = get_auth(app.clone(), "/api/v1/files", &s.designer.token).await;
    assert_eq!(body_json(response).await["data"], json!([]));
    let response = get_auth(
        app.clone(),
        "/api/v1/files?include_archived=true",
        &s.designer.token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = post_json_auth(
        app,
        &format!("/api/v1/files/{id}/restore"),
        json!({}),
        &s.manager.token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_archived"], false);
}

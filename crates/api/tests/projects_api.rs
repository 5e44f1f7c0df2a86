//! Project visibility, stages, tasks and the comment composer over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_ok, delete_auth, get_auth, patch_json_auth, post_json_auth, put_json_auth,
    seed_user, TestUser,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use xeetrack_core::roles::Role;

struct Team {
    manager: TestUser,
    designer: TestUser,
    outsider: TestUser,
    client: TestUser,
    other_client: TestUser,
}

async fn team(pool: &PgPool) -> Team {
    Team {
        manager: seed_user(pool, "Maya", Role::Manager).await,
        designer: seed_user(pool, "Dana", Role::Employee).await,
        outsider: seed_user(pool, "Otto", Role::Employee).await,
        client: seed_user(pool, "Cora", Role::Client).await,
        other_client: seed_user(pool, "Carl", Role::Client).await,
    }
}

async fn create_project(app: axum::Router, t: &Team) -> Value {
    create_ok(
        app,
        "/api/v1/projects",
        json!({
            "title": "  Spring Campaign ",
            "client_id": t.client.id(),
            "assigned_employees": [t.designer.id(), t.designer.id()]
        }),
        &t.manager.token,
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn created_project_has_five_stages(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);

    let project = create_project(app.clone(), &t).await;
    assert_eq!(project["title"], "Spring Campaign");
    assert_eq!(project["status"], "active");
    assert_eq!(project["priority"], "medium");
    assert_eq!(project["assigned_employees"], json!([t.designer.id()]));

    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}/stages", project["id"]),
        &t.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stages = body_json(response).await["data"].clone();
    let names: Vec<&str> = stages
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Planning", "Design", "Development", "QC", "Launch"]);
    assert_eq!(stages[0]["approval_status"], "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn project_client_must_be_a_client(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/projects",
        json!({ "title": "Oops", "client_id": t.designer.id() }),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn visibility_follows_role_rules(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_project(app.clone(), &t).await;
    let uri = format!("/api/v1/projects/{}", project["id"]);

    for (user, expected) in [
        (&t.manager, StatusCode::OK),
        (&t.designer, StatusCode::OK),
        (&t.client, StatusCode::OK),
        (&t.outsider, StatusCode::FORBIDDEN),
        (&t.other_client, StatusCode::FORBIDDEN),
    ] {
        let response = get_auth(app.clone(), &uri, &user.token).await;
        assert_eq!(response.status(), expected, "{}", user.profile.full_name);
    }

    let response = get_auth(app, "/api/v1/projects", &t.outsider.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_managers_update_projects(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_project(app.clone(), &t).await;
    let uri = format!("/api/v1/projects/{}", project["id"]);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "progress_percentage": 40 }),
        &t.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "progress_percentage": 140 }),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app,
        &uri,
        json!({ "progress_percentage": 40, "status": "on_hold" }),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress_percentage"], 40);
    assert_eq!(json["data"]["status"], "on_hold");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stage_rejection_with_comment_raises_comment_task(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_project(app.clone(), &t).await;

    let stages = body_json(
        get_auth(
            app.clone(),
            &format!("/api/v1/projects/{}/stages", project["id"]),
            &t.client.token,
        )
        .await,
    )
    .await["data"]
        .clone();
    let design_id = stages[1]["id"].as_i64().unwrap();

    // Assigned employees cannot sign off stages.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/stages/{design_id}/decision"),
        json!({ "decision": "approve" }),
        &t.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/stages/{design_id}/decision"),
        json!({ "decision": "reject", "comment": "Logo is too small" }),
        &t.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["stage"]["approval_status"], "rejected");
    assert_eq!(json["data"]["comment_task"]["text"], "Logo is too small");
    assert_eq!(json["data"]["comment_task"]["status"], "open");
    assert_eq!(json["data"]["comment_task"]["stage_id"], design_id);

    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}/comment-tasks", project["id"]),
        &t.designer.token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn composer_routes_comments_by_role(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_project(app.clone(), &t).await;
    let uri = format!("/api/v1/projects/{}/comments", project["id"]);

    let from_client = create_ok(
        app.clone(),
        &uri,
        json!({ "text": "  Can we use blue?  " }),
        &t.client.token,
    )
    .await;
    assert_eq!(from_client["kind"], "task");
    assert_eq!(from_client["comment"]["text"], "Can we use blue?");
    assert_eq!(from_client["comment"]["status"], "open");

    let from_staff = create_ok(
        app.clone(),
        &uri,
        json!({ "text": "Draft is uploaded" }),
        &t.designer.token,
    )
    .await;
    assert_eq!(from_staff["kind"], "global");
    assert_eq!(from_staff["comment"]["author_role"], "employee");

    let response = post_json_auth(app.clone(), &uri, json!({ "text": "   " }), &t.client.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Clients cannot move comment-tasks; staff can.
    let task_uri = format!("/api/v1/comment-tasks/{}/status", from_client["comment"]["id"]);
    let response = patch_json_auth(
        app.clone(),
        &task_uri,
        json!({ "status": "done" }),
        &t.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        patch_json_auth(app, &task_uri, json!({ "status": "in-progress" }), &t.designer.token)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in-progress");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn task_lifecycle(pool: PgPool) {
    let t = team(&pool).await;
    let app = common::build_test_app(pool);
    let project = create_project(app.clone(), &t).await;
    let uri = format!("/api/v1/projects/{}/tasks", project["id"]);

    // Blank title and missing assignee are rejected.
    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "title": " ", "assigned_to": t.designer.id() }),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response =
        post_json_auth(app.clone(), &uri, json!({ "title": "Hero" }), &t.manager.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Assignee must be on the project team.
    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "Hero", "assigned_to": t.outsider.id() }),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let task = create_ok(
        app.clone(),
        &uri,
        json!({ "title": "Hero banner", "assigned_to": t.designer.id() }),
        &t.manager.token,
    )
    .await;
    assert_eq!(task["status"], "open");
    assert_eq!(task["priority"], "medium");

    let status_uri = format!("/api/v1/tasks/{}/status", task["id"]);
    let response = patch_json_auth(
        app.clone(),
        &status_uri,
        json!({ "status": "done" }),
        &t.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(
        app.clone(),
        &status_uri,
        json!({ "status": "in-progress" }),
        &t.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The client sees the task read-only.
    let response = get_auth(app.clone(), "/api/v1/tasks", &t.client.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "in-progress");

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &t.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/tasks/{}", task["id"]),
        &t.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &t.manager.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

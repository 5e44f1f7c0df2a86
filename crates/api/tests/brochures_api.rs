//! Brochure lifecycle, page editing, locking, review and the feedback report.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, StatusCode};
use common::{
    body_json, body_text, create_ok, get_auth, post_json_auth, put_json_auth, seed_user, test_config,
    TestUser,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use xeetrack_api::background::autosave::{Draft, DraftKey, DraftSink, DraftWriteError, PgDraftSink};
use xeetrack_core::roles::Role;
use xeetrack_core::types::Actor;
use xeetrack_events::{ChangeAction, EventBus};

struct Cast {
    manager: TestUser,
    designer: TestUser,
    client: TestUser,
    other_client: TestUser,
}

async fn cast(pool: &PgPool) -> Cast {
    Cast {
        manager: seed_user(pool, "Maya", Role::Manager).await,
        designer: seed_user(pool, "Dana", Role::Employee).await,
        client: seed_user(pool, "Cora", Role::Client).await,
        other_client: seed_user(pool, "Carl", Role::Client).await,
    }
}

fn details(project_name: &str) -> Value {
    json!({
        "kind": "details",
        "project_name": project_name,
        "description": "Spring catalogue",
        "company_name": "Cora Ltd"
    })
}

/// A client brochure with page 1 saved, moved to `ready_for_design`.
async fn submitted_brochure(app: axum::Router, c: &Cast) -> (i64, Value) {
    let brochure = create_ok(app.clone(), "/api/v1/brochures", json!({}), &c.client.token).await;
    let id = brochure["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/brochures/{id}/pages/1"),
        json!({ "content": details("Spring") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();

    let response = post_json_auth(
        app,
        &format!("/api/v1/brochures/{id}/status"),
        json!({ "status": "ready_for_design" }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    (id, page)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_brochures_are_hidden_from_employees(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);

    let brochure = create_ok(app.clone(), "/api/v1/brochures", json!({}), &c.client.token).await;
    assert_eq!(brochure["status"], "draft");
    assert_eq!(brochure["client_id"], c.client.id());
    let uri = format!("/api/v1/brochures/{}", brochure["id"]);

    let response = get_auth(app.clone(), &uri, &c.designer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.clone(), &uri, &c.other_client.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("{uri}/status"),
        json!({ "status": "ready_for_design" }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), &uri, &c.designer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ready_for_design");
    assert_eq!(json["data"]["pages"], json!([]));
    assert_eq!(json["data"]["completion_percentage"], 0);

    let response = get_auth(app, "/api/v1/brochures/review-queue", &c.designer.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn creation_rules_by_role(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app.clone(), "/api/v1/brochures", json!({}), &c.designer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/brochures",
        json!({ "client_id": c.other_client.id() }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        post_json_auth(app.clone(), "/api/v1/brochures", json!({}), &c.manager.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let brochure = create_ok(
        app,
        "/api/v1/brochures",
        json!({ "client_id": c.client.id() }),
        &c.manager.token,
    )
    .await;
    assert_eq!(brochure["client_id"], c.client.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_moves_follow_the_lifecycle(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, _) = submitted_brochure(app.clone(), &c).await;
    let uri = format!("/api/v1/brochures/{id}/status");

    // Skipping a step is a conflict.
    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "completed" }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "in_design" }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "in_design" }),
        &c.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "status": "completed" }),
        &c.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        post_json_auth(app, &uri, json!({ "status": "completed" }), &c.manager.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn saving_pages_checks_shape_and_version(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, page) = submitted_brochure(app.clone(), &c).await;
    assert_eq!(page["version"], 1);
    assert_eq!(page["title"], "Project Details");
    assert_eq!(page["completion_percentage"], 100);
    assert_eq!(page["content"]["project_name"], "Spring");

    let uri = format!("/api/v1/brochures/{id}/pages/1");

    // Freeform content does not belong on page 1.
    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": { "kind": "freeform", "heading": "Hi" } }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Summer"), "expected_version": 1 }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["version"], 2);

    // The editor still holds version 1.
    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Autumn"), "expected_version": 1 }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Without a version the last write wins.
    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Winter") }),
        &c.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["version"], 3);
    assert_eq!(json["data"]["content"]["project_name"], "Winter");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn appended_pages_are_numbered_after_the_last(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, _) = submitted_brochure(app.clone(), &c).await;
    let uri = format!("/api/v1/brochures/{id}/pages");

    let second = create_ok(app.clone(), &uri, json!({}), &c.client.token).await;
    assert_eq!(second["page_number"], 2);
    assert_eq!(second["title"], "Company Information");
    assert_eq!(second["content"]["kind"], "company_info");

    let third = create_ok(app.clone(), &uri, json!({}), &c.designer.token).await;
    assert_eq!(third["page_number"], 3);
    assert_eq!(third["title"], "Content Page 1");
    assert_eq!(third["completion_percentage"], 0);

    let response = get_auth(app, &uri, &c.client.token).await;
    let json = body_json(response).await;
    let numbers: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["page_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, [1, 2, 3]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn locked_pages_reject_client_edits_only(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, page) = submitted_brochure(app.clone(), &c).await;
    let page_id = page["id"].as_i64().unwrap();
    let uri = format!("/api/v1/brochures/{id}/pages/1");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/lock"),
        json!({}),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/lock"),
        json!({}),
        &c.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_locked"], true);
    assert_eq!(json["data"]["locked_by"], c.designer.id());
    assert_eq!(json["data"]["locked_by_name"], "Dana");
    assert_eq!(json["data"]["approval_status"], "pending");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Client edit") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("{uri}/draft"),
        json!({ "content": details("Client draft") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Staff edit") }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/unlock"),
        json!({}),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_locked"], false);
    assert_eq!(json["data"]["locked_by"], Value::Null);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Client again") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Locking is not an approval action and leaves no comment behind.
    let response =
        get_auth(app, &format!("/api/v1/pages/{page_id}/comments"), &c.client.token).await;
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn review_cycle_with_audit_comments(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (_, page) = submitted_brochure(app.clone(), &c).await;
    let page_id = page["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/approve"),
        json!({}),
        &c.designer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/reject"),
        json!({ "comment": "   " }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/reject"),
        json!({ "comment": "Use the new logo" }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["page"]["approval_status"], "rejected");
    assert_eq!(json["data"]["comment"]["action_type"], "approval");
    assert_eq!(
        json["data"]["comment"]["text"],
        "Page requires changes - Maya: Use the new logo"
    );

    // Decided pages cannot be decided again until resubmitted.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/approve"),
        json!({}),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/resubmit"),
        json!({}),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["page"]["approval_status"], "pending");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/approve"),
        json!({ "comment": "Looks great" }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["page"]["approval_status"], "approved");
    assert_eq!(json["data"]["page"]["is_locked"], false);
    assert_eq!(
        json["data"]["comment"]["text"],
        "Page has been approved by Maya: Looks great"
    );

    let response =
        get_auth(app, &format!("/api/v1/pages/{page_id}/comments"), &c.client.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn page_comments_are_staff_only(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (_, page) = submitted_brochure(app.clone(), &c).await;
    let uri = format!("/api/v1/pages/{}/comments", page["id"]);

    let response =
        post_json_auth(app.clone(), &uri, json!({ "text": "Hello" }), &c.client.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let comment = create_ok(
        app.clone(),
        &uri,
        json!({ "text": " Swap the hero image " }),
        &c.designer.token,
    )
    .await;
    assert_eq!(comment["text"], "Swap the hero image");
    assert_eq!(comment["action_type"], "comment");
    assert_eq!(comment["marked_done"], false);

    let response = post_json_auth(
        app,
        &format!("/api/v1/page-comments/{}/done", comment["id"]),
        json!({}),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["marked_done"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn drafts_are_saved_after_the_debounce(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let brochure = create_ok(app.clone(), "/api/v1/brochures", json!({}), &c.client.token).await;
    let id = brochure["id"].as_i64().unwrap();
    let draft_uri = format!("/api/v1/brochures/{id}/pages/1/draft");

    for name in ["S", "Sp", "Spring"] {
        let response = put_json_auth(
            app.clone(),
            &draft_uri,
            json!({ "content": details(name) }),
            &c.client.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    tokio::time::sleep(Duration::from_millis(common::TEST_DEBOUNCE_MS * 6)).await;

    let response = get_auth(
        app,
        &format!("/api/v1/brochures/{id}/pages/1"),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"]["project_name"], "Spring");
    // Three keystrokes, one write.
    assert_eq!(json["data"]["version"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn explicit_save_wins_over_a_waiting_draft(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let brochure = create_ok(app.clone(), "/api/v1/brochures", json!({}), &c.client.token).await;
    let id = brochure["id"].as_i64().unwrap();
    let uri = format!("/api/v1/brochures/{id}/pages/1");

    let response = put_json_auth(
        app.clone(),
        &format!("{uri}/draft"),
        json!({ "content": details("Draft") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "content": details("Final") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["version"], 1);

    tokio::time::sleep(Duration::from_millis(common::TEST_DEBOUNCE_MS * 6)).await;

    let response = get_auth(app.clone(), &uri, &c.client.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"]["project_name"], "Final");
    assert_eq!(json["data"]["version"], 1);

    // The editor's copy is still current.
    let response = put_json_auth(
        app,
        &uri,
        json!({ "content": details("Final v2"), "expected_version": 1 }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["version"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_writes_respect_the_page_version(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool.clone());
    let brochure = create_ok(app.clone(), "/api/v1/brochures", json!({}), &c.client.token).await;
    let id = brochure["id"].as_i64().unwrap();

    let bus = Arc::new(EventBus::default());
    let mut events = bus.subscribe();
    let sink = PgDraftSink::new(pool, Arc::clone(&bus));
    let key = DraftKey {
        brochure_id: id,
        page_number: 1,
    };
    let draft = |name: &str, base_version: Option<i32>| Draft {
        actor: Actor::new(c.client.id(), "Cora", Role::Client),
        content: serde_json::from_value(details(name)).unwrap(),
        base_version,
    };

    // First write creates the page.
    sink.write(key, draft("Spring", None)).await.unwrap();
    let event = events.try_recv().unwrap();
    assert_eq!(event.action, ChangeAction::Insert);
    assert_eq!(event.brochure_id, Some(id));

    // A draft queued before the page existed cannot replace it.
    let err = sink.write(key, draft("Late", None)).await.unwrap_err();
    assert!(matches!(err, DraftWriteError::Refused { .. }));

    sink.write(key, draft("Summer", Some(1))).await.unwrap();
    assert_eq!(events.try_recv().unwrap().action, ChangeAction::Update);

    // Queued against version 1, but the page is now at 2.
    let err = sink.write(key, draft("Stale", Some(1))).await.unwrap_err();
    assert!(matches!(err, DraftWriteError::Refused { .. }));
    assert!(events.try_recv().is_err());

    let response = get_auth(
        app,
        &format!("/api/v1/brochures/{id}/pages/1"),
        &c.client.token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"]["project_name"], "Summer");
    assert_eq!(json["data"]["version"], 2);
}

fn freeform(heading: &str, body: &str) -> Value {
    json!({ "kind": "freeform", "heading": heading, "body_content": body })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reversed_words_in_page_bodies_are_restored(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, _) = submitted_brochure(app.clone(), &c).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/brochures/{id}/pages/3"),
        json!({ "content": freeform("olleh", "<p>olleh</p>") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content = body_json(response).await["data"]["content"].clone();
    assert_eq!(content["body_content"], "<p>hello</p>");
    // Only the rich-text body is touched.
    assert_eq!(content["heading"], "olleh");

    let response = get_auth(
        app,
        &format!("/api/v1/brochures/{id}/pages/3"),
        &c.client.token,
    )
    .await;
    assert_eq!(
        body_json(response).await["data"]["content"]["body_content"],
        "<p>hello</p>"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn details_and_company_pages_are_stored_verbatim(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, _) = submitted_brochure(app.clone(), &c).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/brochures/{id}/pages/1"),
        json!({ "content": details("olleh") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["content"]["project_name"], "olleh");

    let response = put_json_auth(
        app,
        &format!("/api/v1/brochures/{id}/pages/2"),
        json!({ "content": { "kind": "company_info", "about_us": "<p>olleh</p>" } }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["content"]["about_us"], "<p>olleh</p>");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn normalization_can_be_switched_off(pool: PgPool) {
    let c = cast(&pool).await;
    let config = xeetrack_api::config::ServerConfig {
        normalize_reversed_words: false,
        ..test_config()
    };
    let app = common::build_test_app_with_config(pool, config);
    let (id, _) = submitted_brochure(app.clone(), &c).await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/brochures/{id}/pages/3"),
        json!({ "content": freeform("Intro", "<p>olleh</p>") }),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["content"]["body_content"],
        "<p>olleh</p>"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feedback_report_download(pool: PgPool) {
    let c = cast(&pool).await;
    let app = common::build_test_app(pool);
    let (id, page) = submitted_brochure(app.clone(), &c).await;
    let page_id = page["id"].as_i64().unwrap();

    create_ok(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/comments"),
        json!({ "text": "Tighten the tagline" }),
        &c.designer.token,
    )
    .await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/pages/{page_id}/reject"),
        json!({ "comment": "Needs a logo" }),
        &c.manager.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/brochures/{id}/report"),
        &c.other_client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        app,
        &format!("/api/v1/brochures/{id}/report"),
        &c.client.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Brochure_Feedback_Report_"));
    assert!(disposition.ends_with(".txt\""));

    let text = body_text(response).await;
    assert!(text.starts_with("BROCHURE PROJECT FEEDBACK REPORT"));
    assert!(text.contains("Project: Cora's Brochure Project"));
    assert!(text.contains("Project Status: READY FOR DESIGN"));
    assert!(text.contains("- Requiring Changes: 1"));
    assert!(text.contains("- Total Feedback Items: 2"));
    assert!(text.contains("PROJECT DETAILS & COMPANY OVERVIEW (Page 1)"));
    assert!(text.contains("Tighten the tagline"));
    assert!(text.contains("Resubmit updated content for approval"));
}

//! HTTP-level integration tests for the recent-activity and history feeds.

mod common;

use axum::http::StatusCode;
use bimbingan_core::roles::{ROLE_ID_ADMIN, ROLE_ID_ADVISOR, ROLE_ID_STUDENT};
use common::{body_json, create_user, get_auth, login, pair, post_auth, post_json_auth};
use sqlx::PgPool;

/// Identifiers of a feed response, in order.
fn identifiers(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data must be an array")
        .iter()
        .map(|item| item["identifier"].as_str().unwrap().to_string())
        .collect()
}

struct Fixture {
    app: axum::Router,
    student_id: i64,
    advisor_id: i64,
    student_token: String,
    advisor_token: String,
    /// Requested for 25 January 2024, 09:00 WIB.
    timed_meeting: i64,
    /// Requested without a proposed time.
    untimed_meeting: i64,
    submission: i64,
}

async fn setup(pool: PgPool) -> Fixture {
    let student = create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let advisor = create_user(&pool, "dosen01", ROLE_ID_ADVISOR).await;
    pair(&pool, student.id, advisor.id, 1).await;
    let app = common::build_test_app(pool);
    let student_token = login(&app, "mhs01").await;
    let advisor_token = login(&app, "dosen01").await;

    let mut ids = Vec::new();
    for scheduled_at in [Some("2024-01-25T02:00:00Z"), None] {
        let body = serde_json::json!({
            "advisor_id": advisor.id,
            "topic": "Konsultasi metodologi",
            "scheduled_at": scheduled_at,
        });
        let response =
            post_json_auth(app.clone(), "/api/v1/meetings", body, &student_token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let body = serde_json::json!({
        "advisor_id": advisor.id,
        "title": "Bab 2 Tinjauan Pustaka",
        "file_url": "https://storage.kampus.ac.id/skripsi/bab2.pdf",
        "file_name": "bab2.pdf",
    });
    let response = post_json_auth(app.clone(), "/api/v1/submissions", body, &student_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let submission = body_json(response).await["data"]["id"].as_i64().unwrap();

    Fixture {
        app,
        student_id: student.id,
        advisor_id: advisor.id,
        student_token,
        advisor_token,
        timed_meeting: ids[0],
        untimed_meeting: ids[1],
        submission,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_advisor_recent_activity_includes_unscheduled_requests(pool: PgPool) {
    let f = setup(pool).await;

    let uri = format!("/api/v1/recent-activity/advisor/{}", f.advisor_id);
    let response = get_auth(f.app.clone(), &uri, &f.advisor_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // The request without a time sorts by when it was made: after the
    // submission that followed it, ahead of the 2024 meeting.
    assert_eq!(
        identifiers(&json),
        vec![
            format!("submission-{}", f.submission),
            format!("meeting-{}", f.untimed_meeting),
            format!("meeting-{}", f.timed_meeting),
        ]
    );

    let unscheduled = &json["data"][1];
    assert_eq!(unscheduled["status"], "waiting");
    assert_eq!(unscheduled["status_label"], "Menunggu Konfirmasi");

    let meeting = &json["data"][2];
    assert_eq!(meeting["category"], "meeting");
    assert_eq!(meeting["status"], "waiting");
    assert_eq!(meeting["status_label"], "Menunggu Konfirmasi");
    assert_eq!(meeting["occurred_at_display"], "25 Jan 2024 09:00");
    assert_eq!(meeting["label"], "Konsultasi metodologi");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_recent_activity_follows_review(pool: PgPool) {
    let f = setup(pool).await;
    let uri = format!("/api/v1/recent-activity/student/{}", f.student_id);

    // Nothing has been answered yet.
    let json = body_json(get_auth(f.app.clone(), &uri, &f.student_token).await).await;
    assert!(identifiers(&json).is_empty());

    let response = post_json_auth(
        f.app.clone(),
        &format!("/api/v1/meetings/{}/accept", f.timed_meeting),
        serde_json::json!({}),
        &f.advisor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        f.app.clone(),
        &format!("/api/v1/submissions/{}/revision", f.submission),
        serde_json::json!({ "notes": "Tambahkan penelitian terdahulu" }),
        &f.advisor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(f.app.clone(), &uri, &f.student_token).await).await;
    assert_eq!(
        identifiers(&json),
        vec![
            format!("submission-{}", f.submission),
            format!("meeting-{}", f.timed_meeting),
        ]
    );
    assert_eq!(json["data"][0]["status"], "need_revision");
    assert_eq!(json["data"][0]["category"], "submission");
    assert_eq!(json["data"][1]["status"], "accepted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_lists_finished_items(pool: PgPool) {
    let f = setup(pool).await;

    for action in ["accept", "complete"] {
        let response = post_json_auth(
            f.app.clone(),
            &format!("/api/v1/meetings/{}/{action}", f.timed_meeting),
            serde_json::json!({}),
            &f.advisor_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{action}");
    }
    let response = post_auth(
        f.app.clone(),
        &format!("/api/v1/submissions/{}/approve", f.submission),
        &f.advisor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let expected = vec![
        format!("submission-{}", f.submission),
        format!("meeting-{}", f.timed_meeting),
    ];

    let uri = format!("/api/v1/history/student/{}", f.student_id);
    let json = body_json(get_auth(f.app.clone(), &uri, &f.student_token).await).await;
    assert_eq!(identifiers(&json), expected);

    let uri = format!("/api/v1/history/advisor/{}", f.advisor_id);
    let json = body_json(get_auth(f.app.clone(), &uri, &f.advisor_token).await).await;
    assert_eq!(identifiers(&json), expected);

    // Finished items drop out of the advisor's recent feed; the open
    // request stays.
    let uri = format!("/api/v1/recent-activity/advisor/{}", f.advisor_id);
    let json = body_json(get_auth(f.app, &uri, &f.advisor_token).await).await;
    assert_eq!(
        identifiers(&json),
        vec![format!("meeting-{}", f.untimed_meeting)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_access_rules(pool: PgPool) {
    let admin = create_user(&pool, "admin", ROLE_ID_ADMIN).await;
    let f = setup(pool).await;
    let admin_token = login(&f.app, "admin").await;

    // Another user's feed.
    let uri = format!("/api/v1/recent-activity/advisor/{}", f.advisor_id);
    let response = get_auth(f.app.clone(), &uri, &f.student_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Own id under the wrong role.
    let uri = format!("/api/v1/recent-activity/advisor/{}", f.student_id);
    let response = get_auth(f.app.clone(), &uri, &f.student_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins may read any feed, but the role must match the user.
    let uri = format!("/api/v1/recent-activity/advisor/{}", f.advisor_id);
    let response = get_auth(f.app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/v1/history/student/{}", f.advisor_id);
    let response = get_auth(f.app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/history/student/{}", f.student_id + f.advisor_id + admin.id);
    let response = get_auth(f.app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Only students and advisors have feeds.
    let uri = format!("/api/v1/history/admin/{}", admin.id);
    let response = get_auth(f.app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

//! HTTP-level integration tests for auth, profile and admin user management.

mod common;

use axum::http::StatusCode;
use bimbingan_core::roles::{ROLE_ID_ADMIN, ROLE_ID_ADVISOR, ROLE_ID_STUDENT};
use common::{
    body_json, create_user, get, get_auth, login, post_json, post_json_auth, put_json_auth,
    TEST_PASSWORD,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Auth flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "mhs01", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "student");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "mhs01", "password": "salah-salah" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_after_five_failures(pool: PgPool) {
    create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);

    let wrong = serde_json::json!({ "username": "mhs01", "password": "salah-salah" });
    for _ in 0..5 {
        let response = post_json(app.clone(), "/api/v1/auth/login", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let right = serde_json::json!({ "username": "mhs01", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", right).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "mhs01", "password": TEST_PASSWORD });
    let json = body_json(post_json(app.clone(), "/api/v1/auth/login", body).await).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The old refresh token was revoked by rotation.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_requires_token(pool: PgPool) {
    create_user(&pool, "dosen01", ROLE_ID_ADVISOR).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app, "dosen01").await;
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "dosen01");
    assert_eq!(json["data"]["role"], "advisor");
    assert!(json["data"].get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile(pool: PgPool) {
    create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "mhs01").await;

    let body = serde_json::json!({ "full_name": "Siti Aminah", "phone": "0812000111" });
    let response = put_json_auth(app.clone(), "/api/v1/profile", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Siti Aminah");
    assert_eq!(json["data"]["email"], "mhs01@kampus.ac.id");

    let body = serde_json::json!({ "email": "not-an-email" });
    let response = put_json_auth(app, "/api/v1/profile", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password(pool: PgPool) {
    create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "mhs01").await;

    let body = serde_json::json!({ "current_password": "keliru-123", "new_password": "baru-12345" });
    let response = put_json_auth(app.clone(), "/api/v1/profile/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "current_password": TEST_PASSWORD, "new_password": "pendek" });
    let response = put_json_auth(app.clone(), "/api/v1/profile/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "current_password": TEST_PASSWORD, "new_password": "baru-12345" });
    let response = put_json_auth(app.clone(), "/api/v1/profile/password", body, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "username": "mhs01", "password": "baru-12345" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_reject_non_admins(pool: PgPool) {
    create_user(&pool, "dosen01", ROLE_ID_ADVISOR).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "dosen01").await;

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_and_lists_users(pool: PgPool) {
    create_user(&pool, "admin", ROLE_ID_ADMIN).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "admin").await;

    let body = serde_json::json!({
        "username": "mhs02",
        "email": "mhs02@kampus.ac.id",
        "password": "mahasiswa-1",
        "full_name": "Budi Santoso",
        "identity_number": "2010511001",
        "role_id": ROLE_ID_STUDENT,
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "student");
    assert_eq!(json["data"]["identity_number"], "2010511001");

    // Same username again violates uq_users_username.
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(
        app,
        &format!("/api/v1/admin/users?role_id={ROLE_ID_STUDENT}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_cannot_log_in(pool: PgPool) {
    create_user(&pool, "admin", ROLE_ID_ADMIN).await;
    let student = create_user(&pool, "mhs01", ROLE_ID_STUDENT).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "admin").await;

    let response = common::delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", student.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "username": "mhs01", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

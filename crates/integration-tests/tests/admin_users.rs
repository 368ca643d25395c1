//! Integration tests for user management.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use prifam_integration_tests::{TestContext, location};
use reqwest::StatusCode;

async fn signed_in() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.login("manager").await;
    ctx
}

const VALID: [(&str, &str); 5] = [
    ("name", "Asha Rao"),
    ("email", "asha.rao@company.com"),
    ("password", "correct-horse"),
    ("role", "agent"),
    ("active", "on"),
];

#[tokio::test]
async fn test_user_list_filters() {
    let ctx = signed_in().await;
    let body = ctx.page("/user-management").await;
    assert!(body.contains("5 users"));

    let body = ctx.page("/user-management?status=inactive").await;
    assert!(body.contains("1 users of 5"));
    assert!(body.contains("Mike Wilson"));

    let body = ctx.page("/user-management?search=company.com&role=admin").await;
    assert!(body.contains("John Smith"));
    assert!(body.contains("Alex Chen"));
    assert!(!body.contains("Emily Davis"));
}

#[tokio::test]
async fn test_create_user_requires_every_field() {
    let ctx = signed_in().await;
    for missing in ["name", "email", "password", "role"] {
        let form: Vec<(&str, &str)> = VALID.iter().copied().filter(|(k, _)| *k != missing).collect();
        let resp = ctx.post_form("/create-user", &form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "without {missing}");
        let body = resp.text().await.unwrap();
        assert!(body.contains("Please fill in all required fields."));
        assert!(!body.contains("correct-horse"));
    }

    let body = ctx.page("/user-management").await;
    assert!(body.contains("5 users"));
}

#[tokio::test]
async fn test_create_user_rejects_weak_password_and_bad_email() {
    let ctx = signed_in().await;

    let mut form = VALID.to_vec();
    form[2] = ("password", "short");
    let resp = ctx.post_form("/create-user", &form).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("at least 8 characters"));

    let mut form = VALID.to_vec();
    form[1] = ("email", "not-an-email");
    let resp = ctx.post_form("/create-user", &form).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("valid email"));
}

#[tokio::test]
async fn test_super_admin_role_not_assignable() {
    let ctx = signed_in().await;
    let mut form = VALID.to_vec();
    form[3] = ("role", "super-admin");
    let resp = ctx.post_form("/create-user", &form).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_user_appends_to_workspace() {
    let ctx = signed_in().await;
    let resp = ctx.post_form("/create-user", &VALID).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/user-management"));

    let body = ctx.page("/user-management").await;
    assert!(body.contains("User Asha Rao created."));
    assert!(body.contains("6 users"));
    assert!(body.contains("asha.rao@company.com"));
    assert!(body.contains("Never"));

    // Flash messages are shown once
    let body = ctx.page("/user-management").await;
    assert!(!body.contains("User Asha Rao created."));
}

#[tokio::test]
async fn test_unchecked_active_creates_inactive_user() {
    let ctx = signed_in().await;
    let form: Vec<(&str, &str)> = VALID.iter().copied().filter(|(k, _)| *k != "active").collect();
    ctx.post_form("/create-user", &form).await;

    let body = ctx.page("/user-management?status=inactive").await;
    assert!(body.contains("Asha Rao"));
    assert!(body.contains("Mike Wilson"));
}

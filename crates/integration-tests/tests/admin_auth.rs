//! Admin login, logout and access control.

use axum::http::StatusCode;
use support_desk_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp};

#[tokio::test]
async fn test_admin_requires_login() {
    let mut app = TestApp::new().await;

    app.get("/admin").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_correct_credentials_grant_access() {
    let mut app = TestApp::new().await;

    app.login(ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .assert_redirect("/admin");

    let page = app.get("/admin").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Přijaté zprávy"));
}

#[tokio::test]
async fn test_wrong_credentials_are_rejected() {
    for (username, password) in [
        ("admin", "wrong"),
        ("root", "admin"),
        ("Admin", "admin"),
        ("admin", ""),
        ("", ""),
    ] {
        let mut app = TestApp::new().await;

        let page = app.login(username, password).await;

        assert_eq!(page.status, StatusCode::UNAUTHORIZED, "{username}/{password}");
        assert!(page.body.contains("Neplatné údaje"));
        app.get("/admin").await.assert_redirect("/login");
    }
}

#[tokio::test]
async fn test_failed_login_keeps_username() {
    let mut app = TestApp::new().await;

    let page = app.login("jana", "nope").await;

    assert!(page.body.contains(r#"value="jana""#));
    assert!(page.csrf_token().is_some());
}

#[tokio::test]
async fn test_login_without_csrf_token_is_forbidden() {
    let mut app = TestApp::new().await;
    app.get("/login").await;

    let response = app
        .post_form(
            "/login",
            &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    app.get("/admin").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_login_rotates_session_id() {
    let mut app = TestApp::new().await;
    app.get("/login").await;
    let before = app.session_cookie().map(str::to_owned);

    app.login_as_admin().await;

    assert!(before.is_some());
    assert_ne!(app.session_cookie().map(str::to_owned), before);
}

#[tokio::test]
async fn test_logout_revokes_access() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;
    app.login_as_admin().await;

    app.get("/logout").await.assert_redirect("/");

    app.get("/admin").await.assert_redirect("/login");
    app.delete(id).await.assert_redirect("/login");
    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_logout_via_post() {
    let mut app = TestApp::new().await;
    app.login_as_admin().await;

    app.post_form("/logout", &[]).await.assert_redirect("/");

    app.get("/admin").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_logout_when_anonymous_is_harmless() {
    let mut app = TestApp::new().await;

    app.get("/logout").await.assert_redirect("/");
    app.get("/logout").await.assert_redirect("/");
}

#[tokio::test]
async fn test_login_page_redirects_logged_in_admin() {
    let mut app = TestApp::new().await;
    app.login_as_admin().await;

    app.get("/login").await.assert_redirect("/admin");
}

#[tokio::test]
async fn test_new_browser_is_not_logged_in() {
    let mut app = TestApp::new().await;
    app.login_as_admin().await;

    app.clear_cookies();

    app.get("/admin").await.assert_redirect("/login");
}

#[tokio::test]
async fn test_nav_shows_admin_links_when_logged_in() {
    let mut app = TestApp::new().await;

    let anonymous = app.get("/").await;
    app.login_as_admin().await;
    let admin = app.get("/").await;

    assert!(anonymous.body.contains(r#"href="/login""#));
    assert!(!anonymous.body.contains(r#"href="/admin""#));
    assert!(admin.body.contains(r#"href="/admin""#));
    assert!(admin.body.contains(r#"href="/logout""#));
}

#[tokio::test]
async fn test_login_replaces_csrf_token() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;
    let before = app.csrf_token().await;

    app.login_as_admin().await;
    let after = app.csrf_token().await;
    assert_ne!(before, after);

    let stale = app
        .post_form(&format!("/delete/{id}"), &[("csrf_token", before.as_str())])
        .await;
    assert_eq!(stale.status, StatusCode::FORBIDDEN);
    assert_eq!(app.submission_count().await, 1);

    app.delete(id).await.assert_redirect("/admin");
    assert_eq!(app.submission_count().await, 0);
}

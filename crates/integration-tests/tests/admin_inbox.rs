//! Admin submission list and deletion.

use axum::http::StatusCode;
use support_desk_integration_tests::TestApp;

#[tokio::test]
async fn test_empty_inbox_shows_placeholder() {
    let mut app = TestApp::new().await;
    app.login_as_admin().await;

    let page = app.get("/admin").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Žádná data."));
    assert!(!page.body.contains("<table"));
}

#[tokio::test]
async fn test_inbox_lists_every_submission_in_order() {
    let mut app = TestApp::new().await;
    for name in ["Jana", "Petr", "Eva"] {
        app.submit(name, "x@example.com", "navrh", "Text")
            .await
            .assert_redirect("/");
    }
    app.login_as_admin().await;

    let page = app.get("/admin").await;

    let positions: Vec<usize> = ["Jana", "Petr", "Eva"]
        .iter()
        .map(|n| page.body.find(&format!("<td>{n}</td>")).unwrap_or(usize::MAX))
        .collect();
    assert!(positions.iter().all(|&p| p != usize::MAX));
    assert!(positions.is_sorted());
    assert!(page.body.contains("Návrh na zlepšení"));
    assert!(page.body.contains("(3)"));
}

#[tokio::test]
async fn test_delete_removes_exactly_that_row() {
    let mut app = TestApp::new().await;
    let keep = app.insert_submission("Jana").await;
    let remove = app.insert_submission("Petr").await;
    app.login_as_admin().await;

    app.delete(remove).await.assert_redirect("/admin");

    assert_eq!(app.submission_count().await, 1);
    let page = app.get("/admin").await;
    assert!(page.body.contains("Záznam smazán"));
    assert!(page.body.contains(&format!("/delete/{keep}")));
    assert!(!page.body.contains(&format!("/delete/{remove}")));
}

#[tokio::test]
async fn test_delete_missing_row_changes_nothing() {
    let mut app = TestApp::new().await;
    app.insert_submission("Jana").await;
    app.login_as_admin().await;

    app.delete(9999).await.assert_redirect("/admin");

    assert_eq!(app.submission_count().await, 1);
    assert!(app.get("/admin").await.body.contains("Záznam nenalezen"));
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;
    app.login_as_admin().await;

    app.delete(id).await.assert_redirect("/admin");
    app.delete(id).await.assert_redirect("/admin");

    assert_eq!(app.submission_count().await, 0);
    assert!(app.get("/admin").await.body.contains("Záznam nenalezen"));
}

#[tokio::test]
async fn test_delete_requires_login() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;

    app.delete(id).await.assert_redirect("/login");

    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_delete_without_csrf_token_is_forbidden() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;
    app.login_as_admin().await;

    let response = app.post_form(&format!("/delete/{id}"), &[]).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_delete_with_non_numeric_id_is_bad_request() {
    let mut app = TestApp::new().await;
    app.insert_submission("Jana").await;
    app.login_as_admin().await;

    let response = app.post_form_with_csrf("/delete/abc", &[]).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_delete_is_post_only() {
    let mut app = TestApp::new().await;
    let id = app.insert_submission("Jana").await;
    app.login_as_admin().await;

    let response = app.get(&format!("/delete/{id}")).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.submission_count().await, 1);
}

#[tokio::test]
async fn test_submit_notice_is_not_shown_in_inbox() {
    let mut app = TestApp::new().await;
    app.login_as_admin().await;

    app.submit("Jana", "jana@example.com", "dotaz", "Dobrý den")
        .await
        .assert_redirect("/");
    let inbox = app.get("/admin").await;
    let form = app.get("/").await;

    assert!(inbox.body.contains("<td>Jana</td>"));
    assert!(!inbox.body.contains("Zpráva odeslána"));
    assert!(form.body.contains("Zpráva odeslána"));
}

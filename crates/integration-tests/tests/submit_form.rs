//! Public submission form: validation, storage and notices.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use support_desk_core::Category;
use support_desk_integration_tests::TestApp;
use support_desk_web::db::SubmissionRepository;

#[tokio::test]
async fn test_form_renders_with_categories_and_token() {
    let mut app = TestApp::new().await;

    let page = app.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.csrf_token().is_some());
    for category in Category::ALL {
        assert!(
            page.body.contains(&format!(r#"value="{}""#, category.code())),
            "missing option {category}"
        );
    }
    assert!(page.body.contains(r#"href="/login""#));
}

#[tokio::test]
async fn test_valid_submission_is_stored_and_redirects() {
    let mut app = TestApp::new().await;

    let response = app
        .submit("Jana", "jana@example.com", "dotaz", "Nejde mi přihlášení")
        .await;

    response.assert_redirect("/");
    assert_eq!(app.submission_count().await, 1);

    let stored = SubmissionRepository::new(&app.pool).list_all().await.unwrap();
    let row = stored.first().unwrap();
    assert_eq!(row.name, "Jana");
    assert_eq!(row.email.as_str(), "jana@example.com");
    assert_eq!(row.category, Category::Question);
    assert_eq!(row.message, "Nejde mi přihlášení");
}

#[tokio::test]
async fn test_success_notice_is_shown_once() {
    let mut app = TestApp::new().await;
    app.submit("Jana", "jana@example.com", "dotaz", "Dobrý den")
        .await
        .assert_redirect("/");

    let first = app.get("/").await;
    let second = app.get("/").await;

    assert!(first.body.contains("Zpráva odeslána"));
    assert!(!second.body.contains("Zpráva odeslána"));
}

#[tokio::test]
async fn test_each_empty_required_field_is_rejected() {
    let valid = [
        ("name", "Jana"),
        ("email", "jana@example.com"),
        ("category", "problem"),
        ("message", "Nefunguje tisk"),
    ];

    for (blank, _) in valid {
        let mut app = TestApp::new().await;
        let fields: Vec<(&str, &str)> = valid
            .iter()
            .map(|&(k, v)| if k == blank { (k, "  ") } else { (k, v) })
            .collect();

        let page = app.post_form_with_csrf("/", &fields).await;

        assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY, "blank {blank}");
        assert!(page.body.contains("<form"), "blank {blank}");
        assert_eq!(app.submission_count().await, 0, "blank {blank}");
    }
}

#[tokio::test]
async fn test_missing_fields_are_rejected_not_500() {
    let mut app = TestApp::new().await;

    let page = app.post_form_with_csrf("/", &[]).await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Povinné pole"));
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_invalid_email_is_rejected_and_input_kept() {
    let mut app = TestApp::new().await;

    for email in ["jana", "jana@", "@example.com", "jana@example", "ja na@example.com"] {
        let page = app
            .submit("Jana", email, "reklamace", "Reklamuji zboží")
            .await;

        assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY, "{email}");
        assert!(page.body.contains("Neplatný email"), "{email}");
        assert!(page.body.contains(r#"value="Jana""#));
        assert!(page.body.contains("Reklamuji zboží"));
        assert!(page.body.contains(r#"value="reklamace" selected"#));
    }
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let mut app = TestApp::new().await;

    let page = app
        .submit("Jana", "jana@example.com", "muž", "Dobrý den")
        .await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Vyberte platnou kategorii"));
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_overlong_name_is_rejected() {
    let mut app = TestApp::new().await;
    let name = "J".repeat(129);

    let page = app
        .submit(&name, "jana@example.com", "dotaz", "Dobrý den")
        .await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_rendered_input_is_escaped() {
    let mut app = TestApp::new().await;

    let page = app
        .submit("<script>x</script>", "bad", "dotaz", "Dobrý den")
        .await;

    assert!(!page.body.contains("<script>x</script>"));
    assert!(page.body.contains("&lt;script&gt;") || page.body.contains("&#60;script&#62;"));
}

#[tokio::test]
async fn test_each_valid_submission_adds_exactly_one_row() {
    let mut app = TestApp::new().await;

    for (i, category) in Category::ALL.iter().enumerate() {
        app.submit("Petr", "petr@example.com", category.code(), "Text")
            .await
            .assert_redirect("/");
        assert_eq!(app.submission_count().await, i64::try_from(i + 1).unwrap());
    }
}

#[tokio::test]
async fn test_submission_without_csrf_token_is_forbidden() {
    let mut app = TestApp::new().await;
    app.get("/").await;

    let response = app
        .post_form(
            "/",
            &[
                ("name", "Jana"),
                ("email", "jana@example.com"),
                ("category", "dotaz"),
                ("message", "Dobrý den"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.submission_count().await, 0);
}

#[tokio::test]
async fn test_submission_with_foreign_token_is_forbidden() {
    let mut victim = TestApp::new().await;
    let mut attacker = TestApp::new().await;
    let stolen = attacker.csrf_token().await;
    victim.get("/").await;

    let response = victim
        .post_form(
            "/",
            &[
                ("name", "Jana"),
                ("email", "jana@example.com"),
                ("category", "dotaz"),
                ("message", "Dobrý den"),
                ("csrf_token", &stolen),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(victim.submission_count().await, 0);
}

#[tokio::test]
async fn test_storage_failure_is_500_without_details() {
    let mut app = TestApp::new().await;
    sqlx::query(
        "CREATE TRIGGER refuse_submission BEFORE INSERT ON submission
         BEGIN SELECT RAISE(ABORT, 'database or disk is full'); END",
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let response = app
        .submit("Jana", "jana@example.com", "dotaz", "Dobrý den")
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Internal server error");
    assert_eq!(app.submission_count().await, 0);

    let page = app.get("/").await;
    assert!(!page.body.contains("Zpráva odeslána"));
}

//! Integration test harness for Support Desk.
//!
//! Drives the full router (sessions, CSRF, templates) in-process against a
//! fresh in-memory `SQLite` database per test. No server or network needed.
//!
//! ```bash
//! cargo test -p support-desk-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;

use support_desk_web::config::DeskConfig;
use support_desk_web::db::{self, AdminUserRepository, SubmissionRepository};
use support_desk_web::routes;
use support_desk_web::services::auth::hash_password_with;
use support_desk_web::state::AppState;

/// Username and password of the account every test app starts with.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

const TEST_SESSION_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Target of a redirect, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of the first hidden `csrf_token` field on the page.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        let marker = r#"name="csrf_token" value=""#;
        let start = self.body.find(marker)? + marker.len();
        let rest = self.body.get(start..)?;
        let end = rest.find('"')?;
        rest.get(..end).map(str::to_owned)
    }

    /// Assert a 303 redirect to `path`.
    pub fn assert_redirect(&self, path: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location(), Some(path));
    }
}

/// One browser talking to a fresh application instance.
///
/// Keeps the session cookie and the most recent CSRF token between requests.
pub struct TestApp {
    router: Router,
    pub pool: SqlitePool,
    session_store: SqliteStore,
    cookie: Option<String>,
    csrf: Option<String>,
}

impl TestApp {
    /// Build an app with migrations applied and the `admin`/`admin` account.
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::migrate(&pool).await.unwrap();

        seed_admin(&pool, ADMIN_USERNAME, ADMIN_PASSWORD).await;

        let config = DeskConfig::from_lookup(|key| match key {
            "DESK_SESSION_SECRET" => Some(TEST_SESSION_SECRET.to_owned()),
            _ => None,
        })
        .unwrap();

        let state = AppState::new(config, pool.clone());
        let session_store = state.session_store().clone();
        let router = routes::app(state);

        Self {
            router,
            pool,
            session_store,
            cookie: None,
            csrf: None,
        }
    }

    /// Current session cookie (`name=value`), if the server has set one.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Replace the session cookie sent with later requests.
    pub fn set_session_cookie(&mut self, cookie: String) {
        self.cookie = Some(cookie);
    }

    /// Forget the session, as a new browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
        self.csrf = None;
    }

    /// The CSRF token for this session, fetching a form first if needed.
    pub async fn csrf_token(&mut self) -> String {
        if let Some(token) = &self.csrf {
            return token.clone();
        }
        let page = self.get("/").await;
        page.csrf_token()
            .expect("submission form carries a csrf token")
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self
            .request(Method::GET, path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST an urlencoded form exactly as given (no token added).
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = self
            .request(Method::POST, path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST a form with this session's CSRF token appended.
    pub async fn post_form_with_csrf(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let token = self.csrf_token().await;
        let mut fields = fields.to_vec();
        fields.push(("csrf_token", token.as_str()));
        self.post_form(path, &fields).await
    }

    /// Submit the public form.
    pub async fn submit(
        &mut self,
        name: &str,
        email: &str,
        category: &str,
        message: &str,
    ) -> TestResponse {
        self.post_form_with_csrf(
            "/",
            &[
                ("name", name),
                ("email", email),
                ("category", category),
                ("message", message),
            ],
        )
        .await
    }

    /// Log in. A successful login replaces the session's CSRF token, so the
    /// cached one is dropped.
    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        let response = self
            .post_form_with_csrf("/login", &[("username", username), ("password", password)])
            .await;
        if response.status == StatusCode::SEE_OTHER {
            self.csrf = None;
        }
        response
    }

    pub async fn login_as_admin(&mut self) {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .assert_redirect("/admin");
    }

    pub async fn delete(&mut self, id: i64) -> TestResponse {
        self.post_form_with_csrf(&format!("/delete/{id}"), &[]).await
    }

    pub async fn submission_count(&self) -> i64 {
        SubmissionRepository::new(&self.pool).count().await.unwrap()
    }

    /// Insert a submission directly, bypassing HTTP. Returns its ID.
    pub async fn insert_submission(&self, name: &str) -> i64 {
        let input = support_desk_core::SubmissionInput {
            name: name.to_owned(),
            email: "tester@example.com".to_owned(),
            category: "problem".to_owned(),
            message: format!("Zpráva od {name}"),
        };
        let submission = support_desk_core::NewSubmission::validate(&input).unwrap();
        SubmissionRepository::new(&self.pool)
            .insert(&submission)
            .await
            .unwrap()
            .id
            .as_i64()
    }

    /// Number of rows in the session table.
    pub async fn session_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tower_sessions")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Mark every stored session as expired.
    pub async fn expire_all_sessions(&self) {
        sqlx::query("UPDATE tower_sessions SET expiry_date = 0")
            .execute(&self.pool)
            .await
            .unwrap();
    }

    /// Run one pass of the expired-session cleanup.
    pub async fn delete_expired_sessions(&self) {
        self.session_store.delete_expired().await.unwrap();
    }

    fn request(&self, method: Method, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        let response = TestResponse {
            status,
            headers,
            body,
        };
        if let Some(token) = response.csrf_token() {
            self.csrf = Some(token);
        }
        response
    }
}

/// Create an admin account with cheap argon2 parameters.
pub async fn seed_admin(pool: &SqlitePool, username: &str, password: &str) {
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(1024, 1, 1, None).unwrap(),
    );
    let hash = hash_password_with(&argon2, password).unwrap();
    AdminUserRepository::new(pool)
        .create(username, &hash)
        .await
        .unwrap();
}

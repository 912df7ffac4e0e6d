//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdmin, clear_current_admin, csrf, set_current_admin};
use crate::models::Notice;
use crate::services::AuthError;
use crate::state::AppState;

/// Notice shown for any failed login, whether the username or the password
/// was wrong.
pub const INVALID_CREDENTIALS_NOTICE: &str = "Neplatné údaje";

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub notice: Option<Notice>,
    pub csrf_token: String,
}

/// Display the login page. Admins who are already logged in go straight to
/// the inbox.
///
/// GET /login
#[instrument(skip_all)]
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin, session: Session) -> Result<Response> {
    if admin.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }

    let csrf_token = csrf::token(&session).await?;
    Ok(LoginTemplate {
        username: String::new(),
        notice: None,
        csrf_token,
    }
    .into_response())
}

/// Check credentials and start an admin session.
///
/// POST /login
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    match state.verifier().verify(&form.username, &form.password).await {
        Ok(admin) => {
            set_current_admin(&session, &admin).await?;
            set_sentry_user(&admin.id, &admin.username);
            tracing::info!(admin_id = %admin.id, "Admin logged in");

            Ok(Redirect::to("/admin").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Rejected admin login");

            let csrf_token = csrf::token(&session).await?;
            let page = LoginTemplate {
                username: form.username,
                notice: Some(Notice::error(INVALID_CREDENTIALS_NOTICE)),
                csrf_token,
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// End the admin session. Safe to call when nobody is logged in.
///
/// GET|POST /logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

//! Admin inbox: list and delete submissions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use support_desk_core::{Submission, SubmissionId};

use crate::db::{RepositoryError, SubmissionRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::flash::{self, Page};
use crate::middleware::{RequireAdmin, csrf};
use crate::models::Notice;
use crate::state::AppState;

pub const DELETED_NOTICE: &str = "Záznam smazán";
pub const NOT_FOUND_NOTICE: &str = "Záznam nenalezen";

/// Form carrying only the CSRF token (delete buttons).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsrfForm {
    pub csrf_token: String,
}

/// A submission prepared for the table.
pub struct SubmissionView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub category: &'static str,
    pub message: String,
    pub created_at: String,
}

impl From<Submission> for SubmissionView {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id.as_i64(),
            name: s.name,
            email: s.email.to_string(),
            category: s.category.label(),
            message: s.message,
            created_at: s.created_at.format("%-d. %-m. %Y %H:%M").to_string(),
        }
    }
}

/// Submission list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/list.html")]
pub struct ListTemplate {
    pub admin_username: String,
    pub submissions: Vec<SubmissionView>,
    pub notice: Option<Notice>,
    pub csrf_token: String,
}

/// Show every submission.
///
/// GET /admin
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let submissions = SubmissionRepository::new(state.pool()).list_all().await?;
    let notice = flash::take(&session, Page::Inbox).await?;
    let csrf_token = csrf::token(&session).await?;

    Ok(ListTemplate {
        admin_username: admin.username,
        submissions: submissions.into_iter().map(Into::into).collect(),
        notice,
        csrf_token,
    }
    .into_response())
}

/// Permanently delete one submission.
///
/// POST /delete/{id}
#[instrument(skip_all, fields(admin = %admin.username, submission_id = id))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<CsrfForm>,
) -> Result<Redirect> {
    csrf::verify(&session, &form.csrf_token).await?;

    let notice = match SubmissionRepository::new(state.pool())
        .delete(SubmissionId::new(id))
        .await
    {
        Ok(()) => {
            let id_str = id.to_string();
            add_breadcrumb(
                "admin",
                "Deleted submission",
                Some(&[("submission_id", id_str.as_str())]),
            );
            tracing::info!("Submission deleted");
            Notice::success(DELETED_NOTICE)
        }
        Err(RepositoryError::NotFound) => {
            tracing::info!("Delete requested for missing submission");
            Notice::info(NOT_FOUND_NOTICE)
        }
        Err(e) => return Err(e.into()),
    };

    flash::push(&session, Page::Inbox, notice).await?;
    Ok(Redirect::to("/admin"))
}

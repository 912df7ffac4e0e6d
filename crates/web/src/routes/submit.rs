//! Public submission form.

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

use support_desk_core::{Category, Field, NewSubmission, SubmissionInput, ValidationErrors};

use crate::db::SubmissionRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::flash::{self, Page};
use crate::middleware::{OptionalAdmin, csrf};
use crate::models::Notice;
use crate::state::AppState;

/// Notice shown after a successful submission.
pub const SUBMITTED_NOTICE: &str = "Zpráva odeslána";

/// Posted form data.
///
/// Every field defaults to empty so a missing field becomes a validation
/// error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitForm {
    pub name: String,
    pub email: String,
    pub category: String,
    pub message: String,
    pub csrf_token: String,
}

impl SubmitForm {
    fn into_input(self) -> SubmissionInput {
        SubmissionInput {
            name: self.name,
            email: self.email,
            category: self.category,
            message: self.message,
        }
    }
}

/// One `<option>` of the category select.
pub struct CategoryOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn category_options(selected: &str) -> Vec<CategoryOption> {
    let selected = if selected.is_empty() {
        Category::default().code()
    } else {
        selected
    };

    Category::ALL
        .iter()
        .map(|c| CategoryOption {
            code: c.code(),
            label: c.label(),
            selected: c.code() == selected,
        })
        .collect()
}

/// Submission form template.
#[derive(Template, WebTemplate)]
#[template(path = "submit.html")]
pub struct SubmitTemplate {
    pub name: String,
    pub email: String,
    pub message: String,
    pub categories: Vec<CategoryOption>,
    pub name_error: Option<&'static str>,
    pub email_error: Option<&'static str>,
    pub category_error: Option<&'static str>,
    pub message_error: Option<&'static str>,
    pub notice: Option<Notice>,
    pub csrf_token: String,
    pub is_admin: bool,
}

impl SubmitTemplate {
    fn empty(notice: Option<Notice>, csrf_token: String, is_admin: bool) -> Self {
        Self::with_errors(
            SubmissionInput::default(),
            &ValidationErrors::default(),
            notice,
            csrf_token,
            is_admin,
        )
    }

    fn with_errors(
        input: SubmissionInput,
        errors: &ValidationErrors,
        notice: Option<Notice>,
        csrf_token: String,
        is_admin: bool,
    ) -> Self {
        Self {
            categories: category_options(&input.category),
            name: input.name,
            email: input.email,
            message: input.message,
            name_error: errors.get(Field::Name),
            email_error: errors.get(Field::Email),
            category_error: errors.get(Field::Category),
            message_error: errors.get(Field::Message),
            notice,
            csrf_token,
            is_admin,
        }
    }
}

/// Render the empty form, with any pending notice.
///
/// GET /
#[instrument(skip_all)]
pub async fn form(OptionalAdmin(admin): OptionalAdmin, session: Session) -> Result<Response> {
    let notice = flash::take(&session, Page::Form).await?;
    let csrf_token = csrf::token(&session).await?;

    Ok(SubmitTemplate::empty(notice, csrf_token, admin.is_some()).into_response())
}

/// Validate and store a submission.
///
/// POST /
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAdmin(admin): OptionalAdmin,
    session: Session,
    Form(form): Form<SubmitForm>,
) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    let input = form.into_input();
    match NewSubmission::validate(&input) {
        Ok(submission) => {
            let stored = SubmissionRepository::new(state.pool())
                .insert(&submission)
                .await?;
            tracing::info!(
                submission_id = %stored.id,
                category = %stored.category,
                "Submission stored"
            );

            flash::push(&session, Page::Form, Notice::success(SUBMITTED_NOTICE)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(errors) => {
            tracing::debug!(errors = %errors, "Submission rejected");

            let notice = errors.first().map(|e| Notice::error(e.message));
            let csrf_token = csrf::token(&session).await?;
            let page =
                SubmitTemplate::with_errors(input, &errors, notice, csrf_token, admin.is_some());

            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

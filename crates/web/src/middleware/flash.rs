//! One-shot notices carried across a redirect.
//!
//! Each page has its own slot, so a notice queued for one page is never
//! shown on another.

use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Notice, session_keys};

/// Page a notice is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The public submission form (`/`).
    Form,
    /// The admin inbox (`/admin`).
    Inbox,
}

impl Page {
    const fn key(self) -> &'static str {
        match self {
            Self::Form => session_keys::FLASH_FORM,
            Self::Inbox => session_keys::FLASH_INBOX,
        }
    }
}

/// Queue a notice for the next render of `page`.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn push(session: &Session, page: Page, notice: Notice) -> Result<(), AppError> {
    session.insert(page.key(), notice).await?;
    Ok(())
}

/// Take the notice pending for `page`, if any. A notice is returned at most
/// once.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn take(session: &Session, page: Page) -> Result<Option<Notice>, AppError> {
    Ok(session.remove::<Notice>(page.key()).await?)
}

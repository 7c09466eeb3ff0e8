use axum::{
    Extension, Form,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::warn;

use super::types::{LoginForm, Notice};
use super::{ApiError, AppState};
use crate::db::Role;

pub const SESSION_USER_KEY: &str = "user";
pub const SESSION_ROLE_KEY: &str = "role";
const NOTICES_KEY: &str = "notices";

const LOGIN_WARNING: &str = "You need to be logged in to view this page.";
const DENIAL_NOTICE: &str = "You do not have permission to access this page.";

/// Request-scoped identity established by the guards and handed to handlers
/// through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
}

// ============================================================================
// Session notices
// ============================================================================

/// Queue a notice for the next rendered view.
pub async fn push_notice(session: &Session, category: &str, message: impl Into<String>) {
    let mut notices: Vec<Notice> = session
        .get(NOTICES_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    notices.push(Notice {
        category: category.to_string(),
        message: message.into(),
    });

    if let Err(e) = session.insert(NOTICES_KEY, &notices).await {
        warn!("Failed to queue notice: {e}");
    }
}

/// Drain queued notices.
pub async fn take_notices(session: &Session) -> Vec<Notice> {
    session
        .remove::<Vec<Notice>>(NOTICES_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

// ============================================================================
// Guards
// ============================================================================

async fn session_identity(session: &Session) -> Option<CurrentUser> {
    let username = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()?;
    let role = session
        .get::<String>(SESSION_ROLE_KEY)
        .await
        .ok()
        .flatten()
        .and_then(|role| Role::parse(&role))?;

    Some(CurrentUser { username, role })
}

/// Guard: any authenticated session.
pub async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    let Some(user) = session_identity(&session).await else {
        push_notice(&session, "warning", LOGIN_WARNING).await;
        return Redirect::to("/login").into_response();
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Guard: admin role. A logged-in non-admin lands on their own dashboard.
pub async fn require_admin(session: Session, mut request: Request, next: Next) -> Response {
    let Some(user) = session_identity(&session).await else {
        push_notice(&session, "warning", LOGIN_WARNING).await;
        return Redirect::to("/login").into_response();
    };

    if !user.role.is_admin() {
        push_notice(&session, "danger", DENIAL_NOTICE).await;
        return Redirect::to("/employee/dashboard").into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Guard: employee role. A logged-in admin lands on the admin dashboard.
pub async fn require_employee(session: Session, mut request: Request, next: Next) -> Response {
    let Some(user) = session_identity(&session).await else {
        push_notice(&session, "warning", LOGIN_WARNING).await;
        return Redirect::to("/login").into_response();
    };

    if user.role.is_admin() {
        push_notice(&session, "danger", DENIAL_NOTICE).await;
        return Redirect::to("/admin/dashboard").into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
/// Authenticate and redirect by role. The failure notice never distinguishes
/// an unknown user from a wrong password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let valid = state
        .store()
        .verify_user_password(&form.username, &form.password)
        .await
        .map_err(ApiError::database)?;

    let user = if valid {
        state
            .store()
            .get_user_by_username(&form.username)
            .await
            .map_err(ApiError::database)?
    } else {
        None
    };

    let Some(user) = user else {
        push_notice(&session, "danger", "Invalid username or password.").await;
        return Ok(Redirect::to("/login").into_response());
    };

    session
        .insert(SESSION_USER_KEY, &user.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(SESSION_ROLE_KEY, user.role.as_str())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    if user.role == Role::Employee
        && let Err(e) = state
            .store()
            .push_alert(&format!("Employee {} logged in.", user.username))
            .await
    {
        warn!("Failed to record login alert: {e:#}");
    }

    let target = if user.role.is_admin() {
        "/admin/dashboard"
    } else {
        "/employee/dashboard"
    };

    Ok(Redirect::to(target).into_response())
}

/// GET /logout
/// Record an employee logout, then clear the session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, ApiError> {
    if user.role == Role::Employee
        && let Err(e) = state
            .store()
            .push_alert(&format!("Employee {} logged out.", user.username))
            .await
    {
        warn!("Failed to record logout alert: {e:#}");
    }

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Redirect::to("/login"))
}

/// GET /summary
/// Redirect to the role-specific summary.
pub async fn summary_redirect(Extension(user): Extension<CurrentUser>) -> Redirect {
    if user.role.is_admin() {
        Redirect::to("/admin/summary")
    } else {
        Redirect::to("/employee/summary")
    }
}

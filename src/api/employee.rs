use axum::{Extension, Form, Json, extract::State, response::Redirect};
use chrono::NaiveDate;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::warn;

use super::auth::{CurrentUser, push_notice, take_notices};
use super::types::{ApiResponse, DashboardView, SummaryView, UpdateView, WorkLogForm};
use super::{ApiError, AppState};
use crate::db::NewWorkLog;

/// GET /employee/dashboard
pub async fn dashboard(
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Json<ApiResponse<DashboardView>> {
    Json(ApiResponse::success(DashboardView {
        username: user.username,
        notices: take_notices(&session).await,
    }))
}

/// GET /employee/update
/// The submitter's own logs, newest first.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
) -> Json<ApiResponse<UpdateView>> {
    let logs = state
        .store()
        .list_work_logs_for(&user.username)
        .await
        .unwrap_or_else(|e| {
            warn!("Log store unreadable, serving empty listing: {e:#}");
            Vec::new()
        });

    Json(ApiResponse::success(UpdateView {
        employee_name: user.username,
        logs,
        notices: take_notices(&session).await,
    }))
}

/// Single parse attempt; malformed dates are stored as null and skipped by
/// date-keyed aggregation.
fn parse_submitted_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// POST /employee/update
/// One immutable row per submission. Authorship comes from the session
/// identity, never from the form.
pub async fn submit_log(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<WorkLogForm>,
) -> Result<Redirect, ApiError> {
    let entry = NewWorkLog {
        team_member: user.username,
        function: form.function,
        date: parse_submitted_date(&form.date),
        file_number: form.file_number,
        status: form.status,
        tier1_escalation_reason: form.tier1_escalation,
        im_escalation_reason: form.im_escalation,
        department: form.department,
        comments: form.comments,
    };

    state
        .store()
        .add_work_log(entry)
        .await
        .map_err(ApiError::database)?;

    push_notice(&session, "success", "Work log added successfully!").await;
    Ok(Redirect::to("/employee/update"))
}

/// GET /employee/summary
/// The submitter's own per-function counts.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Json<ApiResponse<SummaryView>> {
    let counts = state.reporting().member_summary(&user.username).await;

    Json(ApiResponse::success(SummaryView {
        functions: counts.keys().cloned().collect(),
        employee_name: Some(user.username),
        summary_counts: counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_submitted_date;

    #[test]
    fn test_parse_submitted_date() {
        assert_eq!(
            parse_submitted_date("2024-03-11"),
            Some("2024-03-11".to_string())
        );
        assert_eq!(
            parse_submitted_date(" 2024-03-11 "),
            Some("2024-03-11".to_string())
        );
        assert_eq!(parse_submitted_date("03/11/2024"), None);
        assert_eq!(parse_submitted_date("2024-13-40"), None);
        assert_eq!(parse_submitted_date(""), None);
    }
}

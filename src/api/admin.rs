use axum::{
    Form, Json,
    extract::{Query, State},
    response::Redirect,
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::warn;

use super::auth::{push_notice, take_notices};
use super::types::{
    AlertsView, ApiResponse, CreateEmployeeForm, ProvisionView, RosterView, SummaryView,
    TrackerQuery, TrackerView,
};
use super::{ApiError, AppState};
use crate::db::{NewUser, ProvisionError, Role};

/// GET /admin/summary
/// Global per-function counts.
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SummaryView>> {
    let counts = state.reporting().global_summary().await;

    Json(ApiResponse::success(SummaryView {
        functions: counts.keys().cloned().collect(),
        employee_name: None,
        summary_counts: counts,
    }))
}

/// GET /admin/dashboard
/// The alert feed, newest first.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Json<ApiResponse<AlertsView>> {
    let alerts = state.store().recent_alerts().await.unwrap_or_else(|e| {
        warn!("Alert store unreadable, serving empty feed: {e:#}");
        Vec::new()
    });

    Json(ApiResponse::success(AlertsView {
        alerts,
        notices: take_notices(&session).await,
    }))
}

/// GET /admin/create_employee
pub async fn create_employee_page(session: Session) -> Json<ApiResponse<ProvisionView>> {
    Json(ApiResponse::success(ProvisionView {
        notices: take_notices(&session).await,
    }))
}

/// POST /admin/create_employee
/// Provision a credential record; every rejection redirects back to the form
/// with a specific notice and leaves the roster unchanged.
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<CreateEmployeeForm>,
) -> Result<Redirect, ApiError> {
    let fields = [
        &form.team_member,
        &form.department,
        &form.role,
        &form.shift,
        &form.location,
        &form.password,
    ];
    if fields.iter().any(|field| field.trim().is_empty()) {
        push_notice(&session, "danger", "All fields are required.").await;
        return Ok(Redirect::to("/admin/create_employee"));
    }

    let Some(role) = Role::parse(&form.role) else {
        push_notice(&session, "danger", "Role must be admin or employee.").await;
        return Ok(Redirect::to("/admin/create_employee"));
    };

    let security = state.config().read().await.security.clone();
    let new_user = NewUser {
        username: &form.team_member,
        password: &form.password,
        role,
        department: &form.department,
        shift: &form.shift,
        location: &form.location,
    };

    match state.store().create_user(new_user, &security).await {
        Ok(user) => {
            push_notice(
                &session,
                "success",
                format!("Employee \"{}\" created successfully!", user.username),
            )
            .await;
            Ok(Redirect::to("/admin/view_employees"))
        }
        Err(err @ (ProvisionError::PasswordTooShort | ProvisionError::DuplicateUsername(_))) => {
            push_notice(&session, "danger", err.to_string()).await;
            Ok(Redirect::to("/admin/create_employee"))
        }
        Err(ProvisionError::Storage(e)) => Err(ApiError::database(e)),
    }
}

/// GET /admin/view_employees
/// Roster with derived activity status.
pub async fn view_employees(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Json<ApiResponse<RosterView>> {
    Json(ApiResponse::success(RosterView {
        employees: state.reporting().roster().await,
        notices: take_notices(&session).await,
    }))
}

/// GET /admin/tracker?employee=NAME
/// Full or per-employee log listing, plus the username list for the filter
/// control.
pub async fn tracker(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrackerQuery>,
) -> Json<ApiResponse<TrackerView>> {
    let employees: Vec<String> = state
        .store()
        .list_users()
        .await
        .unwrap_or_else(|e| {
            warn!("Credential store unreadable, serving empty roster: {e:#}");
            Vec::new()
        })
        .into_iter()
        .map(|user| user.username)
        .collect();

    let selected = query.employee.filter(|name| !name.is_empty());

    let logs = match selected.as_deref() {
        Some(name) => state.store().list_work_logs_for(name).await,
        None => state.store().list_work_logs().await,
    }
    .unwrap_or_else(|e| {
        warn!("Log store unreadable, serving empty listing: {e:#}");
        Vec::new()
    });

    Json(ApiResponse::success(TrackerView {
        employees,
        logs,
        selected_employee: selected,
    }))
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{alerts, work_logs};
use crate::services::reporting::EmployeeStatus;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Session notice surfaced on the next rendered view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub category: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateEmployeeForm {
    pub team_member: String,
    pub department: String,
    pub role: String,
    pub shift: String,
    pub location: String,
    pub password: String,
}

/// Work-log submission fields. Deliberately has no `team_member` field:
/// authorship always comes from the session identity.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct WorkLogForm {
    pub function: String,
    pub date: String,
    pub file_number: Option<String>,
    pub status: Option<String>,
    pub tier1_escalation: Option<String>,
    pub im_escalation: Option<String>,
    pub department: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackerQuery {
    pub employee: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub username: String,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub functions: Vec<String>,
    pub summary_counts: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateView {
    pub employee_name: String,
    pub logs: Vec<work_logs::Model>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct AlertsView {
    pub alerts: Vec<alerts::Model>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ProvisionView {
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct RosterView {
    pub employees: Vec<EmployeeStatus>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct TrackerView {
    pub employees: Vec<String>,
    pub logs: Vec<work_logs::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_employee: Option<String>,
}

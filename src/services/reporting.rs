//! Aggregation engine: derived views over the log store.
//!
//! All three views are pure functions of the stored rows; the service
//! wrapper feeds them from the [`Store`] and degrades to catalog-initialized
//! defaults when the store is unreadable.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::catalog;
use crate::db::Store;
use crate::entities::work_logs;

/// Days of inactivity (inclusive) before an employee stops counting as
/// active.
const ACTIVE_WINDOW_DAYS: i64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the chart matrix: a date plus a count per catalog column and
/// the vestigial "Total Hours" column.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRow {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(flatten)]
    pub columns: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

/// Roster entry with derived activity status.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeStatus {
    pub team_member: String,
    pub department: String,
    pub shift: String,
    pub location: String,
    pub status: ActivityStatus,
    pub last_activity: Option<String>,
}

/// Per-function tallies. Every catalog function appears, zero-initialized;
/// ad hoc function values recorded outside the catalog are surfaced as their
/// own keys rather than folded into catalog counts. Empty values are
/// skipped.
#[must_use]
pub fn function_summary<'a, I>(functions: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, i64> = catalog::FUNCTIONS
        .iter()
        .map(|function| ((*function).to_string(), 0))
        .collect();

    for function in functions {
        if function.is_empty() {
            continue;
        }
        *counts.entry(function.to_string()).or_insert(0) += 1;
    }

    counts
}

fn empty_columns() -> BTreeMap<String, i64> {
    let mut columns: BTreeMap<String, i64> = catalog::FUNCTIONS
        .iter()
        .map(|function| ((*function).to_string(), 0))
        .collect();
    columns.insert(catalog::TOTAL_HOURS_COLUMN.to_string(), 0);
    columns
}

/// Chart matrix: one row per distinct date, a count per catalog column.
/// Entries without a date are skipped; non-catalog function values are not
/// charted, and "Total Hours" stays zero even for a log entry carrying that
/// literal function string.
#[must_use]
pub fn chart_matrix(entries: &[(Option<String>, String)]) -> Vec<ChartRow> {
    let mut rows: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();

    for (date, function) in entries {
        let Some(date) = date.as_deref() else {
            continue;
        };
        if date.is_empty() {
            continue;
        }

        let row = rows
            .entry(date.to_string())
            .or_insert_with(empty_columns);

        if catalog::contains(function)
            && let Some(count) = row.get_mut(function.as_str())
        {
            *count += 1;
        }
    }

    rows.into_iter()
        .map(|(date, columns)| ChartRow { date, columns })
        .collect()
}

/// Classify a last-activity date against today. Within the window
/// (inclusive) is Active; anything else, including no date at all, is
/// Inactive.
#[must_use]
pub fn classify_activity(last: Option<NaiveDate>, today: NaiveDate) -> ActivityStatus {
    match last {
        Some(date) if (today - date).num_days() <= ACTIVE_WINDOW_DAYS => ActivityStatus::Active,
        _ => ActivityStatus::Inactive,
    }
}

/// Latest parseable log date per team member. Malformed and missing dates
/// are skipped.
#[must_use]
pub fn latest_dates(logs: &[work_logs::Model]) -> BTreeMap<String, NaiveDate> {
    let mut latest: BTreeMap<String, NaiveDate> = BTreeMap::new();

    for log in logs {
        let Some(date) = log.date.as_deref() else {
            continue;
        };
        let Ok(parsed) = NaiveDate::parse_from_str(date, DATE_FORMAT) else {
            continue;
        };

        latest
            .entry(log.team_member.clone())
            .and_modify(|current| {
                if parsed > *current {
                    *current = parsed;
                }
            })
            .or_insert(parsed);
    }

    latest
}

#[derive(Clone)]
pub struct ReportingService {
    store: Store,
}

impl ReportingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Global per-function summary.
    pub async fn global_summary(&self) -> BTreeMap<String, i64> {
        let logs = self.store.list_work_logs().await.unwrap_or_else(|e| {
            warn!("Log store unreadable, serving empty summary: {e:#}");
            Vec::new()
        });

        function_summary(logs.iter().map(|log| log.function.as_str()))
    }

    /// Per-function summary scoped to one member.
    pub async fn member_summary(&self, username: &str) -> BTreeMap<String, i64> {
        let logs = self
            .store
            .list_work_logs_for(username)
            .await
            .unwrap_or_else(|e| {
                warn!("Log store unreadable, serving empty summary: {e:#}");
                Vec::new()
            });

        function_summary(logs.iter().map(|log| log.function.as_str()))
    }

    /// Chart matrix over the full log store, keyed by date.
    pub async fn chart(&self) -> Vec<ChartRow> {
        let logs = self.store.list_work_logs().await.unwrap_or_else(|e| {
            warn!("Log store unreadable, serving empty chart: {e:#}");
            Vec::new()
        });

        let entries: Vec<(Option<String>, String)> = logs
            .into_iter()
            .map(|log| (log.date, log.function))
            .collect();

        chart_matrix(&entries)
    }

    /// Roster with derived activity status for every credential record.
    pub async fn roster(&self) -> Vec<EmployeeStatus> {
        let users = self.store.list_users().await.unwrap_or_else(|e| {
            warn!("Credential store unreadable, serving empty roster: {e:#}");
            Vec::new()
        });
        let logs = self.store.list_work_logs().await.unwrap_or_else(|e| {
            warn!("Log store unreadable, roster will show everyone inactive: {e:#}");
            Vec::new()
        });

        let latest = latest_dates(&logs);
        let today = chrono::Utc::now().date_naive();

        users
            .into_iter()
            .map(|user| {
                let last = latest.get(&user.username).copied();
                EmployeeStatus {
                    status: classify_activity(last, today),
                    last_activity: last.map(|date| date.format(DATE_FORMAT).to_string()),
                    team_member: user.username,
                    department: user.department,
                    shift: user.shift,
                    location: user.location,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn log(team_member: &str, log_date: Option<&str>) -> work_logs::Model {
        work_logs::Model {
            id: 0,
            team_member: team_member.to_string(),
            function: "Full Review".to_string(),
            date: log_date.map(ToString::to_string),
            file_number: None,
            status: None,
            tier1_escalation_reason: None,
            im_escalation_reason: None,
            department: None,
            comments: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_summary_zero_initialized() {
        let counts = function_summary(std::iter::empty::<&str>());
        assert_eq!(counts.len(), catalog::FUNCTIONS.len());
        assert!(counts.values().all(|&count| count == 0));
        assert_eq!(counts["Full Review"], 0);
    }

    #[test]
    fn test_summary_counts_catalog_and_surfaces_adhoc() {
        let counts = function_summary(["Full Review", "Full Review", "Side Quest", "ACR"]);
        assert_eq!(counts["Full Review"], 2);
        assert_eq!(counts["ACR"], 1);
        assert_eq!(counts["Side Quest"], 1);
        assert_eq!(counts.len(), catalog::FUNCTIONS.len() + 1);

        // Catalog counts still sum to the number of catalog-valued entries.
        let catalog_total: i64 = catalog::FUNCTIONS.iter().map(|f| counts[*f]).sum();
        assert_eq!(catalog_total, 3);
    }

    #[test]
    fn test_summary_skips_empty_values() {
        let counts = function_summary(["", "Full Review"]);
        assert_eq!(counts["Full Review"], 1);
        assert!(!counts.contains_key(""));
    }

    #[test]
    fn test_chart_groups_by_date() {
        let entries = vec![
            (Some("2024-03-11".to_string()), "Full Review".to_string()),
            (Some("2024-03-11".to_string()), "Full Review".to_string()),
            (Some("2024-03-12".to_string()), "ACR".to_string()),
        ];

        let rows = chart_matrix(&entries);
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.date, "2024-03-11");
        assert_eq!(first.columns["Full Review"], 2);
        assert_eq!(first.columns["ACR"], 0);
        // Every catalog column plus "Total Hours" is present.
        assert_eq!(first.columns.len(), catalog::FUNCTIONS.len() + 1);
        assert_eq!(first.columns[catalog::TOTAL_HOURS_COLUMN], 0);

        assert_eq!(rows[1].date, "2024-03-12");
        assert_eq!(rows[1].columns["ACR"], 1);
    }

    #[test]
    fn test_chart_skips_dateless_entries() {
        let entries = vec![
            (None, "Full Review".to_string()),
            (Some(String::new()), "Full Review".to_string()),
        ];
        assert!(chart_matrix(&entries).is_empty());
    }

    #[test]
    fn test_chart_ignores_unknown_functions_but_keeps_the_row() {
        let entries = vec![(Some("2024-03-11".to_string()), "Side Quest".to_string())];

        let rows = chart_matrix(&entries);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].columns.values().all(|&count| count == 0));
        assert!(!rows[0].columns.contains_key("Side Quest"));
    }

    #[test]
    fn test_chart_never_populates_total_hours() {
        let entries = vec![(
            Some("2024-03-11".to_string()),
            catalog::TOTAL_HOURS_COLUMN.to_string(),
        )];

        let rows = chart_matrix(&entries);
        assert_eq!(rows[0].columns[catalog::TOTAL_HOURS_COLUMN], 0);
    }

    #[test]
    fn test_activity_window_boundary() {
        let today = date("2024-03-11");

        assert_eq!(
            classify_activity(Some(date("2024-03-04")), today),
            ActivityStatus::Active,
            "exactly 7 days ago is still active"
        );
        assert_eq!(
            classify_activity(Some(date("2024-03-03")), today),
            ActivityStatus::Inactive
        );
        assert_eq!(
            classify_activity(Some(today), today),
            ActivityStatus::Active
        );
        assert_eq!(
            classify_activity(Some(date("2024-03-12")), today),
            ActivityStatus::Active,
            "future-dated logs count as activity"
        );
        assert_eq!(classify_activity(None, today), ActivityStatus::Inactive);
    }

    #[test]
    fn test_latest_dates_picks_max_and_skips_malformed() {
        let logs = vec![
            log("alice", Some("2024-01-02")),
            log("alice", Some("2024-01-10")),
            log("alice", Some("01/02/2024")),
            log("alice", None),
            log("bob", Some("not-a-date")),
        ];

        let latest = latest_dates(&logs);
        assert_eq!(latest["alice"], date("2024-01-10"));
        assert!(!latest.contains_key("bob"));
    }
}

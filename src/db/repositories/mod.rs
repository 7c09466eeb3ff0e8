pub mod alert;
pub mod user;
pub mod worklog;

/// Shared wall-clock timestamp format for stored rows.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub use super::alerts::Entity as Alerts;
pub use super::users::Entity as Users;
pub use super::work_logs::Entity as WorkLogs;

pub mod prelude;

pub mod alerts;
pub mod users;
pub mod work_logs;

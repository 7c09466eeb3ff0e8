pub mod reporting;

pub use reporting::ReportingService;

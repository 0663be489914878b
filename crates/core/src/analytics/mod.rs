pub mod analytics_model;
pub mod analytics_service;
pub mod analytics_traits;

#[cfg(test)]
mod analytics_service_tests;

pub use analytics_model::{
    AnalyticsSummary, SavingsLog, SavingsLogEntry, SavingsLogKind, SavingsLogSummary,
};
pub use analytics_service::AnalyticsService;
pub use analytics_traits::AnalyticsServiceTrait;

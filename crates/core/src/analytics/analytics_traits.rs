use super::analytics_model::{AnalyticsSummary, SavingsLog};
use crate::errors::Result;

/// Trait defining the contract for analytics operations.
///
/// Both reads are full recomputations over persisted state; nothing is
/// cached or incrementally maintained.
pub trait AnalyticsServiceTrait: Send + Sync {
    fn get_summary(&self, user_id: &str) -> Result<AnalyticsSummary>;
    fn get_savings_log(&self, user_id: &str) -> Result<SavingsLog>;
}

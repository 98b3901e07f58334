pub mod market_insights;
pub mod opportunity;
pub mod rate_ingestion;
pub mod rate_scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use market_insights::{cost_calculator, CostComparison, MarketMetrics};
pub use opportunity::{
    country_score, opportunity_score, rank, sort_by_opportunity, OpportunityTier, RankingQuery,
    SortMode,
};
pub use rate_ingestion::{
    compute_devaluation, month_label, IngestionSummary, PgRateStore, RateIngestionJob, RateStore,
};
pub use rate_scheduler::RateScheduler;

use crate::services::RateIngestionJob;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

/// Background task that runs the rate ingestion job on a fixed interval
pub struct RateScheduler {
    job: Arc<RateIngestionJob>,
    interval: Duration,
}

impl RateScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `job` - Ingestion job shared with the HTTP trigger
    /// * `interval` - Time between runs; the first run happens immediately
    pub fn new(job: Arc<RateIngestionJob>, interval: Duration) -> Self {
        Self { job, interval }
    }

    /// Start the scheduler loop; never returns
    pub async fn start(self) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Rate scheduler started, updating every {:?}", self.interval);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&self) {
        match self.job.run().await {
            Ok(summary) => info!(
                "Scheduled rate update stored {} countries ({} write failures)",
                summary.countries_updated,
                summary.failures.len()
            ),
            Err(e) => error!("Scheduled rate update failed: {}", e),
        }
    }
}

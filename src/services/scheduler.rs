use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use crate::ports::queue::{JobQueue, SyncJob};
use crate::shared::config::Config;

/// 同步调度器 - 定期提交仓库同步任务
pub struct SyncScheduler {
    config: Arc<Config>,
    queue: Arc<dyn JobQueue>,
}

impl SyncScheduler {
    pub fn new(config: Arc<Config>, queue: Arc<dyn JobQueue>) -> Self {
        Self { config, queue }
    }

    /// 启动调度器（长期运行，直到 shutdown 被取消）。启动时立即触发一次
    pub async fn start(&self, shutdown: CancellationToken) {
        if !self.config.sync.enabled {
            info!("Sync scheduler is disabled in configuration");
            return;
        }

        let interval_secs = self.config.sync.interval_secs.max(1);
        let mut interval = time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Sync scheduler started, interval: {}s", interval_secs);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Sync scheduler stopped");
                    return;
                }
                _ = interval.tick() => {}
            }

            info!("Scheduling repository sync for {}", self.config.github.username);
            if let Err(e) = self.queue.submit(SyncJob::SyncRepositories).await {
                error!("Failed to schedule repository sync: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::RecordingQueue;

    #[tokio::test]
    async fn submits_on_first_tick_and_stops_on_cancel() {
        let mut config = Config::default();
        config.github.username = "octocat".into();
        let queue = Arc::new(RecordingQueue::default());
        let scheduler = SyncScheduler::new(Arc::new(config), queue.clone());
        let shutdown = CancellationToken::new();

        let handle = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { scheduler.start(shutdown).await })
        };

        tokio::time::timeout(Duration::from_secs(5), async {
            while queue.jobs().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(queue.jobs(), vec![SyncJob::SyncRepositories]);
    }

    #[tokio::test]
    async fn disabled_scheduler_returns_immediately() {
        let mut config = Config::default();
        config.sync.enabled = false;
        let queue = Arc::new(RecordingQueue::default());
        let scheduler = SyncScheduler::new(Arc::new(config), queue.clone());

        tokio::time::timeout(Duration::from_secs(1), scheduler.start(CancellationToken::new()))
            .await
            .unwrap();
        assert!(queue.jobs().is_empty());
    }
}

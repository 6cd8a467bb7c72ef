use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;
use crate::infrastructure::queue::JobReceiver;
use crate::ports::queue::SyncJob;
use crate::services::commit_sync::CommitSyncJob;
use crate::services::repository_sync::RepositorySyncJob;
use crate::shared::result::Result;

/// 把队列里的任务分派给对应的同步实现
#[derive(Clone)]
pub struct JobRunner {
    repository_job: Arc<RepositorySyncJob>,
    commit_job: Arc<CommitSyncJob>,
}

impl JobRunner {
    pub fn new(repository_job: Arc<RepositorySyncJob>, commit_job: Arc<CommitSyncJob>) -> Self {
        Self {
            repository_job,
            commit_job,
        }
    }

    pub async fn run(&self, job: SyncJob) -> Result<()> {
        match job {
            SyncJob::SyncRepositories => {
                let report = self.repository_job.run().await?;
                debug!("Repository sync report: {:?}", report);
            }
            SyncJob::SyncCommits {
                repository_id,
                commits_url,
            } => {
                let report = self.commit_job.run(repository_id, &commits_url).await?;
                debug!("Commit sync report: {:?}", report);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct WorkerStats {
    pub succeeded: AtomicUsize,
    pub failed: AtomicUsize,
}

/// 工作者池：N 个 worker 共享同一个接收端
pub struct WorkerPool {
    receiver: Arc<JobReceiver>,
    runner: JobRunner,
    workers: usize,
    stats: Arc<WorkerStats>,
}

impl WorkerPool {
    pub fn new(receiver: JobReceiver, runner: JobRunner, workers: usize) -> Self {
        Self {
            receiver: Arc::new(receiver),
            runner,
            workers: workers.max(1),
            stats: Arc::new(WorkerStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        self.stats.clone()
    }

    /// 启动所有 worker，shutdown 被取消后各 worker 在当前任务结束时退出
    pub fn spawn(&self, shutdown: CancellationToken) -> Vec<JoinHandle<()>> {
        info!("Starting {} sync worker(s)", self.workers);

        (0..self.workers)
            .map(|worker_id| {
                let receiver = self.receiver.clone();
                let runner = self.runner.clone();
                let stats = self.stats.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    worker_loop(worker_id, receiver, runner, stats, shutdown).await;
                })
            })
            .collect()
    }
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<JobReceiver>,
    runner: JobRunner,
    stats: Arc<WorkerStats>,
    shutdown: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            _ = shutdown.cancelled() => break,
            job = receiver.recv() => job,
        };
        let Some(job) = job else {
            break;
        };

        let span = info_span!("job", worker = worker_id, kind = job.name(), run_id = %Uuid::new_v4());
        let runner = runner.clone();
        // 单独的 task 执行，任务 panic 不会带走 worker
        let handle = tokio::spawn(async move { runner.run(job).await }.instrument(span.clone()));

        match handle.await {
            Ok(Ok(())) => {
                stats.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(e)) => {
                span.in_scope(|| error!("Sync job failed: {}", e));
                stats.failed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                span.in_scope(|| error!("Sync job panicked: {}", e));
                stats.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        receiver.complete();
    }

    debug!("Worker {} stopped", worker_id);
}

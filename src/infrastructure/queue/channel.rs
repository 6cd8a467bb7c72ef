use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::debug;
use crate::ports::queue::{JobQueue, SyncJob};
use crate::shared::error::FeedError;
use crate::shared::result::Result;

/// 进程内任务队列的发送端。无界通道，submit 从不等待容量
#[derive(Clone)]
pub struct ChannelQueue {
    sender: mpsc::UnboundedSender<SyncJob>,
    in_flight: Arc<watch::Sender<usize>>,
}

/// 进程内任务队列的接收端，由 WorkerPool 的各个 worker 共享
pub struct JobReceiver {
    receiver: Mutex<mpsc::UnboundedReceiver<SyncJob>>,
    in_flight: Arc<watch::Sender<usize>>,
}

/// 创建一对发送端/接收端
pub fn channel() -> (ChannelQueue, JobReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let (in_flight, _) = watch::channel(0usize);
    let in_flight = Arc::new(in_flight);

    (
        ChannelQueue {
            sender,
            in_flight: in_flight.clone(),
        },
        JobReceiver {
            receiver: Mutex::new(receiver),
            in_flight,
        },
    )
}

impl ChannelQueue {
    /// 已入队但尚未执行完的任务数
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// 等待所有已提交的任务（包括执行中派生的任务）完成
    pub async fn wait_idle(&self) {
        let mut rx = self.in_flight.subscribe();
        // sender 由 self 持有，wait_for 不会因通道关闭而失败
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

#[async_trait]
impl JobQueue for ChannelQueue {
    async fn submit(&self, job: SyncJob) -> Result<()> {
        debug!("Submitting job {:?}", job);
        self.in_flight.send_modify(|n| *n += 1);

        self.sender.send(job).map_err(|e| {
            self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
            FeedError::Queue(format!("job queue closed, dropped {}", e.0.name()))
        })
    }
}

impl JobReceiver {
    /// 取下一个任务，队列关闭时返回 None
    pub async fn recv(&self) -> Option<SyncJob> {
        self.receiver.lock().await.recv().await
    }

    /// 标记一个任务执行结束
    pub fn complete(&self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

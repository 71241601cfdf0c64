//! 队列分发器（QueuedDispatcher）
//!
//! `dispatch` 只做同步校验并把分发任务放入无界队列，随即返回；
//! 后台任务从队列取出分发并以 `config.concurrency` 为上限并发执行：
//! - 并发为 1 时按提交顺序执行处理器与通知；
//! - 关闭后队列中与执行中的分发都会以 `Abandoned` 失败通知回调。
//!
use crate::config::DispatcherConfig;
use crate::dispatcher::{CommandDispatcher, dispatch_span, drive, validate};
use crate::registry::HandlerRegistry;
use crate::resolver::OutcomeResolver;
use async_trait::async_trait;
use cmdbus_core::{Callback, Command, CommandContext, DispatchResult};
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

type Job = BoxFuture<'static, ()>;

/// 在后台任务中执行处理器的分发器
#[derive(Clone)]
pub struct QueuedDispatcher {
    registry: Arc<HandlerRegistry>,
    config: DispatcherConfig,
    tx: mpsc::UnboundedSender<Job>,
}

impl QueuedDispatcher {
    /// 启动后台执行任务，返回分发器与运行句柄
    ///
    /// 句柄被丢弃时后台任务随之关闭，需在分发器使用期间持有。
    pub fn start(
        registry: Arc<HandlerRegistry>,
        config: DispatcherConfig,
    ) -> (Self, DispatcherHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let task = tokio::spawn(Self::worker_loop(rx, config.concurrency, token.clone()));

        let dispatcher = Self {
            registry,
            config,
            tx,
        };
        let handle = DispatcherHandle {
            token,
            task: Some(task),
        };

        (dispatcher, handle)
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    async fn worker_loop(
        rx: mpsc::UnboundedReceiver<Job>,
        concurrency: usize,
        token: CancellationToken,
    ) {
        let jobs = UnboundedReceiverStream::new(rx);

        // 取消时丢弃 for_each_concurrent：执行中的分发与队列中剩余的分发随之被丢弃，
        // 由 OutcomeResolver 的 Drop 负责以 Abandoned 通知
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("queued dispatcher shutting down");
            }
            _ = jobs.for_each_concurrent(Some(concurrency.max(1)), |job| job) => {}
        }
    }
}

#[async_trait]
impl CommandDispatcher for QueuedDispatcher {
    async fn dispatch<C: Command>(
        &self,
        command: C,
        context: CommandContext<C>,
        callback: Callback<C, C::Output>,
    ) -> DispatchResult<()> {
        validate(&command, &context)?;

        let span = dispatch_span(&context);
        let resolver = OutcomeResolver::new(context, callback);
        let registry = self.registry.clone();
        let retry = self.config.retry;

        let job: Job = Box::pin(
            async move { drive(&registry, &retry, command, resolver).await }.instrument(span),
        );

        // 后台任务已关闭时 job 随发送失败一并丢弃，回调收到 Abandoned
        if self.tx.send(job).is_err() {
            tracing::debug!(command = C::NAME, "queued dispatcher stopped, dispatch abandoned");
        }

        Ok(())
    }
}

/// 后台任务运行句柄：用于关闭与等待任务结束
pub struct DispatcherHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DispatcherHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DispatcherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

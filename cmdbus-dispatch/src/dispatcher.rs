use crate::config::RetryPolicy;
use crate::registry::HandlerRegistry;
use crate::resolver::OutcomeResolver;
use crate::state::DispatchState;
use async_trait::async_trait;
use cmdbus_core::{
    Callback, Command, CommandContext, DispatchError, DispatchResult, FutureCallback, Outcome,
};

/// 命令分发器（Command Dispatcher）
///
/// - 负责根据命令的具体类型路由到唯一的处理器，并把终态结果恰好一次地交给回调；
/// - `dispatch` 只会因命令/上下文校验失败而返回 `Err`，其余失败一律通过回调交付；
/// - 框架可提供不同实现（调用方任务内执行、后台队列执行等）；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// 分发命令，结果通过 `callback` 通知
    async fn dispatch<C: Command>(
        &self,
        command: C,
        context: CommandContext<C>,
        callback: Callback<C, C::Output>,
    ) -> DispatchResult<()>;

    /// 发出即忘：使用 `NoOp` 回调，结果（包括失败）被丢弃
    async fn send<C: Command>(&self, command: C) -> DispatchResult<()> {
        self.dispatch(command, CommandContext::default(), Callback::no_op())
            .await
    }

    /// 分发并等待结果
    async fn send_and_wait<C: Command>(
        &self,
        command: C,
        context: CommandContext<C>,
    ) -> DispatchResult<C::Output> {
        let (callback, receiver) = FutureCallback::pair();
        self.dispatch(command, context, callback).await?;
        receiver.wait().await
    }
}

/// 分发前的同步校验
pub(crate) fn validate<C: Command>(command: &C, context: &CommandContext<C>) -> DispatchResult<()> {
    command.validate()?;
    context.validate()
}

pub(crate) fn dispatch_span<C: Command>(context: &CommandContext<C>) -> tracing::Span {
    tracing::debug_span!(
        "dispatch",
        command = C::NAME,
        correlation_id = context.correlation_id(),
    )
}

/// 单次分发的完整流程：取消检查 → 查找处理器 → 执行（含透明重试）→ 通知
pub(crate) async fn drive<C: Command>(
    registry: &HandlerRegistry,
    retry: &RetryPolicy,
    command: C,
    resolver: OutcomeResolver<C>,
) {
    if resolver.context().is_cancelled() {
        resolver.complete(Outcome::Failure(DispatchError::Cancelled { command: C::NAME }));
        return;
    }

    let handler = match registry.lookup::<C>() {
        Ok(handler) => {
            resolver.advance(DispatchState::HandlerFound);
            handler
        }
        Err(err) => {
            resolver.advance(DispatchState::HandlerNotFound);
            resolver.complete(Outcome::Failure(err));
            return;
        }
    };

    let mut retries = 0;
    loop {
        let outcome = resolver.invoke(handler.as_ref(), &command).await;

        let transient = matches!(&outcome, Outcome::Failure(err) if err.is_transient());
        if !transient || !retry.allows(retries) {
            resolver.complete(outcome);
            return;
        }

        retries += 1;
        if let Outcome::Failure(err) = &outcome {
            tracing::warn!(
                command = C::NAME,
                correlation_id = resolver.context().correlation_id(),
                retry = retries,
                error = %err,
                "transient dispatch failure, retrying"
            );
        }

        tokio::time::sleep(retry.interval).await;
        resolver.rearm();
    }
}

use super::{Callback, CommandCallback};
use crate::context::CommandContext;
use crate::error::DispatchError;

/// 记录结果后再转交给内层回调的装饰器
///
/// 成功记为 `info`，失败记为 `warn`，字段包含命令名称与关联 ID。
pub struct LoggingCallback<C, R> {
    inner: Callback<C, R>,
}

impl<C, R> LoggingCallback<C, R> {
    pub fn new(inner: Callback<C, R>) -> Self {
        Self { inner }
    }

    /// 只记录日志、不关心结果时使用
    pub fn log_only() -> Self {
        Self::new(Callback::NoOp)
    }
}

impl<C, R> LoggingCallback<C, R>
where
    C: 'static,
    R: 'static,
{
    pub fn wrap(inner: Callback<C, R>) -> Callback<C, R> {
        Callback::new(Self::new(inner))
    }
}

impl<C, R> CommandCallback<C, R> for LoggingCallback<C, R> {
    fn on_success(&self, result: R, context: &CommandContext<C>) {
        tracing::info!(
            command = context.command_name(),
            correlation_id = context.correlation_id(),
            causation_id = context.causation_id(),
            "command succeeded"
        );
        self.inner.on_success(result, context);
    }

    fn on_failure(&self, cause: DispatchError, context: &CommandContext<C>) {
        tracing::warn!(
            command = context.command_name(),
            correlation_id = context.correlation_id(),
            causation_id = context.causation_id(),
            error = %cause,
            "command failed"
        );
        self.inner.on_failure(cause, context);
    }
}

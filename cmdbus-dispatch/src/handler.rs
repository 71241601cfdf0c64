use async_trait::async_trait;
use cmdbus_core::{Command, CommandContext};

/// 命令处理器
///
/// 返回的错误会被原样保留在 `DispatchError::HandlerExecution` 中交给回调；
/// 若处理器本身返回 `DispatchError`（例如远程调用的传输失败），则不再包装。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &CommandContext<C>, cmd: &C) -> anyhow::Result<C::Output>;
}

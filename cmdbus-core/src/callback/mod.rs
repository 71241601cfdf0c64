//! 结果回调（Callback）
//!
//! 一次分发的终态结果通过回调交还给调用方：
//! - `CommandCallback`：回调契约，`on_success` / `on_failure` 互斥且恰好调用一次；
//! - `Callback`：分发时传入的回调句柄，“不需要结果”以显式的 `NoOp` 变体表达；
//! - 常用实现：`NoOpCallback`、`FutureCallback`（结果转为可等待的 future）、
//!   `LoggingCallback`（记录结果后转交给内层回调）。
//!
//! 同一回调实例可能被多个并发分发同时调用，有状态的实现必须自行保证线程安全。
//!
use crate::context::CommandContext;
use crate::error::DispatchError;
use crate::outcome::Outcome;
use std::sync::Arc;

#[cfg(feature = "future")]
mod future;
mod logging;
mod noop;

#[cfg(feature = "future")]
pub use future::{FutureCallback, OutcomeReceiver};
pub use logging::LoggingCallback;
pub use noop::NoOpCallback;

/// 回调契约
///
/// - `on_success`：仅当处理器无错误完成时调用一次；
/// - `on_failure`：处理器出错或分发机制本身失败（无处理器、基础设施故障、取消）时调用一次；
/// - 两者对同一次分发互斥，分发器内部的重试对回调不可见。
///
/// 实现中不应 panic：分发器会捕获并记录为 `CallbackContractViolation`，但不会重试命令，
/// 也不会因此再调用另一个方法。
pub trait CommandCallback<C, R>: Send + Sync {
    fn on_success(&self, result: R, context: &CommandContext<C>);

    fn on_failure(&self, cause: DispatchError, context: &CommandContext<C>);
}

/// 分发时绑定的回调句柄
pub enum Callback<C, R> {
    /// 不关心结果：直接丢弃，包括失败
    NoOp,
    Shared(Arc<dyn CommandCallback<C, R>>),
}

impl<C, R> Callback<C, R> {
    pub const fn no_op() -> Self {
        Self::NoOp
    }

    pub fn new<K>(callback: K) -> Self
    where
        K: CommandCallback<C, R> + 'static,
    {
        Self::Shared(Arc::new(callback))
    }

    pub fn shared(callback: Arc<dyn CommandCallback<C, R>>) -> Self {
        Self::Shared(callback)
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// 将结果交给回调：`Success` 对应 `on_success`，`Failure` 对应 `on_failure`
    pub fn notify(&self, outcome: Outcome<R>, context: &CommandContext<C>) {
        match outcome {
            Outcome::Success(result) => self.on_success(result, context),
            Outcome::Failure(cause) => self.on_failure(cause, context),
        }
    }
}

impl<C, R> CommandCallback<C, R> for Callback<C, R> {
    fn on_success(&self, result: R, context: &CommandContext<C>) {
        if let Self::Shared(callback) = self {
            callback.on_success(result, context);
        }
    }

    fn on_failure(&self, cause: DispatchError, context: &CommandContext<C>) {
        if let Self::Shared(callback) = self {
            callback.on_failure(cause, context);
        }
    }
}

impl<C, R> Clone for Callback<C, R> {
    fn clone(&self) -> Self {
        match self {
            Self::NoOp => Self::NoOp,
            Self::Shared(callback) => Self::Shared(callback.clone()),
        }
    }
}

impl<C, R> Default for Callback<C, R> {
    fn default() -> Self {
        Self::NoOp
    }
}

impl<C, R> From<NoOpCallback> for Callback<C, R> {
    fn from(_: NoOpCallback) -> Self {
        Self::NoOp
    }
}

impl<C, R> From<Arc<dyn CommandCallback<C, R>>> for Callback<C, R> {
    fn from(callback: Arc<dyn CommandCallback<C, R>>) -> Self {
        Self::Shared(callback)
    }
}

impl<C, R> std::fmt::Debug for Callback<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOp => f.write_str("Callback::NoOp"),
            Self::Shared(_) => f.write_str("Callback::Shared(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;

    impl Command for Ping {
        const NAME: &'static str = "Ping";
        type Output = u32;
    }

    #[derive(Default)]
    struct Spy {
        successes: AtomicUsize,
        failures: AtomicUsize,
    }

    impl CommandCallback<Ping, u32> for Spy {
        fn on_success(&self, result: u32, _context: &CommandContext<Ping>) {
            assert_eq!(result, 7);
            self.successes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failure(&self, _cause: DispatchError, _context: &CommandContext<Ping>) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn notify_routes_each_outcome_to_one_method() {
        let spy = Arc::new(Spy::default());
        let callback = Callback::shared(spy.clone());
        let ctx = CommandContext::<Ping>::default();

        callback.notify(Outcome::Success(7), &ctx);
        callback.notify(
            Outcome::Failure(DispatchError::NoHandlerRegistered { command: Ping::NAME }),
            &ctx,
        );

        assert_eq!(spy.successes.load(Ordering::SeqCst), 1);
        assert_eq!(spy.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_op_variant_discards_everything() {
        let callback = Callback::<Ping, u32>::no_op();
        let ctx = CommandContext::<Ping>::default();

        callback.notify(Outcome::Success(7), &ctx);
        callback.notify(Outcome::Failure(DispatchError::infrastructure("down")), &ctx);

        assert!(callback.is_no_op());
        assert!(Callback::<Ping, u32>::from(NoOpCallback).is_no_op());
    }
}

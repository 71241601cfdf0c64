//! 结果解析器（OutcomeResolver）
//!
//! 单次分发的工作单元边界：持有上下文、回调与状态机，负责
//! - 每次尝试至多执行一次处理器，并把返回值、错误与 panic 统一归类为 `Outcome`；
//! - 只接受第一个终态结果，之后的完成信号一律丢弃；
//! - 在处理器执行完全结束后才通知回调，且只通知一次；
//! - 被丢弃而未通知时，以 `Abandoned` 失败补发通知，结果不会被静默吞掉。
//!
use crate::handler::CommandHandler;
use crate::state::DispatchState;
use cmdbus_core::{Callback, Command, CommandContext, DispatchError, Outcome};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

pub struct OutcomeResolver<C: Command> {
    context: CommandContext<C>,
    callback: Callback<C, C::Output>,
    state: AtomicU8,
    // 最近一次尝试以瞬时失败结束，允许 rearm 一次
    retryable: AtomicBool,
}

impl<C: Command> OutcomeResolver<C> {
    pub fn new(context: CommandContext<C>, callback: Callback<C, C::Output>) -> Self {
        Self {
            context,
            callback,
            state: AtomicU8::new(DispatchState::Submitted as u8),
            retryable: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &CommandContext<C> {
        &self.context
    }

    pub fn state(&self) -> DispatchState {
        DispatchState::from_repr(self.state.load(Ordering::Acquire))
    }

    /// 推进状态；非法迁移返回 `false` 且状态不变
    ///
    /// `Executing -> HandlerFound` 只在上一次尝试以瞬时失败结束时被接受，等同于 [`Self::rearm`]。
    pub fn advance(&self, next: DispatchState) -> bool {
        if next == DispatchState::HandlerFound && self.state() == DispatchState::Executing {
            return self.rearm();
        }
        self.transition(next)
    }

    fn transition(&self, next: DispatchState) -> bool {
        let mut current = self.state.load(Ordering::Acquire);

        loop {
            let from = DispatchState::from_repr(current);
            if !from.can_transition_to(next) {
                tracing::debug!(
                    command = C::NAME,
                    correlation_id = self.context.correlation_id(),
                    from = ?from,
                    to = ?next,
                    "rejected dispatch state transition"
                );
                return false;
            }

            match self.state.compare_exchange(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::trace!(command = C::NAME, from = ?from, to = ?next, "dispatch state");
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// 执行一次处理器，返回归类后的结果（不通知回调）
    ///
    /// 仅在 `HandlerFound` 状态下执行；同一次尝试的重复调用直接得到失败结果，处理器不会再次运行。
    pub async fn invoke(&self, handler: &dyn CommandHandler<C>, command: &C) -> Outcome<C::Output> {
        if !self.advance(DispatchState::Executing) {
            return Outcome::Failure(DispatchError::infrastructure(format!(
                "handler for {} is not armed for execution (state={:?})",
                C::NAME,
                self.state()
            )));
        }

        let attempt = AssertUnwindSafe(handler.handle(&self.context, command)).catch_unwind();

        let outcome = match attempt.await {
            Ok(Ok(result)) => Outcome::Success(result),
            Ok(Err(err)) => Outcome::Failure(DispatchError::from_handler(err)),
            Err(payload) => Outcome::Failure(DispatchError::HandlerPanicked {
                command: C::NAME,
                message: panic_message(payload.as_ref()),
            }),
        };

        let transient = matches!(&outcome, Outcome::Failure(err) if err.is_transient());
        self.retryable.store(transient, Ordering::Release);
        outcome
    }

    /// 瞬时失败后重新就绪，准备下一次尝试
    ///
    /// 上一次尝试成功或以非瞬时错误结束时返回 `false`，处理器不会再次运行。
    pub fn rearm(&self) -> bool {
        if !self.retryable.swap(false, Ordering::AcqRel) {
            tracing::debug!(
                command = C::NAME,
                correlation_id = self.context.correlation_id(),
                state = ?self.state(),
                "rejected rearm: last attempt was not a transient failure"
            );
            return false;
        }
        self.transition(DispatchState::HandlerFound)
    }

    /// 交付终态结果：仅第一次调用会通知回调并返回 `true`
    ///
    /// 回调 panic 视为契约违规：记录日志，状态仍推进到 `Notified`，不会重试、也不会再通知。
    pub fn complete(&self, outcome: Outcome<C::Output>) -> bool {
        let terminal = if outcome.is_success() {
            DispatchState::Succeeded
        } else {
            DispatchState::Failed
        };

        if !self.advance(terminal) {
            tracing::debug!(
                command = C::NAME,
                correlation_id = self.context.correlation_id(),
                state = ?self.state(),
                "discarding duplicate outcome"
            );
            return false;
        }

        let notified = catch_unwind(AssertUnwindSafe(|| {
            self.callback.notify(outcome, &self.context)
        }));
        self.advance(DispatchState::Notified);

        if let Err(payload) = notified {
            let violation = DispatchError::CallbackContractViolation {
                command: C::NAME,
                message: panic_message(payload.as_ref()),
            };
            tracing::error!(
                command = C::NAME,
                correlation_id = self.context.correlation_id(),
                error = %violation,
                "callback panicked while receiving outcome"
            );
        }

        true
    }
}

impl<C: Command> Drop for OutcomeResolver<C> {
    fn drop(&mut self) {
        if !self.state().is_terminal() {
            self.complete(Outcome::Failure(DispatchError::Abandoned { command: C::NAME }));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

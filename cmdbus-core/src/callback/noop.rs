use super::CommandCallback;
use crate::context::CommandContext;
use crate::error::DispatchError;

/// 什么都不做的回调
///
/// 用于“发出即忘”的分发：两个方法都立即返回、没有副作用，因此对任意命令/结果类型都成立，
/// 也可以被任意多个并发分发共享。调用方因此会静默丢弃所有结果（包括失败）。
///
/// 零大小类型，通过 [`NoOpCallback::instance`] 取得的引用始终指向同一个静态实例。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoOpCallback;

static INSTANCE: NoOpCallback = NoOpCallback;

impl NoOpCallback {
    /// 以任意命令/结果类型取得同一个共享实例，无需分配
    pub fn instance<C, R>() -> &'static dyn CommandCallback<C, R>
    where
        C: 'static,
        R: 'static,
    {
        &INSTANCE
    }
}

impl<C, R> CommandCallback<C, R> for NoOpCallback {
    fn on_success(&self, _result: R, _context: &CommandContext<C>) {}

    fn on_failure(&self, _cause: DispatchError, _context: &CommandContext<C>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    struct OpenAccount;
    impl Command for OpenAccount {
        const NAME: &'static str = "OpenAccount";
        type Output = String;
    }

    struct CloseAccount;
    impl Command for CloseAccount {
        const NAME: &'static str = "CloseAccount";
        type Output = ();
    }

    #[test]
    fn shared_instance_is_identical_across_command_types() {
        let open = NoOpCallback::instance::<OpenAccount, String>();
        let close = NoOpCallback::instance::<CloseAccount, ()>();

        assert!(std::ptr::addr_eq(open, close));
        assert!(std::ptr::addr_eq(open, &INSTANCE));
    }

    #[test]
    fn notifications_are_side_effect_free() {
        let cb = NoOpCallback::instance::<OpenAccount, String>();
        let ctx = CommandContext::<OpenAccount>::default();

        cb.on_success(String::new(), &ctx);
        cb.on_failure(DispatchError::Cancelled { command: "OpenAccount" }, &ctx);
        cb.on_failure(
            DispatchError::HandlerExecution(anyhow::anyhow!("boom")),
            &ctx,
        );

        let unit = NoOpCallback::instance::<CloseAccount, ()>();
        unit.on_success((), &CommandContext::<CloseAccount>::default());
    }
}

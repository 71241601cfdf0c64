use super::{Callback, CommandCallback};
use crate::context::CommandContext;
use crate::error::{DispatchError, DispatchResult};
use crate::outcome::Outcome;
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

/// 将结果转为可等待 future 的回调
///
/// 内部持有一次性的 `oneshot::Sender`，第一次通知完成 future，后续通知被丢弃。
pub struct FutureCallback<C, R> {
    tx: Mutex<Option<oneshot::Sender<Outcome<R>>>>,
    _command: PhantomData<fn() -> C>,
}

impl<C, R> FutureCallback<C, R>
where
    R: Send + 'static,
{
    pub fn new() -> (Self, OutcomeReceiver<R>) {
        let (tx, rx) = oneshot::channel();
        let callback = Self {
            tx: Mutex::new(Some(tx)),
            _command: PhantomData,
        };

        (callback, OutcomeReceiver { rx })
    }

    /// 直接得到可传给 `dispatch` 的回调句柄与对应的接收端
    pub fn pair() -> (Callback<C, R>, OutcomeReceiver<R>)
    where
        C: 'static,
    {
        let (callback, receiver) = Self::new();
        (Callback::new(callback), receiver)
    }

    fn fulfil(&self, outcome: Outcome<R>) {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match tx {
            // 接收端已被丢弃时调用方不再关心结果
            Some(tx) => {
                let _ = tx.send(outcome);
            }
            None => tracing::debug!("future callback already completed, outcome dropped"),
        }
    }
}

impl<C, R> CommandCallback<C, R> for FutureCallback<C, R>
where
    R: Send + 'static,
{
    fn on_success(&self, result: R, _context: &CommandContext<C>) {
        self.fulfil(Outcome::Success(result));
    }

    fn on_failure(&self, cause: DispatchError, _context: &CommandContext<C>) {
        self.fulfil(Outcome::Failure(cause));
    }
}

/// `FutureCallback` 的接收端
#[derive(Debug)]
pub struct OutcomeReceiver<R> {
    rx: oneshot::Receiver<Outcome<R>>,
}

impl<R> OutcomeReceiver<R> {
    /// 等待分发结果
    pub async fn wait(self) -> DispatchResult<R> {
        match self.rx.await {
            Ok(outcome) => outcome.into_result(),
            Err(_) => Err(DispatchError::infrastructure(
                "callback dropped without delivering an outcome",
            )),
        }
    }

    /// 在超时时间内等待结果；超时视为瞬时基础设施错误
    pub async fn wait_timeout(self, timeout: Duration) -> DispatchResult<R> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::transient(format!(
                "no outcome within {timeout:?}"
            ))),
        }
    }

    /// 非阻塞地查看结果是否已到达
    pub fn try_take(&mut self) -> Option<Outcome<R>> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    struct Quote;
    impl Command for Quote {
        const NAME: &'static str = "Quote";
        type Output = u64;
    }

    #[tokio::test]
    async fn first_notification_wins() {
        let (callback, receiver) = FutureCallback::<Quote, u64>::new();
        let ctx = CommandContext::<Quote>::default();

        callback.on_success(42, &ctx);
        callback.on_failure(DispatchError::infrastructure("late"), &ctx);

        assert_eq!(receiver.wait().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn failure_is_returned_as_error() {
        let (callback, receiver) = FutureCallback::<Quote, u64>::pair();
        let ctx = CommandContext::<Quote>::default();

        callback.on_failure(DispatchError::NoHandlerRegistered { command: Quote::NAME }, &ctx);

        assert!(matches!(
            receiver.wait().await,
            Err(DispatchError::NoHandlerRegistered { command: "Quote" })
        ));
    }

    #[tokio::test]
    async fn dropped_callback_resolves_receiver() {
        let (callback, receiver) = FutureCallback::<Quote, u64>::new();
        drop(callback);

        assert!(matches!(
            receiver.wait().await,
            Err(DispatchError::Infrastructure { transient: false, .. })
        ));
    }

    #[tokio::test]
    async fn wait_timeout_reports_transient_error() {
        let (_callback, receiver) = FutureCallback::<Quote, u64>::new();

        let err = receiver
            .wait_timeout(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn try_take_sees_completed_outcome() {
        let (callback, mut receiver) = FutureCallback::<Quote, u64>::new();
        assert!(receiver.try_take().is_none());

        callback.on_success(1, &CommandContext::<Quote>::default());
        assert!(matches!(receiver.try_take(), Some(Outcome::Success(1))));
    }
}

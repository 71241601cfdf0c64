use crate::config::DispatcherConfig;
use crate::dispatcher::{CommandDispatcher, dispatch_span, drive, validate};
use crate::registry::HandlerRegistry;
use crate::resolver::OutcomeResolver;
use async_trait::async_trait;
use bon::Builder;
use cmdbus_core::{Callback, Command, CommandContext, DispatchResult};
use std::sync::Arc;
use tracing::Instrument;

/// 在调用方任务内执行处理器的分发器
///
/// `dispatch` 返回时处理器已执行完毕、回调已被通知。
/// 并发度由调用方决定，`config` 中只有 `retry` 生效，`concurrency` 不被读取。
#[derive(Builder)]
pub struct InlineDispatcher {
    registry: Arc<HandlerRegistry>,
    #[builder(default)]
    config: DispatcherConfig,
}

impl InlineDispatcher {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            config: DispatcherConfig::default(),
        }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }
}

#[async_trait]
impl CommandDispatcher for InlineDispatcher {
    async fn dispatch<C: Command>(
        &self,
        command: C,
        context: CommandContext<C>,
        callback: Callback<C, C::Output>,
    ) -> DispatchResult<()> {
        validate(&command, &context)?;

        let span = dispatch_span(&context);
        let resolver = OutcomeResolver::new(context, callback);
        drive(&self.registry, &self.config.retry, command, resolver)
            .instrument(span)
            .await;

        Ok(())
    }
}

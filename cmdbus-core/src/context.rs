use crate::command::Command;
use crate::error::{DispatchError, DispatchResult};
use bon::bon;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// 命令上下文（Command Context）
///
/// 随一次分发贯穿整个流程的不可变信封，承载：
/// - 关联追踪 `correlation_id`（缺省时生成 UUID v4）与因果链 `causation_id`；
/// - 任意元数据（字符串键、不透明值）；
/// - 命令名称与创建时间；
/// - 可选的取消令牌：在找到处理器之前被取消的分发直接以 `Cancelled` 失败。
///
/// 构造完成后只读；`Clone` 仅复制内部 `Arc`。
///
/// 典型用法：
/// ```rust
/// use cmdbus_core::{Command, CommandContext};
///
/// struct Ping;
/// impl Command for Ping {
///     const NAME: &'static str = "Ping";
///     type Output = ();
/// }
///
/// let ctx = CommandContext::<Ping>::builder()
///     .correlation_id("cor-123")
///     .causation_id("cau-abc")
///     .metadata([("tenant".to_string(), serde_json::json!("acme"))].into())
///     .build();
///
/// assert_eq!(ctx.correlation_id(), "cor-123");
/// assert_eq!(ctx.command_name(), "Ping");
/// ```
pub struct CommandContext<C> {
    inner: Arc<ContextInner>,
    _command: PhantomData<fn() -> C>,
}

struct ContextInner {
    correlation_id: String,
    causation_id: Option<String>,
    command_name: &'static str,
    metadata: HashMap<String, Value>,
    created_at: DateTime<Utc>,
    cancellation: Option<CancellationToken>,
}

#[bon]
impl<C: Command> CommandContext<C> {
    #[builder]
    pub fn new(
        #[builder(into)] correlation_id: Option<String>,
        #[builder(into)] causation_id: Option<String>,
        #[builder(default)] metadata: HashMap<String, Value>,
        cancellation: Option<CancellationToken>,
    ) -> Self {
        let inner = ContextInner {
            correlation_id: correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            causation_id,
            command_name: C::NAME,
            metadata,
            created_at: Utc::now(),
            cancellation,
        };

        Self {
            inner: Arc::new(inner),
            _command: PhantomData,
        }
    }
}

impl<C> CommandContext<C> {
    pub fn correlation_id(&self) -> &str {
        &self.inner.correlation_id
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.inner.causation_id.as_deref()
    }

    pub fn command_name(&self) -> &'static str {
        self.inner.command_name
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.inner.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.inner.metadata.get(key)
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.inner.created_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// 分发前的同步校验：关联 ID 与元数据键不能为空
    pub fn validate(&self) -> DispatchResult<()> {
        if self.inner.correlation_id.trim().is_empty() {
            return Err(DispatchError::validation(format!(
                "empty correlation id for command {}",
                self.inner.command_name
            )));
        }

        if self.inner.metadata.keys().any(|k| k.is_empty()) {
            return Err(DispatchError::validation(format!(
                "empty metadata key for command {}",
                self.inner.command_name
            )));
        }

        Ok(())
    }
}

impl<C: Command> Default for CommandContext<C> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<C> Clone for CommandContext<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _command: PhantomData,
        }
    }
}

impl<C> fmt::Debug for CommandContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.inner.command_name)
            .field("correlation_id", &self.inner.correlation_id)
            .field("causation_id", &self.inner.causation_id)
            .field("metadata", &self.inner.metadata)
            .field("created_at", &self.inner.created_at)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

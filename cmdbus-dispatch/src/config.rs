use std::time::Duration;

/// 瞬时失败的重试策略
///
/// 只对 `DispatchError::is_transient()` 为真的失败生效；重试对回调不可见，
/// 回调只会收到最后一次尝试的结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次执行之外的最大重试次数
    pub max_retries: u32,
    /// 两次尝试之间的等待间隔
    pub interval: Duration,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            interval: Duration::ZERO,
        }
    }

    pub const fn fixed(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// 已重试 `retries` 次后是否还允许再试
    pub fn allows(&self, retries: u32) -> bool {
        retries < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// 分发器配置
#[derive(Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// 后台执行的最大并发分发数（仅 `QueuedDispatcher`）；为 1 时按提交顺序串行执行与通知
    pub concurrency: usize,
    /// 瞬时失败的重试策略
    pub retry: RetryPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            retry: RetryPolicy::none(),
        }
    }
}

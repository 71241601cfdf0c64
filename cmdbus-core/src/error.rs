//! 分发统一错误定义
//!
//! 覆盖路由、处理器执行、基础设施、回调契约与调用方校验五类失败，
//! 所有失败最终都以 `Outcome::Failure(DispatchError)` 交给回调；
//! 只有 `Validation` 会从 `dispatch` 同步返回。
//!
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    // --- 路由 ---
    #[error("no handler registered: command={command}")]
    NoHandlerRegistered { command: &'static str },
    #[error("handler already registered: command={command}")]
    AlreadyRegistered { command: &'static str },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // --- 处理器执行 ---
    /// 处理器返回的原始错误，可通过 [`DispatchError::handler_cause`] 还原具体类型
    #[error("handler execution failed: {0}")]
    HandlerExecution(#[source] anyhow::Error),
    #[error("handler panicked: command={command}, message={message}")]
    HandlerPanicked {
        command: &'static str,
        message: String,
    },

    // --- 基础设施 ---
    #[error("dispatch infrastructure error: {reason}")]
    Infrastructure { reason: String, transient: bool },
    #[error("dispatch cancelled: command={command}")]
    Cancelled { command: &'static str },
    #[error("dispatch abandoned before completion: command={command}")]
    Abandoned { command: &'static str },

    // --- 回调契约 ---
    #[error("callback contract violation: command={command}, message={message}")]
    CallbackContractViolation {
        command: &'static str,
        message: String,
    },

    // --- 调用方 ---
    #[error("validation: {0}")]
    Validation(String),
}

/// 统一 Result 类型别名
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// 非瞬时的基础设施错误（不会被重试）
    pub fn infrastructure(reason: impl Into<String>) -> Self {
        Self::Infrastructure {
            reason: reason.into(),
            transient: false,
        }
    }

    /// 瞬时的基础设施错误（如传输抖动），分发器可按重试策略透明重试
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Infrastructure {
            reason: reason.into(),
            transient: true,
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Infrastructure {
                transient: true,
                ..
            }
        )
    }

    /// 将处理器返回的 `anyhow::Error` 归类：
    /// - 若其本身就是 `DispatchError`（例如远程处理器报告的传输失败），原样交付；
    /// - 否则包装为 `HandlerExecution`，保留原始错误以便调用方按类型区分。
    pub fn from_handler(err: anyhow::Error) -> Self {
        match err.downcast::<DispatchError>() {
            Ok(dispatch_err) => dispatch_err,
            Err(other) => Self::HandlerExecution(other),
        }
    }

    /// 还原处理器原始错误的具体类型
    pub fn handler_cause<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        match self {
            Self::HandlerExecution(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Error)]
    #[error("insufficient funds: balance={balance}")]
    struct InsufficientFunds {
        balance: i64,
    }

    #[test]
    fn handler_error_keeps_original_type() {
        let err = DispatchError::from_handler(anyhow::Error::new(InsufficientFunds { balance: 3 }));

        assert!(matches!(err, DispatchError::HandlerExecution(_)));
        assert_eq!(
            err.handler_cause::<InsufficientFunds>(),
            Some(&InsufficientFunds { balance: 3 })
        );
        assert!(err.handler_cause::<std::io::Error>().is_none());
    }

    #[test]
    fn dispatch_error_raised_by_handler_is_not_rewrapped() {
        let err = DispatchError::from_handler(anyhow::Error::new(DispatchError::transient(
            "connection reset",
        )));

        assert!(err.is_transient());
        assert!(err.handler_cause::<InsufficientFunds>().is_none());
    }

    #[test]
    fn only_transient_infrastructure_errors_are_transient() {
        assert!(DispatchError::transient("x").is_transient());
        assert!(!DispatchError::infrastructure("x").is_transient());
        assert!(!DispatchError::NoHandlerRegistered { command: "X" }.is_transient());
        assert!(!DispatchError::validation("x").is_transient());
    }
}

use crate::error::DispatchResult;

/// 命令（Command）
///
/// 表达“意图”的写操作请求，由且仅由一个处理器执行。
/// - 命令本身不可变，处理器以引用方式读取，便于分发器在瞬时失败后透明重试；
/// - 建议保持语义化的“动宾结构”命名，如 `OpenAccount`、`CloseOrder`。
///
/// 关联项：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
/// - `Output`：处理器成功时交给回调的结果类型。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 处理成功时的结果类型
    type Output: Send + 'static;

    /// 分发前的同步校验
    ///
    /// 返回错误时 `dispatch` 直接以 `Err` 返回，不会进入处理流程，也不会通知回调。
    fn validate(&self) -> DispatchResult<()> {
        Ok(())
    }
}

/// 单次分发的状态
///
/// ```text
/// Submitted ─┬─> HandlerFound ──> Executing ─┬─> Succeeded ─┐
///            │        ^                │     └─> Failed ────┼─> Notified
///            │        └── (重试) ──────┘            ^        │
///            └─> HandlerNotFound ───────────────────┘        │
/// ```
///
/// - `Submitted -> Failed`：找到处理器之前被取消或被丢弃；
/// - `HandlerFound -> Failed`：执行前被丢弃；
/// - `Executing -> HandlerFound`：瞬时失败后重新就绪，等待下一次尝试，对回调不可见；
/// - `Notified` 为终态。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchState {
    Submitted = 0,
    HandlerFound = 1,
    HandlerNotFound = 2,
    Executing = 3,
    Succeeded = 4,
    Failed = 5,
    Notified = 6,
}

impl DispatchState {
    pub fn can_transition_to(self, next: DispatchState) -> bool {
        use DispatchState::*;

        matches!(
            (self, next),
            (Submitted, HandlerFound)
                | (Submitted, HandlerNotFound)
                | (Submitted, Failed)
                | (HandlerNotFound, Failed)
                | (HandlerFound, Executing)
                | (HandlerFound, Failed)
                | (Executing, Succeeded)
                | (Executing, Failed)
                | (Executing, HandlerFound)
                | (Succeeded, Notified)
                | (Failed, Notified)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Notified
    }

    pub(crate) fn from_repr(value: u8) -> Self {
        match value {
            0 => Self::Submitted,
            1 => Self::HandlerFound,
            2 => Self::HandlerNotFound,
            3 => Self::Executing,
            4 => Self::Succeeded,
            5 => Self::Failed,
            _ => Self::Notified,
        }
    }
}

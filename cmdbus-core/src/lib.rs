//! 命令分发基础库（cmdbus-core）
//!
//! 定义“命令 → 唯一处理器 → 唯一结果通知”这一协议中与传输、路由无关的部分：
//! - 命令（`command`）：意图的不可变载荷与稳定名称；
//! - 命令上下文（`context`）：随命令贯穿整个分发流程的关联/因果/元数据信封；
//! - 结果（`outcome`）：一次分发产生且仅产生一次的 `Success` / `Failure`；
//! - 错误（`error`）：分发失败的统一分类，保留处理器原始错误；
//! - 回调（`callback`）：结果通知契约及其常用实现（NoOp、Future、Logging）。
//!
//! 分发器、处理器注册表与结果解析器位于 `cmdbus-dispatch`。
//!
pub mod callback;
pub mod command;
pub mod context;
pub mod error;
pub mod outcome;

pub use callback::{Callback, CommandCallback, LoggingCallback, NoOpCallback};
#[cfg(feature = "future")]
pub use callback::{FutureCallback, OutcomeReceiver};
pub use command::Command;
pub use context::CommandContext;
pub use error::{DispatchError, DispatchResult};
pub use outcome::Outcome;

// 允许在本 crate 内部通过 ::cmdbus_core 进行自引用，
// 以便 #[command] 在本 crate 的单元测试中也能解析到 ::cmdbus_core 路径。
extern crate self as cmdbus_core;

//! 命令分发（cmdbus-dispatch）
//!
//! 将命令路由到唯一的处理器，并保证每次分发恰好一次、互斥地通知回调：
//! - `CommandHandler` / `HandlerRegistry`：处理器协议与按命令类型的注册表；
//! - `DispatchState` / `OutcomeResolver`：单次分发的状态机与结果解析（工作单元边界）；
//! - `CommandDispatcher`：分发入口；
//!   - `InlineDispatcher` 在调用方任务内执行处理器；
//!   - `QueuedDispatcher` 只负责提交，由后台任务并发执行；
//! - `DispatcherConfig` / `RetryPolicy`：并发度与瞬时失败的透明重试。
//!
pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod inline_dispatcher;
pub mod queued_dispatcher;
pub mod registry;
pub mod resolver;
pub mod state;

pub use config::{DispatcherConfig, RetryPolicy};
pub use dispatcher::CommandDispatcher;
pub use handler::CommandHandler;
pub use inline_dispatcher::InlineDispatcher;
pub use queued_dispatcher::{DispatcherHandle, QueuedDispatcher};
pub use registry::HandlerRegistry;
pub use resolver::OutcomeResolver;
pub use state::DispatchState;

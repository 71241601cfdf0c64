//! 演示三种使用方式：发出即忘、带日志的回调、等待结果
//!
//! 运行：`RUST_LOG=debug cargo run -p cmdbus-dispatch --example dispatch_and_forget`
use async_trait::async_trait;
use cmdbus_core::{Callback, CommandContext, LoggingCallback};
use cmdbus_dispatch::{
    CommandDispatcher, CommandHandler, DispatcherConfig, HandlerRegistry, QueuedDispatcher,
};
use cmdbus_macros::command;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

#[command(name = "inventory.restock", output = u64)]
struct Restock {
    quantity: u64,
}

#[command(name = "inventory.reserve", output = u64)]
struct Reserve {
    quantity: u64,
}

#[derive(Debug, thiserror::Error)]
#[error("out of stock: requested={requested}, on_hand={on_hand}")]
struct OutOfStock {
    requested: u64,
    on_hand: u64,
}

#[derive(Default)]
struct Inventory {
    on_hand: AtomicU64,
}

#[async_trait]
impl CommandHandler<Restock> for Inventory {
    async fn handle(&self, _ctx: &CommandContext<Restock>, cmd: &Restock) -> anyhow::Result<u64> {
        Ok(self.on_hand.fetch_add(cmd.quantity, Ordering::SeqCst) + cmd.quantity)
    }
}

#[async_trait]
impl CommandHandler<Reserve> for Inventory {
    async fn handle(&self, _ctx: &CommandContext<Reserve>, cmd: &Reserve) -> anyhow::Result<u64> {
        let on_hand = self.on_hand.load(Ordering::SeqCst);
        if cmd.quantity > on_hand {
            return Err(OutOfStock {
                requested: cmd.quantity,
                on_hand,
            }
            .into());
        }
        self.on_hand.fetch_sub(cmd.quantity, Ordering::SeqCst);
        Ok(on_hand - cmd.quantity)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let inventory = Arc::new(Inventory::default());
    let registry = Arc::new(HandlerRegistry::new());
    registry.subscribe::<Restock, _>(inventory.clone())?;
    registry.subscribe::<Reserve, _>(inventory.clone())?;

    let (dispatcher, handle) = QueuedDispatcher::start(registry, DispatcherConfig::default());

    let on_hand = dispatcher
        .send_and_wait(Restock { quantity: 10 }, CommandContext::default())
        .await?;
    tracing::info!(on_hand, "restocked");

    // 发出即忘：结果被 NoOp 回调丢弃
    dispatcher.send(Restock { quantity: 5 }).await?;

    // 失败只会出现在日志里
    let context = CommandContext::builder()
        .causation_id("order-1001")
        .metadata([("channel".to_string(), json!("web"))].into())
        .build();
    dispatcher
        .dispatch(
            Reserve { quantity: 500 },
            context,
            LoggingCallback::wrap(Callback::no_op()),
        )
        .await?;

    let remaining = dispatcher
        .send_and_wait(Reserve { quantity: 3 }, CommandContext::default())
        .await?;
    tracing::info!(remaining, "reservation confirmed");

    handle.shutdown();
    handle.join().await;

    Ok(())
}

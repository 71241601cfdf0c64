use crate::handler::CommandHandler;
use cmdbus_core::{Command, DispatchError, DispatchResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

type ErasedHandler = Arc<dyn Any + Send + Sync>;

/// 进程内处理器注册表
/// - 通过 TypeId 为每种命令注册唯一的处理器
/// - 以类型擦除方式保存，查找时还原为 `Arc<dyn CommandHandler<C>>`
pub struct HandlerRegistry {
    handlers: DashMap<TypeId, (&'static str, ErasedHandler)>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器；同一命令重复注册返回 `AlreadyRegistered`
    pub fn subscribe<C, H>(&self, handler: Arc<H>) -> DispatchResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let handler: Arc<dyn CommandHandler<C>> = handler;

        match self.handlers.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(DispatchError::AlreadyRegistered { command: C::NAME }),
            Entry::Vacant(slot) => {
                slot.insert((C::NAME, Arc::new(handler) as ErasedHandler));
                tracing::debug!(command = C::NAME, "command handler subscribed");
                Ok(())
            }
        }
    }

    /// 注销命令处理器，返回是否存在
    pub fn unsubscribe<C: Command>(&self) -> bool {
        let removed = self.handlers.remove(&TypeId::of::<C>()).is_some();
        if removed {
            tracing::debug!(command = C::NAME, "command handler unsubscribed");
        }
        removed
    }

    /// 查找命令对应的处理器；未注册时返回 `NoHandlerRegistered`
    pub fn lookup<C: Command>(&self) -> DispatchResult<Arc<dyn CommandHandler<C>>> {
        let Some(erased) = self
            .handlers
            .get(&TypeId::of::<C>())
            .map(|entry| entry.value().1.clone())
        else {
            return Err(DispatchError::NoHandlerRegistered { command: C::NAME });
        };

        // 正常情况下这里的 downcast 永远不会失败（键与值同一泛型 C）
        erased
            .downcast_ref::<Arc<dyn CommandHandler<C>>>()
            .cloned()
            .ok_or(DispatchError::TypeMismatch {
                expected: type_name::<C>(),
                found: "unknown",
            })
    }

    pub fn contains<C: Command>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<C>())
    }

    /// 获取已注册的命令名称列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

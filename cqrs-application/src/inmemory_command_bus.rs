use crate::behavior::{Behavior, BoxAnySend, CommandMeta, DispatchFuture, Next};
use crate::{
    command::Command, command_bus::CommandBus, command_handler::CommandHandler,
    context::AppContext, error::AppError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name, type_name_of_val};
use std::sync::Arc;

type CmdHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> DispatchFuture<'a> + Send + Sync>;

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 注册不同 Command 对应的 Handler
/// - 运行时以类型擦除（Any）方式进行调度，调用端还原响应类型
/// - 每次调度都从外到内穿过注册的行为栈
pub struct InMemoryCommandBus {
    handlers: DashMap<TypeId, (&'static str, CmdHandlerFn)>,
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
            behaviors: Vec::new(),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个行为（洋葱式：先追加者在外层）
    pub fn with_behavior(mut self, behavior: Arc<dyn Behavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// 注册命令处理器；同一命令类型重复注册返回错误
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();

        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegisteredCommand { command: C::NAME });
        }

        let f: CmdHandlerFn = {
            let handler = handler.clone();

            Arc::new(move |boxed_cmd, ctx| {
                let handler = handler.clone();

                Box::pin(async move {
                    // 正常情况下这里的 downcast 永远不会失败（键与闭包同一泛型 C）
                    match boxed_cmd.downcast::<C>() {
                        Ok(cmd) => {
                            let resp = handler.handle(ctx, *cmd).await?;
                            Ok(Box::new(resp) as BoxAnySend)
                        }
                        Err(e) => Err(AppError::TypeMismatch {
                            expected: type_name::<C>(),
                            found: type_name_of_val(&e),
                        }),
                    }
                })
            })
        };

        self.handlers.insert(key, (C::NAME, f));

        Ok(())
    }

    /// 获取已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }

    async fn dispatch_impl<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Response, AppError>
    where
        C: Command,
    {
        let Some((_name, f)) = self.handlers.get(&TypeId::of::<C>()).map(|h| h.clone()) else {
            return Err(AppError::HandlerNotFound(C::NAME));
        };

        let meta = CommandMeta {
            name: C::NAME,
            repr: format!("{cmd:?}"),
        };

        let handler_future = (f)(Box::new(cmd) as Box<dyn Any + Send>, ctx);
        let out = Next::new(&self.behaviors, handler_future)
            .run(ctx, &meta)
            .await?;

        match out.downcast::<C::Response>() {
            Ok(resp) => Ok(*resp),
            Err(e) => Err(AppError::TypeMismatch {
                expected: type_name::<C::Response>(),
                found: type_name_of_val(&e),
            }),
        }
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Response, AppError>
    where
        C: Command,
    {
        self.dispatch_impl(ctx, cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::UnhandledFaultBehavior;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinSet;

    #[derive(Debug)]
    struct Ping;

    impl Command for Ping {
        const NAME: &'static str = "test.ping";
        type Response = usize;
    }

    struct PingHandler {
        counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler<Ping> for PingHandler {
        async fn handle(&self, _ctx: &AppContext, _cmd: Ping) -> Result<usize, AppError> {
            Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    // 测试注册与调度
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn register_and_dispatch_works() {
        let bus = InMemoryCommandBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.register::<Ping, _>(Arc::new(PingHandler {
            counter: counter.clone(),
        }))
        .unwrap();

        let ctx = AppContext::new();
        let n = bus.dispatch(&ctx, Ping).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(bus.registered_commands(), vec!["test.ping"]);
    }

    // 测试未注册命令返回 HandlerNotFound
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn not_found_error_when_unregistered() {
        let bus = InMemoryCommandBus::new();
        let ctx = AppContext::new();
        let err = bus.dispatch(&ctx, Ping).await.unwrap_err();
        match err {
            AppError::HandlerNotFound(name) => assert_eq!(name, "test.ping"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // 测试重复注册被拒绝
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn duplicate_registration_is_rejected() {
        let bus = InMemoryCommandBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.register::<Ping, _>(Arc::new(PingHandler {
            counter: counter.clone(),
        }))
        .unwrap();

        let err = bus
            .register::<Ping, _>(Arc::new(PingHandler { counter }))
            .unwrap_err();
        match err {
            AppError::AlreadyRegisteredCommand { command } => assert_eq!(command, "test.ping"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // 测试行为栈围绕调度执行
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn behaviors_wrap_dispatch() {
        struct CountingBehavior {
            calls: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Behavior for CountingBehavior {
            async fn handle(
                &self,
                ctx: &AppContext,
                meta: &CommandMeta,
                next: Next<'_>,
            ) -> Result<BoxAnySend, AppError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(meta.name, "test.ping");
                next.run(ctx, meta).await
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let bus = InMemoryCommandBus::new()
            .with_behavior(Arc::new(UnhandledFaultBehavior::new()))
            .with_behavior(Arc::new(CountingBehavior {
                calls: calls.clone(),
            }));

        let counter = Arc::new(AtomicUsize::new(0));
        bus.register::<Ping, _>(Arc::new(PingHandler { counter }))
            .unwrap();

        let ctx = AppContext::new();
        let n = bus.dispatch(&ctx, Ping).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // 测试并发调度安全
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_dispatch_is_safe() {
        let bus = Arc::new(InMemoryCommandBus::new());
        let counter = Arc::new(AtomicUsize::new(0));
        bus.register::<Ping, _>(Arc::new(PingHandler {
            counter: counter.clone(),
        }))
        .unwrap();

        let mut set = JoinSet::new();
        for _ in 0..100 {
            let bus = bus.clone();
            set.spawn(async move {
                let ctx = AppContext::new();
                bus.dispatch(&ctx, Ping).await.unwrap()
            });
        }

        let mut results = Vec::new();
        while let Some(res) = set.join_next().await {
            results.push(res.unwrap());
        }
        results.sort_unstable();
        assert_eq!(results.len(), 100);
        assert_eq!(results[0], 1);
        assert_eq!(results[99], 100);
    }
}

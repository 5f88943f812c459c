//! 管线行为（Pipeline Behaviors）
//!
//! 以洋葱式组合包裹每一次命令调度的横切关注点，
//! 与具体命令形态无关：
//! - 每个行为的"后置"逻辑在处理器出错时同样执行；
//! - 组合为栈而非平铺序列，由总线在调度时穿线。
//!
use crate::{context::AppContext, error::AppError};
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 类型擦除后的调度结果载荷
pub type BoxAnySend = Box<dyn Any + Send>;

/// 类型擦除后的调度 future
pub type DispatchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

/// 命令元信息（供行为记录日志，不暴露载荷类型）
#[derive(Debug, Clone)]
pub struct CommandMeta {
    /// 命令的稳定名称（`Command::NAME`）
    pub name: &'static str,
    /// 命令的 `Debug` 字符串形态
    pub repr: String,
}

/// 横切行为
///
/// 实现方在 `next.run(...)` 前后插入自己的逻辑；
/// 必须原样传递结果，除非行为本身的职责就是改写它。
#[async_trait]
pub trait Behavior: Send + Sync {
    async fn handle(
        &self,
        ctx: &AppContext,
        meta: &CommandMeta,
        next: Next<'_>,
    ) -> Result<BoxAnySend, AppError>;
}

/// 剩余调用链：先穿过剩余行为，最终到达处理器
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn Behavior>],
    handler: DispatchFuture<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(behaviors: &'a [Arc<dyn Behavior>], handler: DispatchFuture<'a>) -> Self {
        Self { behaviors, handler }
    }

    /// 继续执行调用链
    pub async fn run(self, ctx: &AppContext, meta: &CommandMeta) -> Result<BoxAnySend, AppError> {
        match self.behaviors.split_first() {
            Some((first, rest)) => {
                let next = Next {
                    behaviors: rest,
                    handler: self.handler,
                };
                first.handle(ctx, meta, next).await
            }
            None => self.handler.await,
        }
    }
}

/// 非预期故障行为
///
/// 调用下游；若故障向上传播，则以命令名称与字符串形态记录一次，
/// 随后原样重新抛出——只观察，从不吞没。
/// 栈内安装一次即可保证故障恰好被记录一次。
#[derive(Debug, Default)]
pub struct UnhandledFaultBehavior;

impl UnhandledFaultBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Behavior for UnhandledFaultBehavior {
    async fn handle(
        &self,
        ctx: &AppContext,
        meta: &CommandMeta,
        next: Next<'_>,
    ) -> Result<BoxAnySend, AppError> {
        match next.run(ctx, meta).await {
            Ok(out) => Ok(out),
            Err(err) => {
                tracing::error!(
                    command = meta.name,
                    request = %meta.repr,
                    error = %err,
                    "unhandled exception during command dispatch"
                );
                Err(err)
            }
        }
    }
}

/// 性能行为
///
/// 度量每次调度的墙钟耗时，超过阈值记录告警；
/// 处理器出错时同样完成度量后再传递结果。
#[derive(Debug)]
pub struct PerformanceBehavior {
    threshold: Duration,
}

impl PerformanceBehavior {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

impl Default for PerformanceBehavior {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl Behavior for PerformanceBehavior {
    async fn handle(
        &self,
        ctx: &AppContext,
        meta: &CommandMeta,
        next: Next<'_>,
    ) -> Result<BoxAnySend, AppError> {
        let started = Instant::now();
        let out = next.run(ctx, meta).await;
        let elapsed = started.elapsed();

        if elapsed > self.threshold {
            tracing::warn!(
                command = meta.name,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow command dispatch"
            );
        }

        out
    }
}

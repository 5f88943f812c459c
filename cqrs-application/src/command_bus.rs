use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令总线（Command Bus）
///
/// - 负责根据命令的具体类型路由到恰好一个处理器；
/// - 围绕处理器穿线行为栈（异常捕获、性能度量等横切包裹）；
/// - 框架可提供不同实现（如进程内、消息队列等）。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 分发命令到对应处理器，返回该命令关联的响应类型
    ///
    /// - `ctx`：应用上下文（通知上下文、取消令牌、关联标识）
    /// - `cmd`：具体命令实例
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Response, AppError>
    where
        C: Command;
}

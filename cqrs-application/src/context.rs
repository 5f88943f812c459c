use cqrs_domain::notification::NotificationContext;
use tokio_util::sync::CancellationToken;

/// 应用层上下文（Application Context）
///
/// 承载一次命令处理所需的横切信息：
/// - 通知上下文：请求内各协作方共享的业务失败累积器；
/// - 取消令牌：随入站请求传播，触发后处理器停止后续工作且不再尝试提交；
/// - 关联标识（`correlation_id`）：用于日志与链路追踪。
///
/// 每个入站请求新建一个实例；克隆共享同一份通知列表与取消令牌，
/// 不得跨请求复用。
///
/// 典型用法：
/// ```rust
/// use cqrs_application::context::AppContext;
///
/// let ctx = AppContext {
///     correlation_id: Some("cor-123".into()),
///     ..AppContext::new()
/// };
/// assert!(!ctx.notifications.has_notifications());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 请求级通知上下文
    pub notifications: NotificationContext,
    /// 请求取消令牌
    pub cancellation: CancellationToken,
    /// 关联标识（可选）：为空则由上层决定是否参与链路追踪
    pub correlation_id: Option<String>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求是否已被取消
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

use std::fmt::Debug;

/// 应用层命令（Command）
///
/// 表达"意图"的不可变写请求，分为三种形态：
/// - 创建：携带新字段值，无标识；
/// - 更新：携带标识与新字段值；
/// - 删除：仅携带标识。
///
/// 关联项：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由。避免依赖 `type_name::<T>()`。
/// - `Response`：调度后返回给调用方的结果类型
///   （CRUD 形态下为 [`CommandResponse`](cqrs_domain::response::CommandResponse)）。
///
/// 建议保持语义化的"动宾结构"命名，如 `RegisterUser`、`CloseOrder`。
pub trait Command: Debug + Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 调度返回的结果类型
    type Response: Send + 'static;
}

/// 携带目标实体标识的命令（更新/删除形态）
pub trait CommandWithId: Command {
    /// 目标实体的主键类型
    type Id;

    /// 目标实体标识
    fn id(&self) -> &Self::Id;
}

use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令处理器
///
/// 每个命令类型恰好对应一个处理器；一个"复合处理器"类型可以
/// 为同一实体的创建/更新/删除三种命令分别实现本 trait，
/// 内部委托给共享的 [`CrudHandler`](crate::crud_handler::CrudHandler)。
///
/// 返回值语义：
/// - `Ok(response)`：处理完成，包括预期内失败（`Fail`）；
/// - `Err(_)`：非预期故障，向上传播并由行为栈记录。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<C::Response, AppError>;
}

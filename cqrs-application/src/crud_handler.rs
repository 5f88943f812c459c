//! CRUD 处理器（核心管线）
//!
//! 针对一个实体/仓储对，以组合方式编排三种命令形态共用的状态机：
//! `接收 → 校验 → 暂存 → 提交 → 响应`，任一关口失败则退出为 `Fail`。
//!
//! 失败语义：
//! - "未找到"与"校验不通过"写入通知并返回 `Fail`，从不以错误表达；
//! - 提交返回 `false` 直接响应 `Fail`，不重试、不退避；
//! - 仅非预期故障（存储中断、映射异常）以 `Err` 向上传播，
//!   由外层行为栈记录。
//!
use crate::command::CommandWithId;
use crate::context::AppContext;
use crate::error::AppError;
use crate::mapper::{MapInto, MergeInto};
use cqrs_domain::entity::Entity;
use cqrs_domain::repository::CrudRepository;
use cqrs_domain::response::CommandResponse;
use cqrs_domain::unit_of_work::UnitOfWork;
use cqrs_domain::validation::Validate;
use std::marker::PhantomData;

/// 面向一个实体/仓储对的复合 CRUD 处理器
///
/// 同一请求内注入一次仓储与工作单元，三种形态共享校验与提交步骤。
/// 组合式设计：一个泛型类型加三个操作方法，不使用继承层级。
pub struct CrudHandler<E, R, U> {
    repository: R,
    uow: U,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R, U> CrudHandler<E, R, U>
where
    E: Entity,
    R: CrudRepository<E>,
    U: UnitOfWork,
{
    pub fn new(repository: R, uow: U) -> Self {
        Self {
            repository,
            uow,
            _entity: PhantomData,
        }
    }

    /// 创建路径：构造 → 校验 → 暂存新增 → 提交
    pub async fn create<C>(&self, ctx: &AppContext, cmd: C) -> Result<CommandResponse<E>, AppError>
    where
        C: MapInto<E> + Send + Sync,
        E: Validate,
    {
        if ctx.is_cancelled() {
            return Ok(CommandResponse::Fail);
        }

        let mut entity = cmd.map_into();

        if !entity.validate(&ctx.notifications) {
            return Ok(CommandResponse::Fail);
        }

        self.repository.add(&mut entity).await?;

        if self.commit(ctx).await? {
            Ok(CommandResponse::Ok(entity))
        } else {
            Ok(CommandResponse::Fail)
        }
    }

    /// 更新路径：查找 → 合并 → 校验 → 暂存更新 → 提交
    pub async fn update<C>(&self, ctx: &AppContext, cmd: C) -> Result<CommandResponse<E>, AppError>
    where
        C: CommandWithId<Id = E::Id> + MergeInto<E>,
        E: Validate,
    {
        if ctx.is_cancelled() {
            return Ok(CommandResponse::Fail);
        }

        let Some(mut entity) = self.repository.find_by_id(cmd.id()).await? else {
            ctx.notifications.add_notification("Not found");
            return Ok(CommandResponse::Fail);
        };

        cmd.merge_into(&mut entity);

        if !entity.validate(&ctx.notifications) {
            return Ok(CommandResponse::Fail);
        }

        self.repository.update(&mut entity).await?;

        if self.commit(ctx).await? {
            Ok(CommandResponse::Ok(entity))
        } else {
            Ok(CommandResponse::Fail)
        }
    }

    /// 删除路径：查找 → 暂存删除 → 提交
    pub async fn delete<C>(&self, ctx: &AppContext, cmd: C) -> Result<CommandResponse<E>, AppError>
    where
        C: CommandWithId<Id = E::Id>,
    {
        if ctx.is_cancelled() {
            return Ok(CommandResponse::Fail);
        }

        let Some(entity) = self.repository.find_by_id(cmd.id()).await? else {
            ctx.notifications.add_notification("Not found");
            return Ok(CommandResponse::Fail);
        };

        self.repository.delete(&entity).await?;

        if self.commit(ctx).await? {
            Ok(CommandResponse::NoContent)
        } else {
            Ok(CommandResponse::Fail)
        }
    }

    /// 共享提交步骤
    ///
    /// 关口：通知上下文非空或请求已取消时不得提交；
    /// 一旦进入提交，通知上下文不再被本处理器修改。
    async fn commit(&self, ctx: &AppContext) -> Result<bool, AppError> {
        if ctx.notifications.has_notifications() || ctx.is_cancelled() {
            return Ok(false);
        }

        Ok(self.uow.commit().await?)
    }
}

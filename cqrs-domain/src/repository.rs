//! 通用 CRUD 仓储能力接口
//!
//! 以实体类型与其主键类型抽象持久化：
//! - `find_by_id` 以 `Ok(None)` 表达"未找到"，缺失不是错误；
//! - `add` / `update` / `delete` 仅暂存变更，
//!   需由 [`UnitOfWork`](crate::unit_of_work::UnitOfWork) 提交后方才持久。
//!
use crate::entity::Entity;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 按主键对单一实体类型进行增删改查的仓储抽象
///
/// `add` / `update` 接收 `&mut E`：基础设施可以在暂存时回写字段
/// （审计时间戳、存储生成的数据），调用方随后返回的实体即为暂存后的形态。
#[async_trait]
pub trait CrudRepository<E>: Send + Sync
where
    E: Entity,
{
    /// 按主键查找实体，缺失返回 `Ok(None)`，不得以错误表达缺失
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>>;

    /// 暂存新增
    async fn add(&self, entity: &mut E) -> DomainResult<()>;

    /// 暂存更新
    async fn update(&self, entity: &mut E) -> DomainResult<()>;

    /// 暂存删除
    async fn delete(&self, entity: &E) -> DomainResult<()>;
}

#[async_trait]
impl<E, T> CrudRepository<E> for Arc<T>
where
    E: Entity,
    T: CrudRepository<E> + ?Sized,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>> {
        (**self).find_by_id(id).await
    }

    async fn add(&self, entity: &mut E) -> DomainResult<()> {
        (**self).add(entity).await
    }

    async fn update(&self, entity: &mut E) -> DomainResult<()> {
        (**self).update(entity).await
    }

    async fn delete(&self, entity: &E) -> DomainResult<()> {
        (**self).delete(entity).await
    }
}

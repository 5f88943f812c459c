//! 审计仓储装饰器
//!
//! 包裹任意 [`CrudRepository`]，在暂存时为实体盖章审计时间：
//! - `add`：盖章创建时间；
//! - `update`：盖章最近修改时间；
//! - 其余操作原样委托给内层仓储。
//!
//! 时间戳通过 `&mut E` 回写，调用方（CRUD 处理器）返回的实体
//! 即携带盖章后的审计字段。
//!
use async_trait::async_trait;
use chrono::Utc;
use cqrs_domain::auditing::{CreationAudited, ModificationAudited};
use cqrs_domain::error::DomainResult;
use cqrs_domain::repository::CrudRepository;

/// 为审计实体自动盖章时间戳的仓储装饰器
pub struct AuditedRepository<R> {
    inner: R,
}

impl<R> AuditedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E, R> CrudRepository<E> for AuditedRepository<R>
where
    E: ModificationAudited,
    R: CrudRepository<E>,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>> {
        self.inner.find_by_id(id).await
    }

    async fn add(&self, entity: &mut E) -> DomainResult<()> {
        entity.set_creation_time(Utc::now());
        self.inner.add(entity).await
    }

    async fn update(&self, entity: &mut E) -> DomainResult<()> {
        entity.set_last_modification_time(Utc::now());
        self.inner.update(entity).await
    }

    async fn delete(&self, entity: &E) -> DomainResult<()> {
        self.inner.delete(entity).await
    }
}

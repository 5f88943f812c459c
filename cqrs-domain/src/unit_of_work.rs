//! 工作单元（Unit of Work）
//!
//! 事务性提交边界：仓储暂存的全部变更在一次 `commit` 中
//! 原子生效——要么全部应用，要么全部不应用。
//!
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 事务提交边界
///
/// `commit` 返回 `Ok(false)` 表达预期内的提交失败（处理器据此响应 `Fail`，
/// 不重试、不退避）；`Err` 仅用于非预期故障（连接中断等）。
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 提交当前请求内暂存的全部变更
    async fn commit(&self) -> DomainResult<bool>;
}

#[async_trait]
impl<T> UnitOfWork for Arc<T>
where
    T: UnitOfWork + ?Sized,
{
    async fn commit(&self) -> DomainResult<bool> {
        (**self).commit().await
    }
}

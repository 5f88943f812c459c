//! 领域层统一错误定义
//!
//! 聚焦仓储/持久化与映射等最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
///
/// 注意：期望内的失败（未找到、校验不通过、提交返回 false）
/// 不属于错误，通过通知上下文与 `CommandResponse::Fail` 表达；
/// `DomainError` 仅承载非预期故障（存储中断、映射异常等）。
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 仓储/持久化 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
    #[error("unit of work error: {reason}")]
    UnitOfWork { reason: String },

    // --- 映射/取值 ---
    #[error("mapping error: {reason}")]
    Mapping { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 通用 ---
    #[error("invalid entity id: {0}")]
    InvalidEntityId(String),
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// ---- Cross-crate conversions for infrastructure convenience ----
// 允许在基础设施层直接使用 `?` 将 sqlx 等错误转换为 DomainError

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database {
            reason: err.to_string(),
        }
    }
}

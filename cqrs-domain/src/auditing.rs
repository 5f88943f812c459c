//! 审计（Auditing）
//!
//! 为实体提供创建/修改时间戳的读写契约。
//! 时间戳由基础设施在暂存时盖章（见应用层的审计仓储装饰器），
//! 未持久化前为 `None`。
//!
use crate::entity::Entity;
use chrono::{DateTime, Utc};

/// 具备创建审计信息的实体
pub trait CreationAudited: Entity {
    /// 创建时间（新增暂存时盖章）
    fn creation_time(&self) -> Option<DateTime<Utc>>;

    fn set_creation_time(&mut self, at: DateTime<Utc>);
}

/// 具备创建与修改审计信息的实体
pub trait ModificationAudited: CreationAudited {
    /// 最近一次修改时间（更新暂存时盖章）
    fn last_modification_time(&self) -> Option<DateTime<Utc>>;

    fn set_last_modification_time(&mut self, at: DateTime<Utc>);
}

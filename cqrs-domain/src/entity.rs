//! 实体（Entity）基础抽象
//!
//! 为领域实体提供统一的标识（Id）能力，主键类型由实现方选择。
//!
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可解析、可显示、可克隆并可作为映射键
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}

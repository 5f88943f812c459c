//! 命令到实体的映射契约（Mapper）
//!
//! 将命令载荷翻译为实体字段值的两种形态：
//! - `MapInto`：从命令构造全新实体（创建路径）；
//! - `MergeInto`：将命令字段合并到既有实体（更新路径），
//!   命令未指定的目标字段必须保持原值。
//!
//! 由命令类型自行实现，替代反射式对象映射器。
//!

/// 从命令构造实体（创建路径）
///
/// 实现方负责生成实体标识（或留给存储层回写）。
pub trait MapInto<E> {
    fn map_into(&self) -> E;
}

/// 将命令字段合并到既有实体（更新路径）
///
/// 字段级合并：仅覆盖命令携带的字段，未指定的字段保持原值。
pub trait MergeInto<E> {
    fn merge_into(&self, entity: &mut E);
}

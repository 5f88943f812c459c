//! 实体校验契约（Validation）
//!
//! 在全部字段变更应用完成后运行实体自身的不变式检查，
//! 每条违例向通知上下文写入一条通知，返回布尔裁决。
//!
use crate::notification::NotificationContext;

/// 实体不变式校验
///
/// 约束：
/// - 副作用仅限写入 `NotificationContext`；
/// - 幂等：对同一未变更实体重复调用，裁决一致，
///   调用方在两次调用之间新建上下文则通知不重复；
/// - 创建与更新路径共用同一实现。
pub trait Validate {
    /// 返回 `true` 当且仅当没有任何不变式被违反
    fn validate(&self, notifications: &NotificationContext) -> bool;
}

//! 命令响应契约（Response）
//!
//! 处理器向上层暴露的统一结果形态：
//! - `Ok(entity)`：变更成功并返回变更后的实体；
//! - `NoContent`：变更成功但无返回载荷（删除路径）；
//! - `Fail`：预期内失败，不携带载荷，调用方应检查通知上下文。
//!
//! "未找到"与"提交失败"有意坍缩为同一 `Fail` 形态，
//! 不附带机器可读错误码，调用方依据通知文本区分。
//!
use serde::Serialize;

/// 命令处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommandResponse<E> {
    /// 成功，返回变更后的实体
    Ok(E),
    /// 成功，无返回载荷
    NoContent,
    /// 预期内失败，详情见通知上下文
    Fail,
}

impl<E> CommandResponse<E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResponse::Ok(_))
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, CommandResponse::NoContent)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CommandResponse::Fail)
    }

    /// 取出成功载荷，非 `Ok` 返回 `None`
    pub fn into_entity(self) -> Option<E> {
        match self {
            CommandResponse::Ok(entity) => Some(entity),
            _ => None,
        }
    }
}

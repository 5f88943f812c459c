use cqrs_domain::error::DomainError;

/// 应用层统一错误
///
/// 仅承载非预期故障与调度错误；预期内的业务失败
/// （未找到、校验不通过、提交返回 false）通过
/// `CommandResponse::Fail` 与通知上下文表达，不在此枚举。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("infra: {0}")]
    Infra(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

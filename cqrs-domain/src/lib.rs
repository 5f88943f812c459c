//! CQRS 领域层基础库（cqrs-domain）
//!
//! 为 CRUD 风格的命令处理提供领域层通用抽象：
//! - 实体（`entity`）标识与审计（`auditing`）
//! - 通知上下文（`notification`）：请求级业务失败累积器
//! - 校验契约（`validation`）：实体不变式检查
//! - 仓储（`repository`）与工作单元（`unit_of_work`）能力接口
//! - 响应契约（`response`）：Ok / NoContent / Fail
//!
//! 本 crate 与存储和传输实现解耦，仅定义领域层接口与最小必要的错误类型，
//! 以便在不同基础设施（例如 Postgres、内存存储等）上进行适配实现。
//!
//! 典型用法：
//! 1. 使用 `#[entity]` 定义实体并实现 `Validate` 不变式；
//! 2. 为目标存储实现 `CrudRepository` 与 `UnitOfWork`；
//! 3. 在应用层通过 CRUD 处理器编排"校验 → 暂存 → 提交 → 响应"的流程。
//!
pub mod auditing;
pub mod entity;
pub mod error;
pub mod notification;
pub mod repository;
pub mod response;
pub mod unit_of_work;
pub mod validation;

// 允许在本 crate 内部通过 ::cqrs_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::cqrs_domain 路径。
extern crate self as cqrs_domain;

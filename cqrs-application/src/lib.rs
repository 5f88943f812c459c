//! CQRS 应用层基础库（cqrs-application）
//!
//! 在领域层抽象之上提供命令编排：
//! - 命令（`command`）与映射契约（`mapper`）
//! - 复合 CRUD 处理器（`crud_handler`）：校验 → 暂存 → 提交 → 响应
//! - 命令总线（`command_bus`）与进程内实现（`inmemory_command_bus`）
//! - 管线行为（`behavior`）：异常捕获、性能度量
//! - 应用上下文（`context`）：通知上下文、取消令牌、关联标识
//! - 内存存储（`inmemory_store`）与审计仓储装饰器（`audited_repository`）
//!
pub mod audited_repository;
pub mod behavior;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod crud_handler;
pub mod error;
pub mod inmemory_command_bus;
pub mod inmemory_store;
pub mod mapper;

pub use crud_handler::CrudHandler;
pub use inmemory_command_bus::InMemoryCommandBus;

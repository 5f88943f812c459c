//! 端到端示例：用户 CRUD
//!
//! 演示一条完整的命令链路：
//! 总线调度 → 行为栈（异常捕获、性能度量）→ 复合处理器
//! → 审计内存仓储 → 工作单元提交。
//!
use async_trait::async_trait;
use cqrs_application::InMemoryCommandBus;
use cqrs_application::audited_repository::AuditedRepository;
use cqrs_application::behavior::{PerformanceBehavior, UnhandledFaultBehavior};
use cqrs_application::command::{Command, CommandWithId};
use cqrs_application::command_bus::CommandBus;
use cqrs_application::command_handler::CommandHandler;
use cqrs_application::context::AppContext;
use cqrs_application::crud_handler::CrudHandler;
use cqrs_application::error::AppError;
use cqrs_application::inmemory_store::{InMemoryRepository, InMemoryStore, InMemoryUnitOfWork};
use cqrs_application::mapper::{MapInto, MergeInto};
use cqrs_domain::notification::NotificationContext;
use cqrs_domain::response::CommandResponse;
use cqrs_domain::validation::Validate;
use cqrs_macros::entity;
use std::sync::Arc;
use ulid::Ulid;

#[entity(id = String, audited)]
#[derive(Clone)]
struct User {
    name: String,
    email: String,
}

impl Validate for User {
    fn validate(&self, notifications: &NotificationContext) -> bool {
        let mut valid = true;
        if self.name.is_empty() {
            notifications.add_notification("Name is required");
            valid = false;
        }
        if !self.email.contains('@') {
            notifications.add_notification("Email is invalid");
            valid = false;
        }
        valid
    }
}

#[derive(Debug)]
struct RegisterUser {
    name: String,
    email: String,
}

impl Command for RegisterUser {
    const NAME: &'static str = "user.register";
    type Response = CommandResponse<User>;
}

impl MapInto<User> for RegisterUser {
    fn map_into(&self) -> User {
        User {
            id: Ulid::new().to_string(),
            creation_time: None,
            last_modification_time: None,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug)]
struct UpdateUser {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl Command for UpdateUser {
    const NAME: &'static str = "user.update";
    type Response = CommandResponse<User>;
}

impl CommandWithId for UpdateUser {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

impl MergeInto<User> for UpdateUser {
    fn merge_into(&self, entity: &mut User) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(email) = &self.email {
            entity.email = email.clone();
        }
    }
}

#[derive(Debug)]
struct DeleteUser {
    id: String,
}

impl Command for DeleteUser {
    const NAME: &'static str = "user.delete";
    type Response = CommandResponse<User>;
}

impl CommandWithId for DeleteUser {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

type UserRepo = AuditedRepository<InMemoryRepository<User>>;

// 复合处理器：同一实体的三种命令形态共享一个 CrudHandler
struct UserCommands {
    crud: CrudHandler<User, UserRepo, InMemoryUnitOfWork<User>>,
}

#[async_trait]
impl CommandHandler<RegisterUser> for UserCommands {
    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: RegisterUser,
    ) -> Result<CommandResponse<User>, AppError> {
        self.crud.create(ctx, cmd).await
    }
}

#[async_trait]
impl CommandHandler<UpdateUser> for UserCommands {
    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: UpdateUser,
    ) -> Result<CommandResponse<User>, AppError> {
        self.crud.update(ctx, cmd).await
    }
}

#[async_trait]
impl CommandHandler<DeleteUser> for UserCommands {
    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: DeleteUser,
    ) -> Result<CommandResponse<User>, AppError> {
        self.crud.delete(ctx, cmd).await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt().with_target(false).init();

    let store = Arc::new(InMemoryStore::new());
    let handler = Arc::new(UserCommands {
        crud: CrudHandler::new(
            AuditedRepository::new(InMemoryRepository::new(store.clone())),
            InMemoryUnitOfWork::new(store.clone()),
        ),
    });

    let bus = InMemoryCommandBus::new()
        .with_behavior(Arc::new(UnhandledFaultBehavior::new()))
        .with_behavior(Arc::new(PerformanceBehavior::default()));
    bus.register::<RegisterUser, _>(handler.clone())?;
    bus.register::<UpdateUser, _>(handler.clone())?;
    bus.register::<DeleteUser, _>(handler)?;

    // 1. 注册用户
    let ctx = AppContext::new();
    let alice = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await?
        .into_entity()
        .expect("registration should succeed");
    println!(
        "registered: id={} name={} created_at={:?}",
        alice.id, alice.name, alice.creation_time
    );

    // 2. 更新（仅改名，邮箱保持原值）
    let ctx = AppContext::new();
    let updated = bus
        .dispatch(
            &ctx,
            UpdateUser {
                id: alice.id.clone(),
                name: Some("Alicia".into()),
                email: None,
            },
        )
        .await?
        .into_entity()
        .expect("update should succeed");
    println!(
        "updated: name={} email={} modified_at={:?}",
        updated.name, updated.email, updated.last_modification_time
    );

    // 3. 非法更新：置空名字，校验失败
    let ctx = AppContext::new();
    let resp = bus
        .dispatch(
            &ctx,
            UpdateUser {
                id: alice.id.clone(),
                name: Some(String::new()),
                email: None,
            },
        )
        .await?;
    println!(
        "invalid update: failed={} notifications={:?}",
        resp.is_fail(),
        ctx.notifications
            .notifications()
            .iter()
            .map(|n| n.message().to_string())
            .collect::<Vec<_>>()
    );

    // 4. 删除
    let ctx = AppContext::new();
    let resp = bus.dispatch(&ctx, DeleteUser { id: alice.id }).await?;
    println!(
        "deleted: no_content={} store_empty={}",
        resp.is_no_content(),
        store.is_empty()
    );

    Ok(())
}

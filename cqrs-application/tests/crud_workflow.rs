//! 端到端工作流：总线 + 行为栈 + 复合处理器 + 审计内存存储
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
use cqrs_domain::error::{DomainError, DomainResult};
use cqrs_domain::notification::NotificationContext;
use cqrs_domain::response::CommandResponse;
use cqrs_domain::unit_of_work::UnitOfWork;
use cqrs_domain::validation::Validate;
use cqrs_macros::entity;
use std::sync::Arc;
use ulid::Ulid;

#[entity(id = String, audited)]
#[derive(Clone, PartialEq)]
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

// 复合处理器：一个类型承接同一实体的三种命令形态
struct UserCommands {
    crud: CrudHandler<User, UserRepo, InMemoryUnitOfWork<User>>,
}

impl UserCommands {
    fn new(store: Arc<InMemoryStore<User>>) -> Self {
        Self {
            crud: CrudHandler::new(
                AuditedRepository::new(InMemoryRepository::new(store.clone())),
                InMemoryUnitOfWork::new(store),
            ),
        }
    }
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

fn build_bus(store: Arc<InMemoryStore<User>>) -> InMemoryCommandBus {
    let bus = InMemoryCommandBus::new()
        .with_behavior(Arc::new(UnhandledFaultBehavior::new()))
        .with_behavior(Arc::new(PerformanceBehavior::default()));

    let handler = Arc::new(UserCommands::new(store));
    bus.register::<RegisterUser, _>(handler.clone()).unwrap();
    bus.register::<UpdateUser, _>(handler.clone()).unwrap();
    bus.register::<DeleteUser, _>(handler).unwrap();

    bus
}

// 创建 {name: "Alice"}：校验通过 → 暂存新增 → 提交成功 → Ok(带生成标识的实体)
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn register_user_end_to_end() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    let resp = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap();

    let user = resp.into_entity().expect("expected Ok(entity)");
    assert!(!user.id.is_empty());
    assert_eq!(user.name, "Alice");
    assert!(user.creation_time.is_some());
    assert!(!ctx.notifications.has_notifications());

    // 提交后对存储可见
    assert_eq!(store.get(&user.id), Some(user));
}

// 更新 {id, name: ""}：查找成功 → 合并置空 → 校验失败 → Fail + "Name is required"
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_with_empty_name_fails_validation() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    let created = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap()
        .into_entity()
        .unwrap();

    // 新的请求，新的上下文
    let ctx = AppContext::new();
    let resp = bus
        .dispatch(
            &ctx,
            UpdateUser {
                id: created.id.clone(),
                name: Some(String::new()),
                email: None,
            },
        )
        .await
        .unwrap();

    assert!(resp.is_fail());
    let messages: Vec<_> = ctx
        .notifications
        .notifications()
        .iter()
        .map(|n| n.message().to_string())
        .collect();
    assert_eq!(messages, vec!["Name is required".to_string()]);

    // 存储中的实体保持原值
    assert_eq!(store.get(&created.id).unwrap().name, "Alice");
}

// 更新保留未指定字段
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_preserves_unspecified_fields() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    let created = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap()
        .into_entity()
        .unwrap();

    let ctx = AppContext::new();
    let updated = bus
        .dispatch(
            &ctx,
            UpdateUser {
                id: created.id.clone(),
                name: Some("Alicia".into()),
                email: None,
            },
        )
        .await
        .unwrap()
        .into_entity()
        .expect("expected Ok(entity)");

    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, "alice@example.com");
    assert!(updated.last_modification_time.is_some());
    assert_eq!(updated.creation_time, created.creation_time);
}

// 删除不存在的实体：Fail + "Not found"，存储不变
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_missing_user_reports_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    let resp = bus
        .dispatch(
            &ctx,
            DeleteUser {
                id: "missing".into(),
            },
        )
        .await
        .unwrap();

    assert!(resp.is_fail());
    let all = ctx.notifications.notifications();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].message(), "Not found");
}

// 删除成功：NoContent，实体从存储移除
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_user_end_to_end() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    let created = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap()
        .into_entity()
        .unwrap();

    let ctx = AppContext::new();
    let resp = bus
        .dispatch(&ctx, DeleteUser { id: created.id })
        .await
        .unwrap();

    assert!(resp.is_no_content());
    assert!(store.is_empty());
}

// 提交失败：无论校验结果如何均为 Fail
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commit_failure_surfaces_as_fail() {
    struct FailingUow;

    #[async_trait]
    impl UnitOfWork for FailingUow {
        async fn commit(&self) -> DomainResult<bool> {
            Ok(false)
        }
    }

    let store = Arc::new(InMemoryStore::new());
    let crud = CrudHandler::new(InMemoryRepository::new(store.clone()), FailingUow);

    let ctx = AppContext::new();
    let resp = crud
        .create(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap();

    assert!(resp.is_fail());
    assert!(store.is_empty());
}

// 非预期故障穿过行为栈原样抛出（类型与消息不变）
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unexpected_fault_propagates_through_bus() {
    struct FaultyHandler;

    #[async_trait]
    impl CommandHandler<RegisterUser> for FaultyHandler {
        async fn handle(
            &self,
            _ctx: &AppContext,
            _cmd: RegisterUser,
        ) -> Result<CommandResponse<User>, AppError> {
            Err(AppError::Domain(DomainError::Database {
                reason: "connection lost".into(),
            }))
        }
    }

    let bus = InMemoryCommandBus::new()
        .with_behavior(Arc::new(UnhandledFaultBehavior::new()))
        .with_behavior(Arc::new(PerformanceBehavior::default()));
    bus.register::<RegisterUser, _>(Arc::new(FaultyHandler))
        .unwrap();

    let ctx = AppContext::new();
    let err = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::Domain(DomainError::Database { reason }) => {
            assert_eq!(reason, "connection lost");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // 预期内失败才写通知；非预期故障不触碰通知上下文
    assert!(!ctx.notifications.has_notifications());
}

// 取消的请求不提交任何变更
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelled_request_commits_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let bus = build_bus(store.clone());

    let ctx = AppContext::new();
    ctx.cancellation.cancel();

    let resp = bus
        .dispatch(
            &ctx,
            RegisterUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
        )
        .await
        .unwrap();

    assert!(resp.is_fail());
    assert!(store.is_empty());
}

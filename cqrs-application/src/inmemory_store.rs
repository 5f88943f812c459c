//! 基于内存的仓储与工作单元实现
//!
//! 对"暂存 → 提交"契约的具体渲染，供测试与示例使用：
//! - `find_by_id` 只读已提交状态，暂存中的变更不可见；
//! - `add` / `update` / `delete` 仅把变更压入待提交批次；
//! - `commit` 持锁取出整个批次并原子应用到已提交映射。
//!
use async_trait::async_trait;
use cqrs_domain::entity::Entity;
use cqrs_domain::error::DomainResult;
use cqrs_domain::repository::CrudRepository;
use cqrs_domain::unit_of_work::UnitOfWork;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

enum Staged<E: Entity> {
    Add(E),
    Update(E),
    Delete(E::Id),
}

/// 共享的内存存储：已提交映射 + 待提交批次
///
/// 同一请求内的仓储与工作单元各持一个 `Arc` 引用。
pub struct InMemoryStore<E: Entity> {
    committed: DashMap<E::Id, E>,
    pending: Mutex<Vec<Staged<E>>>,
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self {
            committed: DashMap::new(),
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl<E> InMemoryStore<E>
where
    E: Entity + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取已提交的实体（供断言与查询侧使用）
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.committed.get(id).map(|r| r.value().clone())
    }

    /// 已提交实体数
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    fn stage(&self, op: Staged<E>) {
        self.pending
            .lock()
            .expect("in-memory store lock poisoned")
            .push(op);
    }
}

/// 内存仓储：把变更暂存到共享存储的待提交批次
pub struct InMemoryRepository<E: Entity> {
    store: Arc<InMemoryStore<E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new(store: Arc<InMemoryStore<E>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<E> CrudRepository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + 'static,
{
    async fn find_by_id(&self, id: &E::Id) -> DomainResult<Option<E>> {
        Ok(self.store.get(id))
    }

    async fn add(&self, entity: &mut E) -> DomainResult<()> {
        self.store.stage(Staged::Add(entity.clone()));
        Ok(())
    }

    async fn update(&self, entity: &mut E) -> DomainResult<()> {
        self.store.stage(Staged::Update(entity.clone()));
        Ok(())
    }

    async fn delete(&self, entity: &E) -> DomainResult<()> {
        self.store.stage(Staged::Delete(entity.id().clone()));
        Ok(())
    }
}

/// 内存工作单元：提交时原子应用整个待提交批次
pub struct InMemoryUnitOfWork<E: Entity> {
    store: Arc<InMemoryStore<E>>,
}

impl<E: Entity> InMemoryUnitOfWork<E> {
    pub fn new(store: Arc<InMemoryStore<E>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<E> UnitOfWork for InMemoryUnitOfWork<E>
where
    E: Entity + Clone + 'static,
{
    async fn commit(&self) -> DomainResult<bool> {
        // 持锁期间应用整个批次，保证对本存储的提交原子性
        let mut pending = self
            .store
            .pending
            .lock()
            .expect("in-memory store lock poisoned");

        for op in pending.drain(..) {
            match op {
                Staged::Add(e) | Staged::Update(e) => {
                    self.store.committed.insert(e.id().clone(), e);
                }
                Staged::Delete(id) => {
                    self.store.committed.remove(&id);
                }
            }
        }

        Ok(true)
    }
}

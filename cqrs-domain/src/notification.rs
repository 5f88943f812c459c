//! 通知上下文（Notification Context）
//!
//! 请求级的业务失败累积器：
//! - 同一请求内的各协作方（处理器、校验器）通过共享引用写入；
//! - 只增不删：单个请求内为 write-once 语义，"重置"即新建上下文；
//! - 非空状态是当前操作必须失败（`Fail`）的唯一信号。
//!
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// 一条业务失败通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    message: String,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 请求级通知上下文
///
/// 克隆共享同一份内部列表，便于在一次请求内按引用传递；
/// 不得跨请求复用——每个入站请求新建一个实例。
#[derive(Debug, Clone, Default)]
pub struct NotificationContext {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条通知（有序，不去重）
    pub fn add_notification(&self, message: impl Into<String>) {
        self.inner
            .lock()
            .expect("notification context lock poisoned")
            .push(Notification::new(message));
    }

    /// 是否已累积任何通知
    pub fn has_notifications(&self) -> bool {
        !self
            .inner
            .lock()
            .expect("notification context lock poisoned")
            .is_empty()
    }

    /// 当前累积的通知快照（按写入顺序）
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .expect("notification context lock poisoned")
            .clone()
    }
}

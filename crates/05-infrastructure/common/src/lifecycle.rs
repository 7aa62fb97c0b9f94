//! 启动生命周期管理
//!
//! 宿主进程的每个初始化作用域（根作用域以及嵌套的子作用域）完成时都会发出一次启动信号，
//! 因此同一个监听器在进程生命周期内可能收到多次、甚至并发的通知。

use crate::errors::{LifecycleError, LifecycleResult};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 初始化作用域
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: uuid::Uuid,
    pub name: String,
    pub parent: Option<uuid::Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Scope {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            parent: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// 创建根作用域
    pub fn root() -> Self {
        Self::new("root")
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            parent: Some(self.id),
            ..Self::new(format!("{}.{}", self.name, name.into()))
        }
    }

    /// 是否为根作用域
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// 启动信号监听器
///
/// `on_startup` 在发出信号的线程上同步执行，实现方必须容忍重复与并发调用。
pub trait StartupListener: Send + Sync {
    /// 监听器名称
    fn name(&self) -> &str;

    /// 作用域初始化完成
    fn on_startup(&self, scope: &Scope) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// 启动信号源
#[derive(Default)]
pub struct StartupSignalSource {
    listeners: RwLock<Vec<Arc<dyn StartupListener>>>,
    signals_delivered: AtomicU64,
}

impl StartupSignalSource {
    /// 创建新的启动信号源
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加监听器
    pub fn add_listener(&self, listener: Arc<dyn StartupListener>) {
        debug!("添加启动监听器: {}", listener.name());
        self.listeners.write().push(listener);
    }

    /// 已注册的监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// 已发出的信号次数
    pub fn signals_delivered(&self) -> u64 {
        self.signals_delivered.load(Ordering::Relaxed)
    }

    /// 发出启动信号
    ///
    /// 依次通知所有监听器；单个监听器失败不会阻止其余监听器收到信号，
    /// 所有失败汇总后一并返回。
    pub fn signal(&self, scope: &Scope) -> LifecycleResult<()> {
        // 通知期间不持有锁，监听器内部可以继续添加监听器
        let listeners: Vec<Arc<dyn StartupListener>> = self.listeners.read().clone();
        self.signals_delivered.fetch_add(1, Ordering::Relaxed);

        info!("作用域初始化完成: {}, 通知 {} 个监听器", scope.name, listeners.len());

        let mut failures = Vec::new();
        for listener in &listeners {
            if let Err(e) = listener.on_startup(scope) {
                error!("启动监听器执行失败: {}, 作用域: {}, 原因: {}", listener.name(), scope.name, e);
                failures.push(format!("{}: {}", listener.name(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::StartupListenerFailed { failures })
        }
    }
}

impl std::fmt::Debug for StartupSignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupSignalSource")
            .field("listeners", &self.listener_count())
            .field("signals_delivered", &self.signals_delivered())
            .finish()
    }
}

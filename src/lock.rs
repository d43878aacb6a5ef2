//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了按键互斥的锁注册表，用于Cache-Aside读路径的
//! 单飞（single-flight）保护：同一键同一时刻最多一个加载在途。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按键锁注册表
///
/// 锁按需创建，持有者释放后立即回收对应条目，注册表的内存
/// 占用因此只与在途的键数量成正比。这是进程内的去重优化，
/// 不提供跨进程或跨实例的互斥。
///
/// 已知风险：释放时移除条目可能与已拿到同一锁句柄的等待者
/// 竞争，使同一键在极窄的窗口内出现多于一次的新加载。移除
/// 采用对键和当前存储句柄的比较删除（compare-and-remove）
/// 来收窄该窗口。
#[derive(Default)]
pub struct KeyLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLockRegistry {
    /// 创建空的锁注册表
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 获取指定键的锁
    ///
    /// 键无锁时创建新锁；已有锁时阻塞当前任务直到锁空闲。
    /// 返回的守卫在Drop时释放锁并回收注册表条目。
    pub async fn acquire(&self, key: &str) -> KeyLockGuard<'_> {
        let lock = Arc::clone(
            self.locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let guard = lock.clone().lock_owned().await;
        KeyLockGuard {
            registry: self,
            key: key.to_string(),
            lock,
            guard: Some(guard),
        }
    }

    /// 当前在途的键数量
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }

    fn release(&self, key: &str, lock: &Arc<Mutex<()>>) {
        self.locks.remove_if(key, |_, stored| Arc::ptr_eq(stored, lock));
    }
}

/// 按键锁守卫
///
/// 持有期内独占对应键的Cache-Aside加载周期。
/// Drop时释放互斥并从注册表回收条目，锁实例不跨调用复用。
pub struct KeyLockGuard<'a> {
    registry: &'a KeyLockRegistry,
    key: String,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyLockGuard<'_> {
    fn drop(&mut self) {
        // 先唤醒等待者，再按句柄比较删除条目
        drop(self.guard.take());
        self.registry.release(&self.key, &self.lock);
    }
}

//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用工具函数和模拟提供者。

// 各测试二进制只使用本模块的一个子集
#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use oxtier::error::{CacheError, Result};
use oxtier::provider::{CacheProvider, ReadThroughProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

#[allow(dead_code)]
pub fn setup_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
    });
}

/// 模拟缓存提供者
///
/// 内存HashMap存储，记录各操作的调用次数，便于断言编排核心
/// 是否（以及多少次）触碰了该层
pub struct MockProvider {
    store: DashMap<String, Vec<u8>>,
    priority: i32,
    pub get_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(priority: i32) -> Self {
        Self {
            store: DashMap::new(),
            priority,
            get_calls: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    /// 直查底层存储，不经过编排核心、不计数
    pub fn raw_get(&self, key: &str) -> Option<Vec<u8>> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    /// 直写底层存储，不经过编排核心、不计数
    #[allow(dead_code)]
    pub fn raw_set(&self, key: &str, value: Vec<u8>) {
        self.store.insert(key.to_string(), value);
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for MockProvider {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.raw_get(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.store.remove(key);
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 写入总是失败的模拟提供者
#[allow(dead_code)]
pub struct FailingProvider {
    priority: i32,
}

#[allow(dead_code)]
impl FailingProvider {
    pub fn new(priority: i32) -> Self {
        Self { priority }
    }
}

#[async_trait]
impl CacheProvider for FailingProvider {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        Err(CacheError::Provider("injected set failure".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 具备读穿透能力的模拟提供者
///
/// `get_or_load` 对任意键都解析出构造时给定的值；
/// 普通 `get` 始终未命中
#[allow(dead_code)]
pub struct MockReadThroughProvider {
    loaded: Option<Vec<u8>>,
    priority: i32,
    pub load_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockReadThroughProvider {
    pub fn resolving(value: Vec<u8>, priority: i32) -> Self {
        Self {
            loaded: Some(value),
            priority,
            load_calls: AtomicUsize::new(0),
        }
    }

    pub fn absent(priority: i32) -> Self {
        Self {
            loaded: None,
            priority,
            load_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CacheProvider for MockReadThroughProvider {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn as_read_through(&self) -> Option<&dyn ReadThroughProvider> {
        Some(self)
    }
}

#[async_trait]
impl ReadThroughProvider for MockReadThroughProvider {
    async fn get_or_load(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.loaded.clone())
    }
}

/// 类型化值在提供者中的字节表示（JSON序列化）
#[allow(dead_code)]
pub fn encoded(value: &str) -> Vec<u8> {
    serde_json::to_vec(&value).expect("serialize test value")
}

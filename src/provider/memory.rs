//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于内存的缓存提供者，使用Moka作为底层缓存库。

use crate::error::Result;
use crate::provider::CacheProvider;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// 内存缓存提供者
///
/// 基于内存的高速缓存层实现。条目按 `(数据, 过期时间)` 存储，
/// 读取时惰性检查过期并移除过期条目。
#[derive(Clone)]
pub struct MemoryProvider {
    cache: Cache<String, (Vec<u8>, Option<Instant>)>,
    priority: i32,
}

impl MemoryProvider {
    /// 创建新的内存缓存提供者
    ///
    /// # 参数
    ///
    /// * `capacity` - 缓存最大容量（条目数）
    /// * `priority` - 查找优先级，数值越小越先被探测
    pub fn new(capacity: u64, priority: i32) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
            priority,
        }
    }

    /// 清空所有缓存项
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl CacheProvider for MemoryProvider {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.cache.get(key).await {
            Some((bytes, expire_at)) => {
                if let Some(expire_time) = expire_at {
                    if Instant::now() >= expire_time {
                        self.cache.remove(key).await;
                        debug!("memory get: key={}, expired=true, removed", key);
                        return Ok(None);
                    }
                }
                debug!("memory get: key={}, found=true", key);
                Ok(Some(bytes))
            }
            None => {
                debug!("memory get: key={}, found=false", key);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        debug!(
            "memory set: key={}, value_len={}, ttl={:?}",
            key,
            value.len(),
            ttl
        );
        let expire_at = ttl.map(|d| Instant::now() + d);
        self.cache.insert(key.to_string(), (value, expire_at)).await;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove(&self, key: &str) -> Result<()> {
        debug!("memory remove: key={}", key);
        self.cache.remove(key).await;
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

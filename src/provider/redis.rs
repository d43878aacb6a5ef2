//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis的缓存提供者，适合作为较低优先级的分布式缓存层。

use crate::error::{CacheError, Result};
use crate::provider::CacheProvider;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument};

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Redis缓存提供者
///
/// 通过 `ConnectionManager` 维护连接，自动处理重连。
/// TTL提示直接映射为Redis的键过期时间。
#[derive(Clone)]
pub struct RedisProvider {
    conn: ConnectionManager,
    priority: i32,
}

impl RedisProvider {
    /// 连接Redis并创建提供者
    ///
    /// # 参数
    ///
    /// * `url` - Redis连接串，例如 `redis://127.0.0.1:6379`
    /// * `priority` - 查找优先级，数值越小越先被探测
    pub async fn connect(url: &str, priority: i32) -> Result<Self> {
        Self::connect_with_timeout(
            url,
            priority,
            Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        )
        .await
    }

    /// 以指定超时连接Redis并创建提供者
    pub async fn connect_with_timeout(
        url: &str,
        priority: i32,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = match timeout(connect_timeout, client.get_connection_manager()).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(CacheError::Provider(format!(
                    "Redis connection timed out after {}ms",
                    connect_timeout.as_millis()
                )));
            }
        };
        Ok(Self { conn, priority })
    }
}

#[async_trait]
impl CacheProvider for RedisProvider {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        debug!("redis get: key={}, found={}", key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        debug!(
            "redis set: key={}, value_len={}, ttl={:?}",
            key,
            value.len(),
            ttl
        );
        match ttl.map(|d| d.as_secs()).filter(|secs| *secs > 0) {
            Some(secs) => conn.set_ex::<_, _, ()>(key, value, secs).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        debug!("redis remove: key={}", key);
        Ok(())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

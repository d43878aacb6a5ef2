//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! Redis提供者行为测试。Redis不可用时跳过。

#[path = "common/mod.rs"]
mod common;

use common::setup_logging;
use oxtier::provider::redis::RedisProvider;
use oxtier::{CacheManager, CacheProvider, CacheStrategy};
use std::sync::Arc;
use std::time::Duration;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

async fn connect_or_skip(priority: i32) -> Option<RedisProvider> {
    match RedisProvider::connect_with_timeout(&redis_url(), priority, Duration::from_millis(1000))
        .await
    {
        Ok(provider) => Some(provider),
        Err(e) => {
            println!("Skipping redis test, Redis is not available: {}", e);
            None
        }
    }
}

#[tokio::test]
async fn test_redis_roundtrip() {
    setup_logging();

    let Some(provider) = connect_or_skip(1).await else {
        return;
    };

    let _ = provider.remove("oxtier:test:roundtrip").await;

    provider
        .set("oxtier:test:roundtrip", b"value".to_vec(), None)
        .await
        .unwrap();
    assert_eq!(
        provider.get("oxtier:test:roundtrip").await.unwrap(),
        Some(b"value".to_vec())
    );

    provider.remove("oxtier:test:roundtrip").await.unwrap();
    assert_eq!(provider.get("oxtier:test:roundtrip").await.unwrap(), None);
}

#[tokio::test]
async fn test_redis_ttl_hint_expires_key() {
    setup_logging();

    let Some(provider) = connect_or_skip(1).await else {
        return;
    };

    provider
        .set(
            "oxtier:test:ttl",
            b"value".to_vec(),
            Some(Duration::from_secs(1)),
        )
        .await
        .unwrap();
    assert!(provider.get("oxtier:test:ttl").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(provider.get("oxtier:test:ttl").await.unwrap(), None);
}

#[tokio::test]
async fn test_redis_as_lower_tier_behind_memory() {
    setup_logging();

    let Some(redis) = connect_or_skip(1).await else {
        return;
    };
    let redis = Arc::new(redis);
    let _ = redis.remove("oxtier:test:tiered").await;

    let memory = Arc::new(oxtier::provider::memory::MemoryProvider::new(100, 0));
    let manager = CacheManager::new()
        .with_strategy(CacheStrategy::CacheAside)
        .with_promotion_on_hit(true)
        .use_provider(memory.clone())
        .use_provider(redis.clone());

    // 预置在低优先级的Redis层
    redis
        .set(
            "oxtier:test:tiered",
            serde_json::to_vec("tiered").unwrap(),
            None,
        )
        .await
        .unwrap();

    let value: String = manager
        .get_or_load(
            "oxtier:test:tiered",
            || async { Ok("unused".to_string()) },
            None,
        )
        .await
        .unwrap();
    assert_eq!(value, "tiered");

    // 命中后提升进内存层
    assert_eq!(
        memory.get("oxtier:test:tiered").await.unwrap(),
        Some(serde_json::to_vec("tiered").unwrap())
    );

    let _ = redis.remove("oxtier:test:tiered").await;
}

//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器：策略调度的编排核心。按当前策略
//! 决定读操作由哪一层满足、何时回退到loader、何时绕过缓存，
//! 以及写操作落缓存、落后端存储还是两者皆落。
//!
//! 管理器自身不存储数据；它持有提供者链和按键锁注册表，
//! 在各层之间协调访问。

use crate::chain::ProviderChain;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::lock::KeyLockRegistry;
use crate::promotion::promote_to_earlier_tiers;
use crate::provider::CacheProvider;
use crate::serialization::{Serializer, SerializerEnum};
use crate::strategy::CacheStrategy;
use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// 字节级loader：仅在全链未命中时被await，最多一次
type BytesLoader<'a> = BoxFuture<'a, Result<Vec<u8>>>;

/// 缓存管理器
///
/// 编排核心。通过链式配置构建：注册提供者、选择策略、
/// 开关命中提升；配置应在并发流量开始前完成，运行期不变。
///
/// ```no_run
/// use oxtier::{CacheManager, CacheStrategy};
/// use oxtier::provider::memory::MemoryProvider;
/// use std::sync::Arc;
///
/// let manager = CacheManager::new()
///     .use_provider(Arc::new(MemoryProvider::new(10_000, 0)))
///     .with_strategy(CacheStrategy::CacheAside)
///     .with_promotion_on_hit(true);
/// ```
pub struct CacheManager {
    chain: ProviderChain,
    locks: KeyLockRegistry,
    strategy: CacheStrategy,
    promote_on_hit: bool,
    serializer: SerializerEnum,
    default_ttl: Option<Duration>,
    max_key_length: Option<usize>,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheManager {
    /// 创建新的缓存管理器
    ///
    /// 默认策略为Cache-Aside，命中提升关闭，JSON序列化
    pub fn new() -> Self {
        Self {
            chain: ProviderChain::new(),
            locks: KeyLockRegistry::new(),
            strategy: CacheStrategy::CacheAside,
            promote_on_hit: false,
            serializer: SerializerEnum::default(),
            default_ttl: None,
            max_key_length: None,
        }
    }

    /// 根据配置创建缓存管理器
    ///
    /// 提供者仍需通过 [`use_provider`](Self::use_provider) 注册
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate().map_err(CacheError::Config)?;
        Ok(Self::new()
            .with_strategy(config.strategy)
            .with_promotion_on_hit(config.promote_on_hit)
            .with_default_ttl(config.default_ttl())
            .with_max_key_length(config.max_key_length))
    }

    /// 注册一个缓存提供者
    ///
    /// 注册顺序决定写入顺序；读取顺序由提供者优先级决定
    pub fn use_provider(mut self, provider: Arc<dyn CacheProvider>) -> Self {
        self.chain.add(provider);
        self
    }

    /// 设置缓存策略
    pub fn with_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 开关命中提升
    ///
    /// 开启后，在较低优先级层命中（或完成新加载）的值会被
    /// 复制进更高优先级的各层
    pub fn with_promotion_on_hit(mut self, enable: bool) -> Self {
        self.promote_on_hit = enable;
        self
    }

    /// 设置序列化器
    pub fn with_serializer(mut self, serializer: SerializerEnum) -> Self {
        self.serializer = serializer;
        self
    }

    /// 设置默认TTL，调用未显式给出TTL时使用
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// 设置键长度上限，超限的键按无效键拒绝
    pub fn with_max_key_length(mut self, max: Option<usize>) -> Self {
        self.max_key_length = max;
        self
    }

    /// 当前策略
    pub fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    /// 获取缓存值（无loader）
    ///
    /// 按当前策略调度：
    /// - CacheAside / WriteThrough：未提供loader即失败
    ///   （[`CacheError::InvalidOperation`]，未命中无回退可用）
    /// - PassThrough：不触碰任何提供者，返回None
    /// - ReadThrough：依次调用读穿透提供者，全部缺席时
    ///   回退到无loader的Cache-Aside并确定性失败
    /// - WriteAround：不定义读路径（[`CacheError::NotSupported`]）
    #[instrument(skip(self), level = "debug")]
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        self.validate_key(key)?;
        debug!("getting key '{}' using strategy {:?}", key, self.strategy);

        match self.dispatch_get(key, None, None).await? {
            Some(bytes) => Ok(Some(self.serializer.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// 获取缓存值，未命中时通过loader加载并按策略回填
    ///
    /// loader最多被调用一次，且仅在全链未命中时调用。
    /// ReadThrough策略忽略loader（加载由提供者自身负责）。
    /// 同一键的并发未命中由按键锁串行化，所有并发调用者
    /// 观察到同一个加载结果。
    #[instrument(skip(self, loader), level = "debug")]
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        loader: F,
        ttl: Option<Duration>,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        self.validate_key(key)?;
        debug!("getting key '{}' using strategy {:?}", key, self.strategy);

        let ttl = ttl.or(self.default_ttl);
        let serializer = self.serializer.clone();
        let bytes_loader: BytesLoader<'_> = Box::pin(async move {
            let value = loader().await?;
            serializer.serialize(&value)
        });

        match self.dispatch_get(key, Some(bytes_loader), ttl).await? {
            Some(bytes) => self.serializer.deserialize(&bytes),
            None => Err(CacheError::InvalidOperation(format!(
                "no value resolved for key '{}'",
                key
            ))),
        }
    }

    /// 设置缓存值（无后端存储委托）
    ///
    /// WriteAround只写后端存储，未提供委托时静默跳过；
    /// PassThrough完全绕过缓存；其余策略写入所有已注册提供者
    /// （注册顺序）。
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.validate_key(key)?;
        debug!("setting key '{}' using strategy {:?}", key, self.strategy);

        let ttl = ttl.or(self.default_ttl);
        match self.strategy {
            CacheStrategy::WriteAround | CacheStrategy::PassThrough => Ok(()),
            CacheStrategy::WriteThrough | CacheStrategy::CacheAside | CacheStrategy::ReadThrough => {
                let bytes = self.serializer.serialize(value)?;
                self.write_all_providers(key, &bytes, ttl).await
            }
        }
    }

    /// 设置缓存值并写入后端存储
    ///
    /// - WriteThrough：先写存储并等待完成，存储失败在任何
    ///   缓存写之前中止（缓存与存储不分叉）；随后按注册顺序
    ///   写入所有提供者
    /// - WriteAround：只写存储，不触碰任何提供者
    /// - PassThrough：只写存储，缓存被完全绕过
    /// - CacheAside / ReadThrough：只写提供者，存储委托被忽略
    ///   （持久化责任在这些策略下属于外部）
    #[instrument(skip(self, value, write_to_store), level = "debug")]
    pub async fn set_with_store<T, F, Fut>(
        &self,
        key: &str,
        value: T,
        ttl: Option<Duration>,
        write_to_store: F,
    ) -> Result<()>
    where
        T: Serialize + Send + Sync,
        F: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<()>> + Send,
    {
        self.validate_key(key)?;
        debug!("setting key '{}' using strategy {:?}", key, self.strategy);

        let ttl = ttl.or(self.default_ttl);
        match self.strategy {
            CacheStrategy::WriteThrough => {
                let bytes = self.serializer.serialize(&value)?;
                write_to_store(value).await?;
                self.write_all_providers(key, &bytes, ttl).await
            }
            CacheStrategy::WriteAround | CacheStrategy::PassThrough => write_to_store(value).await,
            CacheStrategy::CacheAside | CacheStrategy::ReadThrough => {
                let bytes = self.serializer.serialize(&value)?;
                self.write_all_providers(key, &bytes, ttl).await
            }
        }
    }

    /// 从所有已注册提供者中删除指定键
    ///
    /// 按注册顺序逐个删除；某提供者中键不存在为空操作
    #[instrument(skip(self), level = "debug")]
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.validate_key(key)?;
        debug!("removing key '{}' from all cache providers", key);

        for provider in self.chain.iter() {
            provider.remove(key).await?;
        }
        Ok(())
    }

    fn validate_key(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(CacheError::InvalidKey(
                "cache key cannot be null or empty".to_string(),
            ));
        }
        if let Some(max) = self.max_key_length {
            if key.len() > max {
                return Err(CacheError::InvalidKey(format!(
                    "cache key exceeds maximum length of {} bytes",
                    max
                )));
            }
        }
        Ok(())
    }

    async fn dispatch_get<'a>(
        &'a self,
        key: &str,
        loader: Option<BytesLoader<'a>>,
        ttl: Option<Duration>,
    ) -> Result<Option<Vec<u8>>> {
        match self.strategy {
            CacheStrategy::CacheAside | CacheStrategy::WriteThrough => {
                self.handle_cache_aside(key, loader, ttl).await.map(Some)
            }
            CacheStrategy::PassThrough => match loader {
                Some(loader) => loader.await.map(Some),
                None => Ok(None),
            },
            CacheStrategy::ReadThrough => self.handle_read_through(key).await.map(Some),
            CacheStrategy::WriteAround => Err(CacheError::NotSupported(format!(
                "strategy {:?} does not define a read path",
                self.strategy
            ))),
        }
    }

    /// Cache-Aside读算法
    ///
    /// 持有按键锁期间：先按优先级重查各层（双重检查，等锁
    /// 期间其他调用者可能已加载），命中即按需提升并返回；
    /// 全链未命中则调用loader一次，结果按注册顺序写入所有
    /// 提供者（携带TTL提示），开启提升时再做全链提升。
    async fn handle_cache_aside<'a>(
        &'a self,
        key: &str,
        loader: Option<BytesLoader<'a>>,
        ttl: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let Some(loader) = loader else {
            warn!("cache miss for key '{}', and no loader provided", key);
            return Err(CacheError::InvalidOperation(
                "cache-aside requires a loader fallback for a miss".to_string(),
            ));
        };

        let _guard = self.locks.acquire(key).await;

        let ordered = self.chain.ordered();
        for (index, provider) in ordered.iter().enumerate() {
            if let Some(bytes) = provider.get(key).await? {
                debug!(
                    "cache hit in tier {} (priority {}) for key '{}'",
                    index,
                    provider.priority(),
                    key
                );
                if self.promote_on_hit {
                    promote_to_earlier_tiers(key, &bytes, Some(index), &ordered).await?;
                }
                return Ok(bytes);
            }
        }

        // 全链未命中，loader仅在此处被await
        let value = loader.await?;

        for provider in self.chain.iter() {
            provider.set(key, value.clone(), ttl).await?;
        }

        if self.promote_on_hit {
            promote_to_earlier_tiers(key, &value, None, &ordered).await?;
        }

        Ok(value)
    }

    /// Read-Through读算法
    ///
    /// 按优先级遍历具备读穿透能力的提供者，第一个产出
    /// 非缺席值的提供者获胜。无提供者产出时回退到无loader的
    /// Cache-Aside，后者确定性失败。
    async fn handle_read_through(&self, key: &str) -> Result<Vec<u8>> {
        let ordered = self.chain.ordered();
        for (index, provider) in ordered.iter().enumerate() {
            if let Some(read_through) = provider.as_read_through() {
                debug!("using read-through tier {} for key '{}'", index, key);
                if let Some(bytes) = read_through.get_or_load(key).await? {
                    if self.promote_on_hit {
                        promote_to_earlier_tiers(key, &bytes, Some(index), &ordered).await?;
                    }
                    return Ok(bytes);
                }
            }
        }

        warn!(
            "no read-through provider resolved key '{}'; falling back to cache-aside",
            key
        );
        self.handle_cache_aside(key, None, None).await
    }

    /// 按注册顺序写入所有提供者
    ///
    /// 第N个提供者失败时，之前的写入保留，之后的不再执行
    async fn write_all_providers(
        &self,
        key: &str,
        bytes: &[u8],
        ttl: Option<Duration>,
    ) -> Result<()> {
        for provider in self.chain.iter() {
            provider.set(key, bytes.to_vec(), ttl).await?;
        }
        Ok(())
    }
}

//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存提供者的能力契约。每个缓存层实现
//! [`CacheProvider`]；支持未命中自加载的缓存层额外实现
//! [`ReadThroughProvider`]，并通过能力查询暴露该扩展。

pub mod memory;
pub mod redis;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 缓存提供者特征
///
/// 定义单个缓存层的基本操作接口。编排核心只依赖此契约，
/// 不关心底层存储引擎；过期策略由提供者自行执行，
/// `ttl` 仅作为提示传入。
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// 获取缓存值
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键
    ///
    /// # 返回值
    ///
    /// 返回缓存值，如果不存在则返回None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 设置缓存值
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键
    /// * `value` - 缓存值
    /// * `ttl` - 过期时间提示，None表示不过期（除非提供者有默认策略）
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// 删除缓存项
    ///
    /// 键不存在时为空操作，不视为错误
    async fn remove(&self, key: &str) -> Result<()>;

    /// 查找优先级
    ///
    /// 数值越小优先级越高：先被探测，也是提升的目标层。
    /// 构造后固定不变。
    fn priority(&self) -> i32;

    /// 读穿透能力查询
    ///
    /// 支持未命中自加载的提供者覆盖此方法返回自身，
    /// 其余提供者保持默认的None
    fn as_read_through(&self) -> Option<&dyn ReadThroughProvider> {
        None
    }
}

/// 读穿透缓存提供者特征
///
/// 提供者自身负责未命中时从上游数据源加载
#[async_trait]
pub trait ReadThroughProvider: CacheProvider {
    /// 获取缓存值，未命中时由提供者从数据源加载
    ///
    /// 返回None表示"无数据可用"，不是错误
    async fn get_or_load(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存编排的配置结构和解析逻辑。

use crate::strategy::CacheStrategy;
use serde::Deserialize;
use std::time::Duration;

/// 缓存编排配置
///
/// 可从TOML加载，也可直接构造。提供者属于运行时对象，
/// 不在配置中描述，需通过管理器注册。
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存策略
    pub strategy: CacheStrategy,
    /// 是否在命中时提升到更高优先级层
    pub promote_on_hit: bool,
    /// 默认的缓存过期时间（秒），0表示不过期
    pub default_ttl_secs: u64,
    /// 键的最大长度（字节），None表示不限制
    pub max_key_length: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strategy: CacheStrategy::CacheAside,
            promote_on_hit: false,
            default_ttl_secs: 0,
            max_key_length: Some(1024),
        }
    }
}

impl CacheConfig {
    /// 从TOML文本解析配置
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        let config: CacheConfig =
            toml::from_str(content).map_err(|e| crate::error::CacheError::Config(e.to_string()))?;
        config
            .validate()
            .map_err(crate::error::CacheError::Config)?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(max) = self.max_key_length {
            if max == 0 {
                return Err("max_key_length must be greater than 0".to_string());
            }
        }
        Ok(())
    }

    /// 默认TTL，0映射为None（不过期）
    pub fn default_ttl(&self) -> Option<Duration> {
        if self.default_ttl_secs > 0 {
            Some(Duration::from_secs(self.default_ttl_secs))
        } else {
            None
        }
    }
}

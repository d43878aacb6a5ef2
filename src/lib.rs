//! oxtier - 策略驱动的缓存编排库
//!
//! 在一组按优先级排序的可插拔缓存提供者之上协调读写：
//! 按配置的策略决定读取由缓存层满足、回退到loader还是绕过
//! 缓存；写入落缓存、落后端存储还是两者皆落。同一键的并发
//! 未命中加载由按键锁串行化（缓存击穿保护），较低优先级层
//! 命中的值可按需提升到更高优先级层。
//!
//! 存储引擎本身是外部协作者：核心只依赖提供者的
//! get/set/remove契约，自带的内存（Moka）与Redis提供者仅作
//! 参考实现。

#![doc(html_root_url = "https://docs.rs/oxtier/0.1.0")]

pub use serde;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;

pub mod chain;
pub mod config;
pub mod error;
pub mod lock;
pub mod manager;
mod promotion;
pub mod provider;
pub mod serialization;
pub mod strategy;

// Re-export commonly used items
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use lock::{KeyLockGuard, KeyLockRegistry};
pub use manager::CacheManager;
pub use provider::{CacheProvider, ReadThroughProvider};
pub use serialization::{Serializer, SerializerEnum};
pub use strategy::CacheStrategy;

/// oxtier 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

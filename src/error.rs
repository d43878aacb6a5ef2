//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存编排系统的错误类型和处理机制。

use thiserror::Error;

/// 缓存编排错误类型枚举
///
/// 定义了缓存编排过程中可能发生的各种错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    /// 无效的缓存键（空或仅含空白字符）
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// 当前策略下不允许的操作
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 操作不支持
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// 提供者操作失败
    #[error("Provider error: {0}")]
    Provider(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// 缓存操作结果类型别名
///
/// 简化错误处理，所有缓存操作都返回此类型
pub type Result<T> = std::result::Result<T, CacheError>;

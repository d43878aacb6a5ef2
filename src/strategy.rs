//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存编排支持的缓存策略枚举。

use serde::Deserialize;

/// 缓存策略枚举
///
/// 决定读写操作如何在缓存提供者与数据源之间路由。
/// 策略是封闭集合，调度器对其进行穷尽匹配。
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Cache-Aside：调用方先查缓存，未命中时通过loader加载并回填缓存
    #[default]
    CacheAside,
    /// Write-Through：写操作先落后端存储，再同步写入缓存
    WriteThrough,
    /// Read-Through：缓存层自身负责未命中时的加载
    ReadThrough,
    /// Write-Around：写操作只落后端存储，绕过缓存
    WriteAround,
    /// Pass-Through：完全绕过缓存，直达loader/存储
    PassThrough,
}

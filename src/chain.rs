//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了提供者链：按注册顺序保存提供者，
//! 并按优先级提供有序视图。

use crate::provider::CacheProvider;
use std::sync::Arc;

/// 提供者链
///
/// 注册为追加式列表，不支持移除。`ordered()` 在每次调用时
/// 重新计算优先级排序（稳定排序，同优先级保持注册顺序），
/// 因此始终反映到当前为止注册的全部提供者。
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn CacheProvider>>,
}

impl ProviderChain {
    /// 创建空的提供者链
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// 追加注册一个提供者
    pub fn add(&mut self, provider: Arc<dyn CacheProvider>) {
        self.providers.push(provider);
    }

    /// 按注册顺序迭代提供者
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CacheProvider>> {
        self.providers.iter()
    }

    /// 按优先级升序返回提供者视图
    ///
    /// 数值小的优先级在前；同优先级保持注册顺序
    pub fn ordered(&self) -> Vec<Arc<dyn CacheProvider>> {
        let mut ordered = self.providers.clone();
        ordered.sort_by_key(|p| p.priority());
        ordered
    }

    /// 已注册的提供者数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 链是否为空
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

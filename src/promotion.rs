//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存提升机制：命中较低优先级层（或刚完成加载）的
//! 值被复制进有序链中更靠前的各层。

use crate::error::Result;
use crate::provider::CacheProvider;
use std::sync::Arc;
use tracing::debug;

/// 将值提升到命中层之前的所有更高优先级层
///
/// `hit_index` 为有序链中命中提供者的位置；None表示值来自
/// 新加载（或无读穿透提供者产出），此时链中所有提供者都会
/// 收到该值。提升写入不携带TTL提示。逐层顺序写入，单层失败
/// 向上传播但不回滚已写入的层。
///
/// # 参数
///
/// * `key` - 缓存键
/// * `value` - 要提升的值
/// * `hit_index` - 命中提供者在有序链中的下标，None表示全链提升
/// * `ordered` - 按优先级升序排列的提供者链
pub(crate) async fn promote_to_earlier_tiers(
    key: &str,
    value: &[u8],
    hit_index: Option<usize>,
    ordered: &[Arc<dyn CacheProvider>],
) -> Result<()> {
    let end = hit_index.unwrap_or(ordered.len());
    debug!(
        "promoting key '{}' into {} higher-priority tier(s)",
        key, end
    );

    for provider in &ordered[..end] {
        provider.set(key, value.to_vec(), None).await?;
    }

    Ok(())
}

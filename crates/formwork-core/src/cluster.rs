//! 重複構件分群模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::{Category, Event};

/// 分群編號（1 = 出現次數最多）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CL-{:03}", self.0)
    }
}

/// 分群鍵：類別 + 三個尺寸（精確比對，不做容差）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterKey {
    pub category: Category,
    pub dim1: Decimal,
    pub dim2: Decimal,
    pub dim3: Decimal,
}

impl ClusterKey {
    pub fn of(event: &Event) -> Self {
        Self {
            category: event.category.clone(),
            dim1: event.dim1,
            dim2: event.dim2,
            dim3: event.dim3,
        }
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}x{}",
            self.category, self.dim1, self.dim2, self.dim3
        )
    }
}

/// 分群摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: ClusterId,

    pub key: ClusterKey,

    /// 成員數（重複次數）
    pub member_count: usize,

    /// 單一構件模板面積
    pub footprint: Decimal,

    /// 全部成員模板面積合計
    pub total_footprint: Decimal,
}

/// 已指派分群的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredEvent {
    pub event: Event,

    pub footprint: Decimal,

    pub cluster_id: ClusterId,
}

impl ClusteredEvent {
    /// 施工分區標籤（未填寫時為 `Default`）
    pub fn zone_label(&self) -> &str {
        self.event.zone.as_deref().unwrap_or("Default")
    }
}

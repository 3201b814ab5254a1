//! # Formwork Calculation Engine
//!
//! 模板周轉規劃計算引擎

pub mod area;
pub mod clustering;
pub mod kitting;
pub mod planner;
pub mod procurement;
pub mod timeline;

// Re-export 主要類型
pub use area::AreaCalculator;
pub use clustering::{ClusterCalculator, ClusteringOutcome};
pub use kitting::{Grade, KitAssignment, KitPlanner, KitSummary, StandardizationScore};
pub use planner::{run_plan, FormworkPlanner};
pub use procurement::{ProcurementLine, ProcurementScheduler, ProcurementStatus};
pub use timeline::{TimelineBuilder, TimelineOutput};

use formwork_core::{
    Cluster, ClusterId, ClusteredEvent, OptimizationResult, PlanWarning, TimelineEntry,
    WarningSeverity,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 模板規劃結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// 周轉天數
    pub cooldown_days: u32,

    /// 已分群的構件（保持輸入順序）
    pub events: Vec<ClusteredEvent>,

    /// 分群摘要
    pub clusters: Vec<Cluster>,

    /// 各分組最佳化結果
    pub optimization: Vec<OptimizationResult>,

    /// 每日使用狀況
    pub timeline: Vec<TimelineEntry>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,
}

impl PlanReport {
    /// 構件ID → 分群編號
    pub fn assignments(&self) -> BTreeMap<&str, ClusterId> {
        self.events
            .iter()
            .map(|e| (e.event.id.as_str(), e.cluster_id))
            .collect()
    }

    /// 採購總套數
    pub fn total_required_units(&self) -> u32 {
        self.optimization.iter().map(|r| r.required_units).sum()
    }

    /// 不周轉時的總套數
    pub fn total_naive_units(&self) -> u32 {
        self.optimization.iter().map(|r| r.naive_units).sum()
    }

    /// 最佳化採購成本合計
    pub fn total_optimized_cost(&self) -> Decimal {
        self.optimization.iter().map(|r| r.optimized_cost).sum()
    }

    /// 不周轉採購成本合計
    pub fn total_naive_cost(&self) -> Decimal {
        self.optimization.iter().map(|r| r.naive_cost).sum()
    }

    /// 採購 + 報廢重置成本合計
    pub fn total_true_cost(&self) -> Decimal {
        self.optimization.iter().map(|r| r.true_total_cost).sum()
    }

    /// 是否有錯誤等級的警告
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

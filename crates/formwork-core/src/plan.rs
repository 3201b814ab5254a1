//! 規劃結果模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterId;
use crate::config::SolverStrategy;

/// 單一分群（或分群 × 分區）的最佳化結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub cluster_id: ClusterId,

    /// 施工分區（未分區時為 `All`）
    pub zone: String,

    /// 最少需採購套數
    pub required_units: u32,

    /// 不周轉時的套數（每次澆置一套）
    pub naive_units: u32,

    /// 代表性單套成本
    pub unit_cost: Decimal,

    /// 最佳化採購成本
    pub optimized_cost: Decimal,

    /// 不周轉採購成本
    pub naive_cost: Decimal,

    /// 節省金額
    pub cost_savings: Decimal,

    /// 成本降低百分比
    pub cost_reduction_pct: Decimal,

    /// 使用次數用盡而報廢的套數
    pub units_written_off: u32,

    /// 報廢重置成本
    pub write_off_cost: Decimal,

    /// 採購成本 + 報廢重置成本
    pub true_total_cost: Decimal,

    /// 實際產生此結果的求解方式
    pub strategy: SolverStrategy,
}

impl OptimizationResult {
    /// 依套數與成本建立結果，並推導成本欄位
    ///
    /// 套數不超過組內事件數，成本已由 `validate_events` 限制量級。
    pub fn new(
        cluster_id: ClusterId,
        zone: String,
        required_units: u32,
        naive_units: u32,
        unit_cost: Decimal,
    ) -> Self {
        let optimized_cost = Decimal::from(required_units) * unit_cost;
        let naive_cost = Decimal::from(naive_units) * unit_cost;
        let cost_savings = naive_cost - optimized_cost;
        let cost_reduction_pct = if naive_cost > Decimal::ZERO {
            cost_savings / naive_cost * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        Self {
            cluster_id,
            zone,
            required_units,
            naive_units,
            unit_cost,
            optimized_cost,
            naive_cost,
            cost_savings,
            cost_reduction_pct,
            units_written_off: 0,
            write_off_cost: Decimal::ZERO,
            true_total_cost: optimized_cost,
            strategy: SolverStrategy::SlidingWindow,
        }
    }

    /// 建構器模式：設置報廢套數與重置單價
    pub fn with_write_off(mut self, units: u32, replacement_cost: Decimal) -> Self {
        self.units_written_off = units;
        self.write_off_cost = Decimal::from(units) * replacement_cost;
        self.true_total_cost = self.optimized_cost + self.write_off_cost;
        self
    }

    /// 建構器模式：設置求解方式
    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 周轉節省的套數
    pub fn units_saved(&self) -> u32 {
        self.naive_units.saturating_sub(self.required_units)
    }
}

/// 每日模板使用狀況
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,

    /// 仍在周轉期內（鎖定中）的套數
    pub active_count: u32,

    /// 採購總套數（整次規劃固定）
    pub available_count: u32,

    /// 當日新澆置數
    pub new_count: u32,

    /// 周轉中的舊套數 = active - new（負值代表資料不一致）
    pub reused_count: i64,
}

impl TimelineEntry {
    /// 當日閒置套數（超量使用時為負）
    pub fn idle_count(&self) -> i64 {
        i64::from(self.available_count) - i64::from(self.active_count)
    }

    /// 是否超出採購套數
    pub fn is_overcommitted(&self) -> bool {
        self.active_count > self.available_count
    }
}

/// 規劃警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// 相關對象（分群、構件或日期）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

//! # Formwork Optimizer
//!
//! 最少模板套數計算（滑動窗口、整數規劃模型）

pub mod constraint;
pub mod demand;
pub mod sizing;
pub mod window;

// Re-export 主要類型
pub use constraint::{ConstraintOutcome, WindowConstraintModel};
pub use demand::DailyDemand;
pub use sizing::{UnitOptimizer, ALL_ZONES};
pub use window::{peak_window_sum, trailing_window_sums};

use formwork_core::{OptimizationResult, PlanWarning};

/// 最佳化輸出
#[derive(Debug, Clone, Default)]
pub struct OptimizationOutput {
    /// 依 `(cluster_id, zone)` 排序的結果
    pub results: Vec<OptimizationResult>,

    /// 資料品質警告
    pub warnings: Vec<PlanWarning>,
}

impl OptimizationOutput {
    /// 全部分組的採購套數合計
    pub fn total_required_units(&self) -> u32 {
        self.results.iter().map(|r| r.required_units).sum()
    }
}

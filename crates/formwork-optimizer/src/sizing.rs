//! 分群最少套數計算

use formwork_core::{
    ClusterId, ClusteredEvent, OptimizationResult, PlanConfig, PlanWarning, SolverStrategy,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::constraint::{ConstraintOutcome, WindowConstraintModel};
use crate::demand::DailyDemand;
use crate::window::peak_window_sum;
use crate::OptimizationOutput;

/// 未分區時的分區標籤
pub const ALL_ZONES: &str = "All";

/// 分組鍵：分群 + 分區
type GroupKey = (ClusterId, String);

/// 最少套數計算器
pub struct UnitOptimizer;

impl UnitOptimizer {
    /// 對每個分群（或分群 × 分區）計算最少套數與成本
    ///
    /// 各組彼此獨立，平行計算後依 `(cluster_id, zone)` 排序回傳。
    pub fn optimize(events: &[ClusteredEvent], config: &PlanConfig) -> OptimizationOutput {
        let groups = Self::group_events(events, config.split_by_zone);

        tracing::debug!("最佳化分組數: {}", groups.len());

        let mut computed: Vec<(OptimizationResult, Vec<PlanWarning>)> = groups
            .into_par_iter()
            .filter_map(|((cluster_id, zone), members)| {
                Self::optimize_group(cluster_id, zone, &members, config)
            })
            .collect();

        computed.sort_by(|(a, _), (b, _)| {
            (a.cluster_id, &a.zone).cmp(&(b.cluster_id, &b.zone))
        });

        let mut output = OptimizationOutput::default();
        for (result, warnings) in computed {
            output.results.push(result);
            output.warnings.extend(warnings);
        }
        output
    }

    /// 依分群（與分區）分組，組內保持輸入順序
    fn group_events(
        events: &[ClusteredEvent],
        split_by_zone: bool,
    ) -> BTreeMap<GroupKey, Vec<&ClusteredEvent>> {
        let mut groups: BTreeMap<GroupKey, Vec<&ClusteredEvent>> = BTreeMap::new();
        for event in events {
            let zone = if split_by_zone {
                event.zone_label().to_string()
            } else {
                ALL_ZONES.to_string()
            };
            groups.entry((event.cluster_id, zone)).or_default().push(event);
        }
        groups
    }

    /// 單組計算
    fn optimize_group(
        cluster_id: ClusterId,
        zone: String,
        members: &[&ClusteredEvent],
        config: &PlanConfig,
    ) -> Option<(OptimizationResult, Vec<PlanWarning>)> {
        let demand = DailyDemand::from_dates(members.iter().map(|e| e.event.occurrence_date))?;
        let total = demand.total();
        let life_limit = config.life_limit_lower_bound(total);

        let (required_units, strategy) = Self::required_units(&demand, life_limit, config);

        let mut warnings = Vec::new();
        let first = &members[0].event;
        let unit_cost = first.unit_cost;
        if members.iter().any(|e| e.event.unit_cost != unit_cost) {
            warnings.push(PlanWarning::warning(
                cluster_id.to_string(),
                format!(
                    "分區 {} 的單套成本不一致，採用第一筆 ({}) 的 {}",
                    zone, first.id, unit_cost
                ),
            ));
        }

        let replacement_cost = first.effective_replacement_cost();
        if members
            .iter()
            .any(|e| e.event.effective_replacement_cost() != replacement_cost)
        {
            warnings.push(PlanWarning::warning(
                cluster_id.to_string(),
                format!(
                    "分區 {} 的重置成本不一致，採用第一筆 ({}) 的 {}",
                    zone, first.id, replacement_cost
                ),
            ));
        }

        tracing::debug!(
            "分群 {} / {}: 天數 {}, 澆置 {}, 最少套數 {}",
            cluster_id,
            zone,
            demand.len(),
            total,
            required_units
        );

        let result = OptimizationResult::new(cluster_id, zone, required_units, total, unit_cost)
            .with_write_off(config.units_written_off(total), replacement_cost)
            .with_strategy(strategy);

        Some((result, warnings))
    }

    /// 依配置的求解方式計算最少套數，回傳實際採用的方式
    pub fn required_units(
        demand: &DailyDemand,
        life_limit: u32,
        config: &PlanConfig,
    ) -> (u32, SolverStrategy) {
        let scan = peak_window_sum(&demand.pours, config.cooldown_days).max(life_limit);

        if config.strategy == SolverStrategy::SlidingWindow {
            return (scan, SolverStrategy::SlidingWindow);
        }

        let model = WindowConstraintModel::build(demand, config.cooldown_days, life_limit);
        match model.solve(config.solver_iteration_budget) {
            ConstraintOutcome::Optimal(z) if z == scan => (z, SolverStrategy::ConstraintModel),
            ConstraintOutcome::Optimal(z) => {
                tracing::warn!("整數規劃結果 {} 與滑動窗口 {} 不一致，採用滑動窗口", z, scan);
                (scan, SolverStrategy::SlidingWindow)
            }
            outcome => {
                tracing::debug!("整數規劃未求得解 ({:?})，退回滑動窗口", outcome);
                (scan, SolverStrategy::SlidingWindow)
            }
        }
    }
}

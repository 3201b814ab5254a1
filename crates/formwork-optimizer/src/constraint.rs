//! 整數規劃模型
//!
//! ```text
//! minimize   Z
//! subject to Z >= window_sum(t)   for every day t
//!            Z >= life_limit
//!            Z integer >= 0
//! ```
//!
//! 以有上限的可行性二分搜尋求解。滑動窗口掃描才是主要路徑，
//! 此模型的結果必須與其完全一致。

use crate::demand::DailyDemand;

/// 模型求解結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOutcome {
    /// 找到最小可行解
    Optimal(u32),
    /// 超過迭代上限
    BudgetExhausted { iterations: u32 },
    /// 上界不可行
    Infeasible,
}

/// 最少套數的整數規劃模型
#[derive(Debug, Clone)]
pub struct WindowConstraintModel {
    /// 每日容量限制：Z >= constraints[t]
    constraints: Vec<u32>,

    /// 變數下界（使用次數限制）
    lower_bound: u32,

    /// 搜尋上界（不周轉時的套數）
    upper_bound: u32,
}

impl WindowConstraintModel {
    /// 依每日需求與周轉天數建立模型
    pub fn build(demand: &DailyDemand, cooldown_days: u32, life_limit: u32) -> Self {
        let constraints = demand.window_sums(cooldown_days);
        let upper_bound = demand.total().max(life_limit);

        Self {
            constraints,
            lower_bound: life_limit,
            upper_bound,
        }
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// 檢查 Z 是否滿足所有限制
    pub fn is_feasible(&self, z: u32) -> bool {
        z >= self.lower_bound && self.constraints.iter().all(|&c| z >= c)
    }

    /// 在迭代上限內求最小可行解
    pub fn solve(&self, iteration_budget: u32) -> ConstraintOutcome {
        if !self.is_feasible(self.upper_bound) {
            return ConstraintOutcome::Infeasible;
        }

        let mut lo = self.lower_bound;
        let mut hi = self.upper_bound;
        let mut iterations = 0;

        while lo < hi {
            if iterations >= iteration_budget {
                return ConstraintOutcome::BudgetExhausted { iterations };
            }
            iterations += 1;

            let mid = lo + (hi - lo) / 2;
            if self.is_feasible(mid) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        ConstraintOutcome::Optimal(lo)
    }
}

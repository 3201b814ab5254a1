//! 規劃配置模型

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{Event, FormworkError, Result};

/// 周轉天數上限（十年）
pub const MAX_COOLDOWN_DAYS: u32 = 3_650;

/// 時間軸天數上限：最早澆置日至最晚澆置日 + 周轉天數
pub const MAX_HORIZON_DAYS: i64 = 36_600;

/// 最少套數的求解方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// 滑動窗口最大值（封閉解，線性時間）
    #[default]
    SlidingWindow,

    /// 整數規劃模型（有迭代上限，超出時退回滑動窗口）
    ConstraintModel,
}

/// 規劃參數配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// 周轉天數：一次澆置後模板被鎖定的天數（養護 + 拆模 + 搬運）
    pub cooldown_days: u32,

    /// 每套模板最多可使用次數（None = 不限）
    pub max_reuse_count: Option<u32>,

    /// 是否依施工分區分開計算
    pub split_by_zone: bool,

    /// 求解方式
    pub strategy: SolverStrategy,

    /// 整數規劃模型的迭代上限
    pub solver_iteration_budget: u32,
}

impl PlanConfig {
    /// 創建新的規劃配置
    pub fn new(cooldown_days: u32) -> Self {
        Self {
            cooldown_days,
            max_reuse_count: None,
            split_by_zone: false,
            strategy: SolverStrategy::SlidingWindow,
            solver_iteration_budget: 64,
        }
    }

    /// 建構器模式：設置最大使用次數
    pub fn with_max_reuse_count(mut self, count: u32) -> Self {
        self.max_reuse_count = Some(count);
        self
    }

    /// 建構器模式：設置是否依分區計算
    pub fn with_split_by_zone(mut self, split: bool) -> Self {
        self.split_by_zone = split;
        self
    }

    /// 建構器模式：設置求解方式
    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 建構器模式：設置迭代上限
    pub fn with_solver_iteration_budget(mut self, budget: u32) -> Self {
        self.solver_iteration_budget = budget;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.cooldown_days == 0 {
            return Err(FormworkError::InvalidConfig(
                "周轉天數必須至少為 1".to_string(),
            ));
        }

        if self.cooldown_days > MAX_COOLDOWN_DAYS {
            return Err(FormworkError::InvalidConfig(format!(
                "周轉天數不可超過 {} 天: {}",
                MAX_COOLDOWN_DAYS, self.cooldown_days
            )));
        }

        if self.max_reuse_count == Some(0) {
            return Err(FormworkError::InvalidConfig(
                "最大使用次數必須至少為 1".to_string(),
            ));
        }

        Ok(())
    }

    /// 檢查事件日期加上周轉天數後的時間軸可以表示
    pub fn validate_horizon(&self, events: &[Event]) -> Result<()> {
        let dates = events.iter().map(|e| e.occurrence_date);
        let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
            return Ok(());
        };

        let end = last
            .checked_add_signed(Duration::days(i64::from(self.cooldown_days)))
            .ok_or_else(|| {
                FormworkError::InvalidHorizon(format!(
                    "{} 加上周轉 {} 天超出日期範圍",
                    last, self.cooldown_days
                ))
            })?;

        let span = (end - first).num_days();
        if span > MAX_HORIZON_DAYS {
            return Err(FormworkError::InvalidHorizon(format!(
                "{} ~ {} 共 {} 天，超過上限 {} 天",
                first, end, span, MAX_HORIZON_DAYS
            )));
        }

        Ok(())
    }

    /// 使用次數限制下的最少套數：ceil(total / max_reuse_count)
    pub fn life_limit_lower_bound(&self, total_events: u32) -> u32 {
        match self.max_reuse_count {
            Some(limit) if limit > 0 => total_events.div_ceil(limit),
            _ => 0,
        }
    }

    /// 使用次數用盡而報廢的套數：floor(total / max_reuse_count)
    pub fn units_written_off(&self, total_events: u32) -> u32 {
        match self.max_reuse_count {
            Some(limit) if limit > 0 => total_events / limit,
            _ => 0,
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::new(7)
    }
}

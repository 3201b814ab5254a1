//! 採購下單排程

use chrono::{Duration, NaiveDate};
use formwork_core::{ClusterId, ClusteredEvent, OptimizationResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 下單急迫程度（排序：急件優先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProcurementStatus {
    /// 已過最晚下單日
    Urgent,
    /// 交期內需下單
    OrderSoon,
    /// 尚有餘裕
    Planned,
}

/// 單一分組的採購建議
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementLine {
    pub cluster_id: ClusterId,
    pub zone: String,

    /// 應採購套數
    pub units_to_order: u32,

    /// 首次澆置日
    pub first_pour_date: NaiveDate,

    /// 最晚下單日 = 首次澆置日 - 交期
    pub order_by_date: NaiveDate,

    /// 距最晚下單日天數（負值表示已逾期）
    pub days_until_order: i64,

    pub estimated_cost: Decimal,

    pub status: ProcurementStatus,
}

/// 採購排程計算器
pub struct ProcurementScheduler;

impl ProcurementScheduler {
    /// 為每個最佳化分組產生採購建議
    ///
    /// `split_by_zone` 須與產生 `results` 的配置一致：未分區時
    /// 每個分群取全部分區的首次澆置日。`today` 由呼叫端提供，
    /// 讓結果只取決於輸入。
    pub fn schedule(
        results: &[OptimizationResult],
        events: &[ClusteredEvent],
        split_by_zone: bool,
        lead_time_days: u32,
        today: NaiveDate,
    ) -> Vec<ProcurementLine> {
        let lead_time = i64::from(lead_time_days);

        let mut lines: Vec<ProcurementLine> = results
            .iter()
            .filter_map(|result| {
                let first_pour_date = events
                    .iter()
                    .filter(|e| e.cluster_id == result.cluster_id)
                    .filter(|e| !split_by_zone || e.zone_label() == result.zone)
                    .map(|e| e.event.occurrence_date)
                    .min()?;

                // 早於可表示範圍時取最早日期
                let order_by_date = first_pour_date
                    .checked_sub_signed(Duration::days(lead_time))
                    .unwrap_or(NaiveDate::MIN);
                let days_until_order = (order_by_date - today).num_days();

                Some(ProcurementLine {
                    cluster_id: result.cluster_id,
                    zone: result.zone.clone(),
                    units_to_order: result.required_units,
                    first_pour_date,
                    order_by_date,
                    days_until_order,
                    estimated_cost: result.optimized_cost,
                    status: Self::classify(days_until_order, lead_time),
                })
            })
            .collect();

        lines.sort_by(|a, b| {
            (a.status, a.order_by_date, a.cluster_id, &a.zone).cmp(&(
                b.status,
                b.order_by_date,
                b.cluster_id,
                &b.zone,
            ))
        });

        lines
    }

    fn classify(days_until_order: i64, lead_time: i64) -> ProcurementStatus {
        if days_until_order < 0 {
            ProcurementStatus::Urgent
        } else if days_until_order <= lead_time {
            ProcurementStatus::OrderSoon
        } else {
            ProcurementStatus::Planned
        }
    }
}

//! 模板套件指派
//!
//! 一套「套件」即一套實體模板。同一分群內依澆置日期排序，
//! 每筆澆置使用編號最小、且距上次使用已滿周轉天數的套件；
//! 沒有可用套件時新增一套。

use chrono::NaiveDate;
use formwork_core::{ClusterId, ClusteredEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 單筆澆置的套件指派
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitAssignment {
    pub event_id: String,
    pub cluster_id: ClusterId,

    /// 例：`CL-001/K-02`
    pub kit_id: String,

    /// 分群內的套件序號（自 1 起）
    pub kit_number: u32,

    pub occurrence_date: NaiveDate,

    /// 此次為該套件的第幾次使用
    pub use_count: u32,

    /// 距上次使用天數（首次使用為 0）
    pub days_since_previous: i64,
}

/// 單一套件的使用統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitSummary {
    pub kit_id: String,
    pub cluster_id: ClusterId,
    pub kit_number: u32,
    pub total_uses: u32,
    pub first_use: NaiveDate,
    pub last_use: NaiveDate,
    pub active_days: i64,

    /// (使用次數 - 1) / 使用次數 × 100
    pub reuse_efficiency_pct: Decimal,
}

/// 標準化評等
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    fn from_score(score: Decimal) -> Self {
        if score >= Decimal::from(80) {
            Grade::A
        } else if score >= Decimal::from(65) {
            Grade::B
        } else if score >= Decimal::from(50) {
            Grade::C
        } else if score >= Decimal::from(35) {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::A => "A (Excellent)",
            Grade::B => "B (Good)",
            Grade::C => "C (Average)",
            Grade::D => "D (Below Average)",
            Grade::F => "F (Poor)",
        };
        f.write_str(label)
    }
}

/// 設計重複度評分（0–100）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizationScore {
    pub score: Decimal,

    /// 無資料時為 None
    pub grade: Option<Grade>,

    pub total_events: usize,
    pub unique_clusters: usize,
    pub avg_cluster_size: Decimal,
    pub repetition_ratio_pct: Decimal,
    pub category_variety: usize,
}

/// 套件指派計算器
pub struct KitPlanner;

impl KitPlanner {
    /// 為每筆澆置指派套件
    ///
    /// 回傳依 `(日期, 分群)` 排序；同日同分群保持輸入順序。
    pub fn assign(events: &[ClusteredEvent], cooldown_days: u32) -> Vec<KitAssignment> {
        let mut by_cluster: BTreeMap<ClusterId, Vec<(usize, &ClusteredEvent)>> = BTreeMap::new();
        for (position, event) in events.iter().enumerate() {
            by_cluster
                .entry(event.cluster_id)
                .or_default()
                .push((position, event));
        }

        let cooldown = i64::from(cooldown_days);
        let mut assignments: Vec<(usize, KitAssignment)> = Vec::with_capacity(events.len());

        for (cluster_id, mut members) in by_cluster {
            members.sort_by_key(|(position, e)| (e.event.occurrence_date, *position));

            // 每套件的最後使用日與使用次數
            let mut last_used: Vec<NaiveDate> = Vec::new();
            let mut uses: Vec<u32> = Vec::new();

            for (position, member) in members {
                let date = member.event.occurrence_date;
                let free = last_used
                    .iter()
                    .position(|&last| (date - last).num_days() >= cooldown);

                let (slot, days_since_previous) = match free {
                    Some(slot) => (slot, (date - last_used[slot]).num_days()),
                    None => {
                        last_used.push(date);
                        uses.push(0);
                        (last_used.len() - 1, 0)
                    }
                };

                last_used[slot] = date;
                uses[slot] += 1;

                let kit_number = slot as u32 + 1;
                assignments.push((
                    position,
                    KitAssignment {
                        event_id: member.event.id.clone(),
                        cluster_id,
                        kit_id: format!("{}/K-{:02}", cluster_id, kit_number),
                        kit_number,
                        occurrence_date: date,
                        use_count: uses[slot],
                        days_since_previous,
                    },
                ));
            }
        }

        assignments.sort_by_key(|(position, a)| (a.occurrence_date, a.cluster_id, *position));

        tracing::debug!("套件指派完成：澆置 {} 筆", assignments.len());

        assignments.into_iter().map(|(_, a)| a).collect()
    }

    /// 彙總每套件的使用統計，依 `(分群, 套件序號)` 排序
    pub fn summarize(assignments: &[KitAssignment]) -> Vec<KitSummary> {
        let mut grouped: BTreeMap<(ClusterId, u32), Vec<&KitAssignment>> = BTreeMap::new();
        for assignment in assignments {
            grouped
                .entry((assignment.cluster_id, assignment.kit_number))
                .or_default()
                .push(assignment);
        }

        grouped
            .into_iter()
            .filter_map(|((cluster_id, kit_number), uses)| {
                let first_use = uses.iter().map(|a| a.occurrence_date).min()?;
                let last_use = uses.iter().map(|a| a.occurrence_date).max()?;
                let total_uses = uses.len() as u32;
                let reuse_efficiency_pct = (Decimal::from(total_uses - 1)
                    / Decimal::from(total_uses)
                    * Decimal::ONE_HUNDRED)
                    .round_dp(1);

                Some(KitSummary {
                    kit_id: uses[0].kit_id.clone(),
                    cluster_id,
                    kit_number,
                    total_uses,
                    first_use,
                    last_use,
                    active_days: (last_use - first_use).num_days() + 1,
                    reuse_efficiency_pct,
                })
            })
            .collect()
    }

    /// 每分群使用的套件數
    pub fn kits_per_cluster(assignments: &[KitAssignment]) -> BTreeMap<ClusterId, u32> {
        let mut kits: BTreeMap<ClusterId, u32> = BTreeMap::new();
        for assignment in assignments {
            let count = kits.entry(assignment.cluster_id).or_insert(0);
            *count = (*count).max(assignment.kit_number);
        }
        kits
    }

    /// 設計標準化評分
    ///
    /// `score = (重複率 × 0.6 + min(平均分群大小 / 10, 1) × 0.3 + min(類別數 / 3, 1) × 0.1) × 100`
    pub fn standardization_score(events: &[ClusteredEvent]) -> StandardizationScore {
        let total_events = events.len();
        if total_events == 0 {
            return StandardizationScore {
                score: Decimal::ZERO,
                grade: None,
                total_events: 0,
                unique_clusters: 0,
                avg_cluster_size: Decimal::ZERO,
                repetition_ratio_pct: Decimal::ZERO,
                category_variety: 0,
            };
        }

        let unique_clusters = events
            .iter()
            .map(|e| e.cluster_id)
            .collect::<BTreeSet<_>>()
            .len();
        let category_variety = events
            .iter()
            .map(|e| e.event.category.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let total = Decimal::from(total_events);
        let clusters = Decimal::from(unique_clusters);
        let one = Decimal::ONE;

        let repetition_ratio = one - clusters / total;
        let avg_cluster_size = total / clusters;
        let size_bonus = (avg_cluster_size / Decimal::TEN).min(one);
        let type_bonus = (Decimal::from(category_variety) / Decimal::from(3)).min(one);

        let raw = (repetition_ratio * Decimal::new(6, 1)
            + size_bonus * Decimal::new(3, 1)
            + type_bonus * Decimal::new(1, 1))
            * Decimal::ONE_HUNDRED;
        let score = raw
            .max(Decimal::ZERO)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(1);

        StandardizationScore {
            score,
            grade: Some(Grade::from_score(score)),
            total_events,
            unique_clusters,
            avg_cluster_size: avg_cluster_size.round_dp(1),
            repetition_ratio_pct: (repetition_ratio * Decimal::ONE_HUNDRED).round_dp(1),
            category_variety,
        }
    }
}

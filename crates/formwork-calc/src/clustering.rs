//! 重複構件分群

use formwork_core::{Cluster, ClusterId, ClusterKey, ClusteredEvent, DerivedEvent};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// 分群結果
#[derive(Debug, Clone, Default)]
pub struct ClusteringOutcome {
    /// 每筆事件及其分群（保持輸入順序）
    pub events: Vec<ClusteredEvent>,

    /// 依分群編號排序的摘要
    pub clusters: Vec<Cluster>,
}

impl ClusteringOutcome {
    /// 構件ID → 分群編號
    pub fn assignments(&self) -> BTreeMap<&str, ClusterId> {
        self.events
            .iter()
            .map(|e| (e.event.id.as_str(), e.cluster_id))
            .collect()
    }
}

/// 分群計算器
pub struct ClusterCalculator;

impl ClusterCalculator {
    /// 依 `(類別, dim1, dim2, dim3)` 精確分群
    ///
    /// 依成員數遞減排序（穩定排序，同數量時保持首次出現順序），
    /// 編號自 1 開始。面積須已通過 `validate_events` 的量級檢查，
    /// 分群總面積不會溢位。
    pub fn cluster(derived: Vec<DerivedEvent>) -> ClusteringOutcome {
        let mut keys: Vec<ClusterKey> = Vec::new();
        let mut footprints: Vec<Decimal> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut index: HashMap<ClusterKey, usize> = HashMap::new();
        let mut slots = Vec::with_capacity(derived.len());

        for item in &derived {
            let key = ClusterKey::of(&item.event);
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    let slot = keys.len();
                    index.insert(key.clone(), slot);
                    keys.push(key);
                    footprints.push(item.footprint);
                    counts.push(0);
                    slot
                }
            };
            counts[slot] += 1;
            slots.push(slot);
        }

        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|a, b| counts[*b].cmp(&counts[*a]));

        let mut ids = vec![ClusterId(0); keys.len()];
        for (rank, &slot) in order.iter().enumerate() {
            ids[slot] = ClusterId(rank as u32 + 1);
        }

        let clusters = order
            .iter()
            .map(|&slot| Cluster {
                cluster_id: ids[slot],
                key: keys[slot].clone(),
                member_count: counts[slot],
                footprint: footprints[slot],
                total_footprint: footprints[slot] * Decimal::from(counts[slot]),
            })
            .collect();

        let events = derived
            .into_iter()
            .zip(slots)
            .map(|(item, slot)| ClusteredEvent {
                event: item.event,
                footprint: item.footprint,
                cluster_id: ids[slot],
            })
            .collect();

        ClusteringOutcome { events, clusters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use formwork_core::{Category, Event};

    fn derived(id: &str, category: Category, dim1: i64) -> DerivedEvent {
        DerivedEvent::new(Event::new(
            id.to_string(),
            category,
            (Decimal::from(dim1), Decimal::from(5), Decimal::new(2, 1)),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            Decimal::from(100),
        ))
        .unwrap()
    }

    #[test]
    fn test_rank_by_frequency() {
        let input = vec![
            derived("E-1", Category::Slab, 4),
            derived("E-2", Category::Slab, 5),
            derived("E-3", Category::Slab, 5),
            derived("E-4", Category::Column, 5),
        ];

        let outcome = ClusterCalculator::cluster(input);

        assert_eq!(outcome.clusters.len(), 3);
        assert_eq!(outcome.clusters[0].cluster_id, ClusterId(1));
        assert_eq!(outcome.clusters[0].member_count, 2);
        assert_eq!(outcome.clusters[0].key.dim1, Decimal::from(5));
        assert_eq!(outcome.clusters[0].total_footprint, Decimal::from(50));

        // 同數量時保持首次出現順序
        assert_eq!(outcome.clusters[1].key.dim1, Decimal::from(4));
        assert_eq!(outcome.clusters[2].key.category, Category::Column);

        let assignments = outcome.assignments();
        assert_eq!(assignments["E-1"], ClusterId(2));
        assert_eq!(assignments["E-2"], ClusterId(1));
        assert_eq!(assignments["E-3"], ClusterId(1));
        assert_eq!(assignments["E-4"], ClusterId(3));
    }

    #[test]
    fn test_events_keep_input_order() {
        let input = vec![
            derived("B", Category::Slab, 4),
            derived("A", Category::Slab, 5),
            derived("C", Category::Slab, 5),
        ];

        let outcome = ClusterCalculator::cluster(input);

        let ids: Vec<&str> = outcome.events.iter().map(|e| e.event.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_same_key_same_cluster_regardless_of_order() {
        let forward = vec![
            derived("E-1", Category::Slab, 5),
            derived("E-2", Category::Beam, 5),
            derived("E-3", Category::Slab, 5),
            derived("E-4", Category::Beam, 5),
            derived("E-5", Category::Slab, 5),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = ClusterCalculator::cluster(forward);
        let b = ClusterCalculator::cluster(reversed);

        assert_eq!(a.assignments(), b.assignments());
        assert_eq!(a.clusters, b.clusters);
    }

    #[test]
    fn test_empty() {
        let outcome = ClusterCalculator::cluster(Vec::new());
        assert!(outcome.events.is_empty());
        assert!(outcome.clusters.is_empty());
    }
}

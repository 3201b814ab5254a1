//! 模板規劃主流程

use formwork_core::{validate_events, Event, PlanConfig, PlanWarning};
use formwork_optimizer::UnitOptimizer;

use crate::area::AreaCalculator;
use crate::clustering::ClusterCalculator;
use crate::timeline::TimelineBuilder;
use crate::PlanReport;

/// 模板規劃器
pub struct FormworkPlanner {
    config: PlanConfig,
}

impl FormworkPlanner {
    /// 創建新的規劃器
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    /// 主規劃入口
    ///
    /// 面積 → 分群 → 最少套數 → 時間軸。相同輸入必得相同輸出；
    /// 配置或資料不合格時直接回傳錯誤，不產生部分結果。
    pub fn plan(&self, events: &[Event]) -> formwork_core::Result<PlanReport> {
        self.config.validate()?;
        validate_events(events)?;
        self.config.validate_horizon(events)?;

        tracing::info!(
            "開始模板規劃：構件 {} 筆，周轉 {} 天",
            events.len(),
            self.config.cooldown_days
        );

        let start_time = std::time::Instant::now();
        let mut warnings = Vec::new();

        // Step 1: 模板面積
        tracing::debug!("Step 1: 模板面積");
        let derived = AreaCalculator::derive(events)?;
        for (category, count) in AreaCalculator::unknown_categories(&derived) {
            warnings.push(PlanWarning::info(
                category.clone(),
                format!("無法辨識的類別 {category}（{count} 筆），模板面積計為 0"),
            ));
        }

        // Step 2: 分群
        tracing::debug!("Step 2: 重複構件分群");
        let clustering = ClusterCalculator::cluster(derived);
        tracing::debug!("分群數量: {}", clustering.clusters.len());

        // Step 3: 最少套數
        tracing::debug!("Step 3: 最少套數");
        let optimization = UnitOptimizer::optimize(&clustering.events, &self.config);
        warnings.extend(optimization.warnings);

        // Step 4: 時間軸
        tracing::debug!("Step 4: 使用時間軸");
        let timeline = TimelineBuilder::build(
            &clustering.events,
            &optimization.results,
            self.config.cooldown_days,
        )?;
        warnings.extend(timeline.warnings);

        let report = PlanReport {
            cooldown_days: self.config.cooldown_days,
            events: clustering.events,
            clusters: clustering.clusters,
            optimization: optimization.results,
            timeline: timeline.entries,
            warnings,
        };

        tracing::info!("模板規劃完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "採購套數: {}（不周轉: {}）",
            report.total_required_units(),
            report.total_naive_units()
        );

        Ok(report)
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }
}

/// 單次規劃的便利函式
pub fn run_plan(events: &[Event], config: &PlanConfig) -> formwork_core::Result<PlanReport> {
    FormworkPlanner::new(config.clone()).plan(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use formwork_core::{Category, ClusterId, FormworkError, WarningSeverity};
    use rust_decimal::Decimal;

    fn event(id: &str, category: &str, dim1: i64, day: u32) -> Event {
        Event::new(
            id.to_string(),
            Category::from(category),
            (Decimal::from(dim1), Decimal::from(5), Decimal::new(2, 1)),
            NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            Decimal::from(3500),
        )
    }

    #[test]
    fn test_plan_pipeline() {
        let events = vec![
            event("E-1", "Slab", 5, 1),
            event("E-2", "Slab", 5, 2),
            event("E-3", "Slab", 5, 9),
            event("E-4", "Slab", 4, 3),
        ];

        let report = run_plan(&events, &PlanConfig::new(7)).unwrap();

        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.optimization.len(), 2);
        assert_eq!(report.optimization[0].cluster_id, ClusterId(1));
        assert_eq!(report.optimization[0].required_units, 2);
        assert_eq!(report.optimization[1].required_units, 1);
        assert_eq!(report.total_required_units(), 3);
        assert_eq!(report.total_naive_units(), 4);
        assert!(report.timeline.iter().all(|e| e.available_count == 3));
        assert!(report.timeline.iter().all(|e| !e.is_overcommitted()));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unknown_category_warns() {
        let events = vec![event("E-1", "Wall", 5, 1)];
        let report = run_plan(&events, &PlanConfig::new(7)).unwrap();

        assert_eq!(report.events[0].footprint, Decimal::ZERO);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, WarningSeverity::Info);
        assert_eq!(report.optimization[0].required_units, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let events = vec![event("E-1", "Slab", 5, 1)];
        let err = run_plan(&events, &PlanConfig::new(0)).unwrap_err();
        assert!(matches!(err, FormworkError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_plan() {
        let report = run_plan(&[], &PlanConfig::new(7)).unwrap();

        assert!(report.events.is_empty());
        assert!(report.clusters.is_empty());
        assert!(report.optimization.is_empty());
        assert!(report.timeline.is_empty());
        assert_eq!(report.total_required_units(), 0);
    }

    #[test]
    fn test_single_day_horizon() {
        let events = vec![
            event("E-1", "Slab", 5, 1),
            event("E-2", "Slab", 5, 1),
            event("E-3", "Slab", 5, 1),
        ];

        let report = run_plan(&events, &PlanConfig::new(1)).unwrap();

        assert_eq!(report.optimization[0].required_units, 3);
        assert_eq!(report.optimization[0].naive_units, 3);
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].active_count, 3);
        assert_eq!(report.timeline[1].active_count, 0);
    }

    #[test]
    fn test_overflowing_cost_rejected_before_planning() {
        let mut first = event("E-1", "Slab", 5, 1);
        first.unit_cost = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        let mut second = event("E-2", "Slab", 5, 2);
        second.unit_cost = first.unit_cost;

        let err = run_plan(&[first, second], &PlanConfig::new(7)).unwrap_err();
        assert!(matches!(err, FormworkError::Overflow { .. }));
    }

    #[test]
    fn test_last_calendar_day_rejected() {
        let mut late = event("E-1", "Slab", 5, 1);
        late.occurrence_date = NaiveDate::MAX;

        let err = run_plan(&[late], &PlanConfig::new(7)).unwrap_err();
        assert!(matches!(err, FormworkError::InvalidHorizon(_)));
    }

    #[test]
    fn test_report_json_shape() {
        let events = vec![event("E-1", "Slab", 5, 1), event("E-2", "Beam", 5, 2)];
        let report = run_plan(&events, &PlanConfig::new(3)).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["cooldown_days"], 3);
        assert_eq!(value["clusters"][0]["cluster_id"], 1);
        assert_eq!(value["events"][1]["event"]["category"], "Beam");
        assert_eq!(value["timeline"][0]["date"], "2025-11-01");

        let restored: PlanReport = serde_json::from_value(value).unwrap();
        assert_eq!(restored, report);
    }
}

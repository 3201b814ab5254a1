//! 模板使用時間軸

use chrono::Duration;
use formwork_core::{
    ClusteredEvent, FormworkError, OptimizationResult, PlanWarning, Result, TimelineEntry,
};
use formwork_optimizer::{trailing_window_sums, DailyDemand};

/// 時間軸輸出
#[derive(Debug, Clone, Default)]
pub struct TimelineOutput {
    pub entries: Vec<TimelineEntry>,
    pub warnings: Vec<PlanWarning>,
}

/// 時間軸計算器
pub struct TimelineBuilder;

impl TimelineBuilder {
    /// 逐日重播：從最早澆置日到最晚澆置日 + 周轉天數
    ///
    /// `active_count` 為 `(d - cooldown, d]` 內的澆置數；
    /// `available_count` 為所有分組最少套數合計，整條時間軸固定。
    /// 結束日超出日期範圍時回傳錯誤。
    pub fn build(
        events: &[ClusteredEvent],
        results: &[OptimizationResult],
        cooldown_days: u32,
    ) -> Result<TimelineOutput> {
        let Some(demand) = DailyDemand::from_dates(events.iter().map(|e| e.event.occurrence_date))
        else {
            return Ok(TimelineOutput::default());
        };

        let available_count: u32 = results.iter().map(|r| r.required_units).sum();

        let mut pours = demand.pours;
        pours.extend(std::iter::repeat(0).take(cooldown_days as usize));
        let active = trailing_window_sums(&pours, cooldown_days);

        let entries = pours
            .iter()
            .zip(active)
            .enumerate()
            .map(|(offset, (&new_count, active_count))| {
                let date = demand
                    .start
                    .checked_add_signed(Duration::days(offset as i64))
                    .ok_or_else(|| {
                        FormworkError::InvalidHorizon(format!(
                            "{} 起第 {} 天超出日期範圍",
                            demand.start, offset
                        ))
                    })?;
                Ok(TimelineEntry {
                    date,
                    active_count,
                    available_count,
                    new_count,
                    reused_count: i64::from(active_count) - i64::from(new_count),
                })
            })
            .collect::<Result<Vec<TimelineEntry>>>()?;

        let warnings = Self::check(&entries);

        tracing::debug!(
            "時間軸 {} 天，可用套數 {}",
            entries.len(),
            available_count
        );

        Ok(TimelineOutput { entries, warnings })
    }

    /// 檢查超量使用與負的周轉數
    fn check(entries: &[TimelineEntry]) -> Vec<PlanWarning> {
        let mut warnings = Vec::new();

        let overcommitted: Vec<&TimelineEntry> =
            entries.iter().filter(|e| e.is_overcommitted()).collect();
        if let Some(first) = overcommitted.first() {
            warnings.push(PlanWarning::error(
                first.date.to_string(),
                format!(
                    "使用中套數超過採購套數：共 {} 天，首日使用 {} / 可用 {}",
                    overcommitted.len(),
                    first.active_count,
                    first.available_count
                ),
            ));
        }

        for entry in entries.iter().filter(|e| e.reused_count < 0) {
            warnings.push(PlanWarning::error(
                entry.date.to_string(),
                format!("周轉套數為負 ({})，輸入資料不一致", entry.reused_count),
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use formwork_core::{Category, ClusterId, Event};
    use rust_decimal::Decimal;

    fn clustered(id: &str, cluster: u32, day: u32) -> ClusteredEvent {
        let event = Event::new(
            id.to_string(),
            Category::Column,
            (Decimal::new(5, 1), Decimal::new(5, 1), Decimal::from(3)),
            NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            Decimal::from(1200),
        );
        ClusteredEvent {
            footprint: event.formwork_area().unwrap(),
            event,
            cluster_id: ClusterId(cluster),
        }
    }

    fn result(cluster: u32, required: u32, naive: u32) -> OptimizationResult {
        OptimizationResult::new(
            ClusterId(cluster),
            "All".to_string(),
            required,
            naive,
            Decimal::from(1200),
        )
    }

    #[test]
    fn test_timeline_span_and_counts() {
        let events = vec![
            clustered("E-1", 1, 1),
            clustered("E-2", 1, 2),
            clustered("E-3", 1, 9),
        ];
        let results = vec![result(1, 2, 3)];

        let output = TimelineBuilder::build(&events, &results, 7).unwrap();
        let entries = output.entries;

        // 11/01 ~ 11/16
        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(entries[15].date, NaiveDate::from_ymd_opt(2025, 11, 16).unwrap());
        assert!(entries.iter().all(|e| e.available_count == 2));

        let active: Vec<u32> = entries.iter().map(|e| e.active_count).collect();
        assert_eq!(active, vec![1, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 0]);

        assert_eq!(entries[1].new_count, 1);
        assert_eq!(entries[1].reused_count, 1);
        assert_eq!(entries[8].reused_count, 0);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_tail_releases_units() {
        let events = vec![clustered("E-1", 1, 1), clustered("E-2", 1, 1)];
        let output = TimelineBuilder::build(&events, &[result(1, 2, 2)], 3).unwrap();

        let active: Vec<u32> = output.entries.iter().map(|e| e.active_count).collect();
        assert_eq!(active, vec![2, 2, 2, 0]);
    }

    #[test]
    fn test_overcommit_flagged() {
        let events = vec![clustered("E-1", 1, 1), clustered("E-2", 1, 1)];
        let output = TimelineBuilder::build(&events, &[result(1, 1, 2)], 3).unwrap();

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(
            output.warnings[0].severity,
            formwork_core::WarningSeverity::Error
        );
    }

    #[test]
    fn test_empty_timeline() {
        let output = TimelineBuilder::build(&[], &[], 7).unwrap();
        assert!(output.entries.is_empty());
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_end_past_calendar_is_error() {
        let mut event = clustered("E-1", 1, 1);
        event.event.occurrence_date = NaiveDate::MAX;

        let err = TimelineBuilder::build(&[event], &[result(1, 1, 1)], 7).unwrap_err();
        assert!(matches!(err, FormworkError::InvalidHorizon(_)));
    }

    #[test]
    fn test_negative_reuse_flagged() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2025, 11, d).unwrap();
        let entries = vec![
            TimelineEntry {
                date: day(1),
                active_count: 2,
                available_count: 2,
                new_count: 2,
                reused_count: 0,
            },
            TimelineEntry {
                date: day(2),
                active_count: 1,
                available_count: 2,
                new_count: 2,
                reused_count: -1,
            },
        ];

        let warnings = TimelineBuilder::check(&entries);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, formwork_core::WarningSeverity::Error);
        assert_eq!(warnings[0].subject, "2025-11-02");
    }
}

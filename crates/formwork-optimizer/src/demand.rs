//! 每日澆置需求序列

use chrono::NaiveDate;

/// 連續的每日澆置數（首日到末日，無資料的日子補 0）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyDemand {
    /// 序列第一天
    pub start: NaiveDate,

    /// 每日澆置數，索引 0 = `start`
    pub pours: Vec<u32>,
}

impl DailyDemand {
    /// 從澆置日期建立序列；沒有日期時回傳 None
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let dates: Vec<NaiveDate> = dates.into_iter().collect();
        let start = *dates.iter().min()?;
        let end = *dates.iter().max()?;

        let span = (end - start).num_days() as usize + 1;
        let mut pours = vec![0u32; span];
        for date in dates {
            pours[(date - start).num_days() as usize] += 1;
        }

        Some(Self { start, pours })
    }

    /// 序列最後一天
    pub fn end(&self) -> NaiveDate {
        self.start + chrono::Duration::days(self.pours.len() as i64 - 1)
    }

    /// 澆置總數
    pub fn total(&self) -> u32 {
        self.pours.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.pours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pours.is_empty()
    }

    /// 每一天往前 `window` 天（含當日）的澆置合計
    pub fn window_sums(&self, window: u32) -> Vec<u32> {
        crate::window::trailing_window_sums(&self.pours, window)
    }
}

//! 澆置事件模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::{FormworkError, Result};

/// 構件類別
///
/// 名稱大小寫敏感；無法辨識的類別保留原字串（`Other`），
/// 其模板面積計為 0，而不是拒絕整批資料。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// 柱（四面模板）
    Column,
    /// 版（單面底模）
    Slab,
    /// 梁（兩側模 + 底模）
    Beam,
    /// 未知類別
    Other(String),
}

impl Category {
    /// 依類別公式計算模板接觸面積
    ///
    /// - 柱：`2 × (dim1 + dim2) × dim3`
    /// - 版：`dim1 × dim2`
    /// - 梁：`2 × (dim1 + dim3) × dim2`
    /// - 其他：`0`
    ///
    /// 結果超出 `Decimal` 範圍時回傳 `None`。
    pub fn formwork_area(&self, dim1: Decimal, dim2: Decimal, dim3: Decimal) -> Option<Decimal> {
        match self {
            Category::Column => dim1.checked_add(dim2)?.checked_mul(dim3)?.checked_mul(Decimal::TWO),
            Category::Slab => dim1.checked_mul(dim2),
            Category::Beam => dim1.checked_add(dim3)?.checked_mul(dim2)?.checked_mul(Decimal::TWO),
            Category::Other(_) => Some(Decimal::ZERO),
        }
    }

    /// 是否為已知類別
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Column => "Column",
            Category::Slab => "Slab",
            Category::Beam => "Beam",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Column" => Category::Column,
            "Slab" => Category::Slab,
            "Beam" => Category::Beam,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 澆置事件（一次澆置佔用一套模板）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// 構件ID
    pub id: String,

    /// 構件類別
    pub category: Category,

    /// 尺寸一（柱/版/梁：長）
    pub dim1: Decimal,

    /// 尺寸二（寬）
    pub dim2: Decimal,

    /// 尺寸三（高）
    pub dim3: Decimal,

    /// 樓層（僅供參考，不參與計算）
    pub floor: i32,

    /// 澆置日期
    pub occurrence_date: NaiveDate,

    /// 每套模板採購成本
    pub unit_cost: Decimal,

    /// 施工分區
    pub zone: Option<String>,

    /// 報廢後的重置成本（未設定時使用採購成本）
    pub replacement_cost: Option<Decimal>,
}

impl Event {
    /// 創建新的澆置事件
    pub fn new(
        id: String,
        category: Category,
        dims: (Decimal, Decimal, Decimal),
        occurrence_date: NaiveDate,
        unit_cost: Decimal,
    ) -> Self {
        Self {
            id,
            category,
            dim1: dims.0,
            dim2: dims.1,
            dim3: dims.2,
            floor: 0,
            occurrence_date,
            unit_cost,
            zone: None,
            replacement_cost: None,
        }
    }

    /// 建構器模式：設置樓層
    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = floor;
        self
    }

    /// 建構器模式：設置施工分區
    pub fn with_zone(mut self, zone: String) -> Self {
        self.zone = Some(zone);
        self
    }

    /// 建構器模式：設置重置成本
    pub fn with_replacement_cost(mut self, cost: Decimal) -> Self {
        self.replacement_cost = Some(cost);
        self
    }

    /// 模板接觸面積
    pub fn formwork_area(&self) -> Result<Decimal> {
        self.category
            .formwork_area(self.dim1, self.dim2, self.dim3)
            .ok_or_else(|| FormworkError::Overflow {
                id: self.id.clone(),
                column: "footprint".to_string(),
            })
    }

    /// 報廢重置成本
    pub fn effective_replacement_cost(&self) -> Decimal {
        self.replacement_cost.unwrap_or(self.unit_cost)
    }
}

/// 帶有衍生面積的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedEvent {
    pub event: Event,

    /// 模板接觸面積（m²）
    pub footprint: Decimal,
}

impl DerivedEvent {
    pub fn new(event: Event) -> Result<Self> {
        let footprint = event.formwork_area()?;
        Ok(Self { event, footprint })
    }
}

/// 驗證事件集合：ID 唯一、尺寸與成本非負、數值量級可計算
///
/// 任一筆不合格即整批拒絕。
pub fn validate_events(events: &[Event]) -> Result<()> {
    check_signs_and_ids(events)?;
    check_magnitudes(events)
}

/// 每筆面積與 `單套成本 + 重置成本` 乘上事件總數後仍須可表示
///
/// 分群面積、各組成本與報表合計都不超過這兩個上界。
fn check_magnitudes(events: &[Event]) -> Result<()> {
    let count = Decimal::from(events.len());

    for event in events {
        let overflow = |column: &str| FormworkError::Overflow {
            id: event.id.clone(),
            column: column.to_string(),
        };

        event
            .formwork_area()?
            .checked_mul(count)
            .ok_or_else(|| overflow("footprint"))?;

        event
            .unit_cost
            .checked_add(event.effective_replacement_cost())
            .and_then(|cost| cost.checked_mul(count))
            .ok_or_else(|| overflow("unit_cost"))?;
    }

    Ok(())
}

fn check_signs_and_ids(events: &[Event]) -> Result<()> {
    let mut seen = HashSet::with_capacity(events.len());

    for event in events {
        if !seen.insert(event.id.as_str()) {
            return Err(FormworkError::DuplicateId(event.id.clone()));
        }

        let fields = [
            ("dim1", Some(event.dim1)),
            ("dim2", Some(event.dim2)),
            ("dim3", Some(event.dim3)),
            ("unit_cost", Some(event.unit_cost)),
            ("replacement_cost", event.replacement_cost),
        ];
        for (column, value) in fields {
            if let Some(value) = value {
                if value.is_sign_negative() && !value.is_zero() {
                    return Err(FormworkError::NegativeValue {
                        id: event.id.clone(),
                        column: column.to_string(),
                        value,
                    });
                }
            }
        }
    }

    Ok(())
}

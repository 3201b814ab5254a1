//! 構件資料表匯入（CSV）

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::event::{validate_events, Category, Event};
use crate::{FormworkError, Result};

/// 欄位名稱與可接受的別名
const ID: &[&str] = &["id", "Element_ID"];
const CATEGORY: &[&str] = &["category", "Type"];
const DIM1: &[&str] = &["dim1", "Length"];
const DIM2: &[&str] = &["dim2", "Width"];
const DIM3: &[&str] = &["dim3", "Height"];
const FLOOR: &[&str] = &["floor", "Floor"];
const DATE: &[&str] = &["occurrence_date", "Casting_Date"];
const UNIT_COST: &[&str] = &["unit_cost", "Formwork_Cost_per_Set"];
const ZONE: &[&str] = &["zone", "Zone"];
const REPLACEMENT_COST: &[&str] = &["replacement_cost", "Replacement_Cost_per_Set"];

/// 欄位索引
struct ColumnMap {
    id: usize,
    category: usize,
    dim1: usize,
    dim2: usize,
    dim3: usize,
    floor: usize,
    date: usize,
    unit_cost: usize,
    zone: Option<usize>,
    replacement_cost: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h));
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| FormworkError::MissingColumn(names[0].to_string()))
        };

        Ok(Self {
            id: require(ID)?,
            category: require(CATEGORY)?,
            dim1: require(DIM1)?,
            dim2: require(DIM2)?,
            dim3: require(DIM3)?,
            floor: require(FLOOR)?,
            date: require(DATE)?,
            unit_cost: require(UNIT_COST)?,
            zone: find(ZONE),
            replacement_cost: find(REPLACEMENT_COST),
        })
    }
}

/// 構件資料讀取器
pub struct EventReader;

impl EventReader {
    /// 從檔案讀取
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<Event>> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// 從任意來源讀取（需含標題列）
    ///
    /// 任一列不合格即整批失敗，不回傳部分結果。
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Event>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = ColumnMap::resolve(reader.headers()?)?;

        let mut events = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2);
            events.push(Self::parse_record(&record, &columns, row)?);
        }

        validate_events(&events)?;
        tracing::debug!("匯入構件 {} 筆", events.len());

        Ok(events)
    }

    fn parse_record(record: &StringRecord, columns: &ColumnMap, row: u64) -> Result<Event> {
        let id = required(record, columns.id, ID[0], row)?.to_string();
        let category = Category::from(required(record, columns.category, CATEGORY[0], row)?);
        let dim1 = parse_decimal(record, columns.dim1, DIM1[0], row)?;
        let dim2 = parse_decimal(record, columns.dim2, DIM2[0], row)?;
        let dim3 = parse_decimal(record, columns.dim3, DIM3[0], row)?;

        let floor_raw = required(record, columns.floor, FLOOR[0], row)?;
        let floor = floor_raw
            .parse::<i32>()
            .map_err(|_| FormworkError::InvalidNumber {
                row,
                column: FLOOR[0].to_string(),
                value: floor_raw.to_string(),
            })?;

        let date_raw = required(record, columns.date, DATE[0], row)?;
        let occurrence_date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
            FormworkError::InvalidDate {
                row,
                column: DATE[0].to_string(),
                value: date_raw.to_string(),
            }
        })?;

        let unit_cost = parse_decimal(record, columns.unit_cost, UNIT_COST[0], row)?;

        let mut event = Event::new(id, category, (dim1, dim2, dim3), occurrence_date, unit_cost)
            .with_floor(floor);

        if let Some(zone) = optional(record, columns.zone) {
            event = event.with_zone(zone.to_string());
        }
        if let Some(index) = columns.replacement_cost {
            if optional(record, Some(index)).is_some() {
                let cost = parse_decimal(record, index, REPLACEMENT_COST[0], row)?;
                event = event.with_replacement_cost(cost);
            }
        }

        Ok(event)
    }
}

fn required<'a>(record: &'a StringRecord, index: usize, column: &str, row: u64) -> Result<&'a str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FormworkError::MissingValue {
            row,
            column: column.to_string(),
        }),
    }
}

fn optional(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .filter(|value| !value.is_empty())
}

fn parse_decimal(record: &StringRecord, index: usize, column: &str, row: u64) -> Result<Decimal> {
    let raw = required(record, index, column, row)?;
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| FormworkError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

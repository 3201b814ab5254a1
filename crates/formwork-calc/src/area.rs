//! 模板面積計算

use formwork_core::{Category, DerivedEvent, Event, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 模板面積計算器
pub struct AreaCalculator;

impl AreaCalculator {
    /// 為每筆事件計算模板接觸面積（順序與筆數不變）
    ///
    /// 任一筆面積溢位即回傳錯誤。
    pub fn derive(events: &[Event]) -> Result<Vec<DerivedEvent>> {
        events.iter().cloned().map(DerivedEvent::new).collect()
    }

    /// 依類別彙總面積（數量清單）
    pub fn totals_by_category(derived: &[DerivedEvent]) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for item in derived {
            *totals
                .entry(item.event.category.to_string())
                .or_insert(Decimal::ZERO) += item.footprint;
        }
        totals
    }

    /// 無法辨識的類別及其筆數（面積被計為 0）
    pub fn unknown_categories(derived: &[DerivedEvent]) -> BTreeMap<String, usize> {
        let mut unknown = BTreeMap::new();
        for item in derived {
            if let Category::Other(name) = &item.event.category {
                *unknown.entry(name.clone()).or_insert(0) += 1;
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use formwork_core::FormworkError;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn event(id: &str, category: &str, dims: (&str, &str, &str)) -> Event {
        Event::new(
            id.to_string(),
            Category::from(category),
            (dec(dims.0), dec(dims.1), dec(dims.2)),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            Decimal::from(100),
        )
    }

    #[rstest]
    #[case("Slab", ("5", "5", "0.2"), "25")]
    #[case("Column", ("0.5", "0.5", "3.0"), "6")]
    #[case("Beam", ("5", "0.3", "0.5"), "3.3")]
    #[case("Wall", ("5", "0.2", "3"), "0")]
    #[case("Slab", ("0", "5", "0.2"), "0")]
    fn test_derive_footprint(
        #[case] category: &str,
        #[case] dims: (&str, &str, &str),
        #[case] expected: &str,
    ) {
        let derived = AreaCalculator::derive(&[event("E-1", category, dims)]).unwrap();
        assert_eq!(derived[0].footprint, dec(expected));
    }

    #[test]
    fn test_derive_preserves_order() {
        let events = vec![
            event("E-1", "Slab", ("5", "5", "0.2")),
            event("E-2", "Column", ("0.5", "0.5", "3.0")),
            event("E-3", "Beam", ("5", "0.3", "0.5")),
        ];

        let derived = AreaCalculator::derive(&events).unwrap();

        let ids: Vec<&str> = derived.iter().map(|d| d.event.id.as_str()).collect();
        assert_eq!(ids, vec!["E-1", "E-2", "E-3"]);
    }

    #[test]
    fn test_derive_overflow_is_error() {
        let huge = "1000000000000000";
        let events = vec![
            event("E-1", "Slab", ("5", "5", "0.2")),
            event("E-2", "Column", (huge, huge, huge)),
        ];

        let err = AreaCalculator::derive(&events).unwrap_err();
        assert!(matches!(err, FormworkError::Overflow { ref id, .. } if id == "E-2"));
    }

    #[test]
    fn test_unknown_category_is_zero() {
        let events = vec![
            event("E-1", "Wall", ("5", "0.2", "3")),
            event("E-2", "wall", ("5", "0.2", "3")),
            event("E-3", "Wall", ("4", "0.2", "3")),
        ];

        let derived = AreaCalculator::derive(&events).unwrap();

        assert!(derived.iter().all(|d| d.footprint.is_zero()));
        let unknown = AreaCalculator::unknown_categories(&derived);
        assert_eq!(unknown.get("Wall"), Some(&2));
        assert_eq!(unknown.get("wall"), Some(&1));
    }

    #[test]
    fn test_totals_by_category() {
        let events = vec![
            event("E-1", "Slab", ("5", "5", "0.2")),
            event("E-2", "Slab", ("4", "4", "0.2")),
            event("E-3", "Column", ("0.5", "0.5", "3.0")),
        ];

        let totals =
            AreaCalculator::totals_by_category(&AreaCalculator::derive(&events).unwrap());

        assert_eq!(totals["Slab"], Decimal::from(41));
        assert_eq!(totals["Column"], Decimal::from(6));
    }
}

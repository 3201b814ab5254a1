//! 工地模板周轉規劃示例

use chrono::{Duration, NaiveDate};
use formwork::{run_plan, Category, Event, PlanConfig};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 模板周轉規劃示例 ===\n");

    let start = NaiveDate::from_ymd_opt(2025, 11, 1).ok_or("invalid date")?;

    // 三層樓，每層柱 4 支、版 2 片、梁 3 支，樓層間隔 5 天
    let mut events = Vec::new();
    for floor in 1..=3 {
        let date = start + Duration::days(i64::from(floor - 1) * 5);
        let zone = if floor % 2 == 1 { "Zone-A" } else { "Zone-B" };

        for n in 0..4 {
            events.push(
                Event::new(
                    format!("C-{floor}{n:02}"),
                    Category::Column,
                    (Decimal::new(5, 1), Decimal::new(5, 1), Decimal::from(3)),
                    date,
                    Decimal::from(1200),
                )
                .with_floor(floor)
                .with_zone(zone.to_string()),
            );
        }
        for n in 0..2 {
            events.push(
                Event::new(
                    format!("S-{floor}{n:02}"),
                    Category::Slab,
                    (Decimal::from(5), Decimal::from(5), Decimal::new(2, 1)),
                    date + Duration::days(1),
                    Decimal::from(3500),
                )
                .with_floor(floor)
                .with_zone(zone.to_string()),
            );
        }
        for n in 0..3 {
            events.push(
                Event::new(
                    format!("B-{floor}{n:02}"),
                    Category::Beam,
                    (Decimal::from(5), Decimal::new(3, 1), Decimal::new(5, 1)),
                    date + Duration::days(1),
                    Decimal::from(1800),
                )
                .with_floor(floor)
                .with_zone(zone.to_string()),
            );
        }
    }

    let config = PlanConfig::new(7);
    println!("構件: {} 筆，周轉天數: {}\n", events.len(), config.cooldown_days);

    let report = run_plan(&events, &config)?;

    println!("分群:");
    for cluster in &report.clusters {
        println!(
            "  - {}: {}，{} 次澆置，面積 {} m²",
            cluster.cluster_id, cluster.key, cluster.member_count, cluster.footprint
        );
    }

    println!("\n最少套數:");
    for result in &report.optimization {
        println!(
            "  - {}: 需 {} 套（不周轉 {} 套），省下 {}",
            result.cluster_id, result.required_units, result.naive_units, result.cost_savings
        );
    }

    println!(
        "\n總成本: {} / 不周轉 {}",
        report.total_optimized_cost(),
        report.total_naive_cost()
    );

    if let Some(peak) = report.timeline.iter().max_by_key(|e| e.active_count) {
        println!(
            "使用高峰: {} 套於 {}（可用 {} 套）",
            peak.active_count, peak.date, peak.available_count
        );
    }

    Ok(())
}

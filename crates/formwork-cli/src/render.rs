//! 文字報表輸出

use formwork_calc::ProcurementStatus;
use formwork_core::{TimelineEntry, WarningSeverity};

use crate::plan::PlanOutput;

pub fn print_plan(output: &PlanOutput<'_>, full_timeline: bool) {
    let report = output.report;

    println!("=== 模板周轉規劃（周轉 {} 天）===\n", report.cooldown_days);

    println!("分群 ({}):", report.clusters.len());
    for cluster in &report.clusters {
        println!(
            "  {}  {:<28} x{:<4} 面積 {} m²",
            cluster.cluster_id,
            cluster.key.to_string(),
            cluster.member_count,
            cluster.footprint.normalize()
        );
    }

    println!("\n最少套數:");
    for result in &report.optimization {
        println!(
            "  {} [{}]  需 {:>3} 套 / 不周轉 {:>3} 套  成本 {} (省 {}，{}%)",
            result.cluster_id,
            result.zone,
            result.required_units,
            result.naive_units,
            result.optimized_cost.normalize(),
            result.cost_savings.normalize(),
            result.cost_reduction_pct.round_dp(1)
        );
        if result.units_written_off > 0 {
            println!(
                "      報廢 {} 套，重置成本 {}，總成本 {}",
                result.units_written_off,
                result.write_off_cost.normalize(),
                result.true_total_cost.normalize()
            );
        }
    }
    println!(
        "  合計: {} 套（不周轉 {} 套），採購成本 {} / {}",
        report.total_required_units(),
        report.total_naive_units(),
        report.total_optimized_cost().normalize(),
        report.total_naive_cost().normalize()
    );

    println!("\n模板面積:");
    for (category, area) in &output.area_by_category {
        println!("  {:<10} {} m²", category, area.normalize());
    }

    print_timeline(&report.timeline, full_timeline);

    println!("\n套件 ({}):", output.kit_summary.len());
    for kit in &output.kit_summary {
        println!(
            "  {:<14} 使用 {:>3} 次  {} ~ {}  周轉效率 {}%",
            kit.kit_id, kit.total_uses, kit.first_use, kit.last_use, kit.reuse_efficiency_pct
        );
    }

    let score = &output.standardization;
    match score.grade {
        Some(grade) => println!("\n標準化評分: {} ({})", score.score, grade),
        None => println!("\n標準化評分: N/A"),
    }

    println!("\n採購排程:");
    for line in &output.procurement {
        let status = match line.status {
            ProcurementStatus::Urgent => "URGENT",
            ProcurementStatus::OrderSoon => "ORDER SOON",
            ProcurementStatus::Planned => "PLANNED",
        };
        println!(
            "  {:<10} {} [{}]  {} 套  最晚下單 {}（首次澆置 {}）",
            status,
            line.cluster_id,
            line.zone,
            line.units_to_order,
            line.order_by_date,
            line.first_pour_date
        );
    }

    if !report.warnings.is_empty() {
        println!("\n警告:");
        for warning in &report.warnings {
            let level = match warning.severity {
                WarningSeverity::Info => "info",
                WarningSeverity::Warning => "warn",
                WarningSeverity::Error => "error",
            };
            println!("  [{}] {}: {}", level, warning.subject, warning.message);
        }
    }
}

fn print_timeline(timeline: &[TimelineEntry], full: bool) {
    let Some(peak) = timeline.iter().max_by_key(|e| e.active_count) else {
        return;
    };

    println!(
        "\n時間軸: {} ~ {}（{} 天），峰值 {} 套於 {}，可用 {} 套",
        timeline[0].date,
        timeline[timeline.len() - 1].date,
        timeline.len(),
        peak.active_count,
        peak.date,
        peak.available_count
    );

    if full {
        for entry in timeline {
            println!(
                "  {}  使用 {:>3}  新澆置 {:>3}  周轉 {:>3}  可用 {:>3}",
                entry.date,
                entry.active_count,
                entry.new_count,
                entry.reused_count,
                entry.available_count
            );
        }
    }
}

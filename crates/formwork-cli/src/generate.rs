//! 合成構件資料

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use clap::Args;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output CSV path.
    pub output: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of distinct elements before the high-repeat tail.
    #[arg(long, default_value_t = 400)]
    pub count: usize,

    /// Rows resampled from the base set to densify clusters.
    #[arg(long, default_value_t = 100)]
    pub repeats: usize,

    /// First casting date (defaults to today).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Casting dates fall within this many days of the start.
    #[arg(long, default_value_t = 45)]
    pub horizon_days: u32,
}

/// 各類別的尺寸樣板（單位：公分）與單套成本
const COLUMN_PRESETS: [(i64, i64, i64); 4] = [(50, 50, 300), (60, 60, 300), (40, 40, 300), (80, 80, 350)];
const SLAB_PRESETS: [(i64, i64, i64); 4] = [(500, 500, 20), (400, 400, 20), (600, 600, 20), (800, 500, 25)];
const BEAM_PRESETS: [(i64, i64, i64); 4] = [(500, 30, 50), (400, 30, 50), (600, 40, 60), (700, 50, 70)];
const ZONES: [&str; 3] = ["Zone-A", "Zone-B", "Zone-C"];

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRow {
    pub id: String,
    pub category: &'static str,
    pub dim1: Decimal,
    pub dim2: Decimal,
    pub dim3: Decimal,
    pub floor: i32,
    pub zone: &'static str,
    pub occurrence_date: NaiveDate,
    pub unit_cost: Decimal,
    pub replacement_cost: Decimal,
}

pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let start = args
        .start
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    if start
        .checked_add_signed(Duration::days(i64::from(args.horizon_days)))
        .is_none()
    {
        anyhow::bail!("{} 加上 {} 天超出日期範圍", start, args.horizon_days);
    }
    let rows = generate_rows(args.seed, args.count, args.repeats, start, args.horizon_days);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("無法寫入 {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("已產生 {} 筆構件資料: {}", rows.len(), args.output.display());
    println!("{} rows written to {}", rows.len(), args.output.display());

    Ok(())
}

/// 產生構件資料；相同種子得到相同結果
pub fn generate_rows(
    seed: u64,
    count: usize,
    repeats: usize,
    start: NaiveDate,
    horizon_days: u32,
) -> Vec<GeneratedRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(count + repeats);

    for _ in 0..count {
        let (category, presets, cost) = match rng.gen_range(0..3) {
            0 => ("Column", &COLUMN_PRESETS, 1200),
            1 => ("Slab", &SLAB_PRESETS, 3500),
            _ => ("Beam", &BEAM_PRESETS, 1800),
        };
        let &(l, w, h) = presets.choose(&mut rng).unwrap_or(&presets[0]);
        let unit_cost = Decimal::from(cost);

        rows.push(GeneratedRow {
            id: String::new(),
            category,
            dim1: Decimal::new(l, 2).normalize(),
            dim2: Decimal::new(w, 2).normalize(),
            dim3: Decimal::new(h, 2).normalize(),
            floor: rng.gen_range(1..=15),
            zone: ZONES[rng.gen_range(0..ZONES.len())],
            occurrence_date: start + Duration::days(rng.gen_range(0..=i64::from(horizon_days))),
            unit_cost,
            replacement_cost: (unit_cost * Decimal::new(85, 2)).round(),
        });
    }

    if !rows.is_empty() {
        for _ in 0..repeats {
            let sample = rows[rng.gen_range(0..count)].clone();
            rows.push(sample);
        }
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.id = format!("E-{:03}", index + 1);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::EventReader;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = generate_rows(42, 50, 10, start(), 45);
        let b = generate_rows(42, 50, 10, start(), 45);

        assert_eq!(a.len(), 60);
        assert_eq!(
            a.iter().map(|r| (r.category, r.occurrence_date)).collect::<Vec<_>>(),
            b.iter().map(|r| (r.category, r.occurrence_date)).collect::<Vec<_>>()
        );
        assert_eq!(a[59].id, "E-060");
    }

    #[test]
    fn test_dates_within_horizon() {
        let rows = generate_rows(7, 200, 0, start(), 10);
        let end = start() + Duration::days(10);
        assert!(rows
            .iter()
            .all(|r| r.occurrence_date >= start() && r.occurrence_date <= end));
    }

    #[test]
    fn test_generated_file_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.csv");
        let args = GenerateArgs {
            output: path.clone(),
            seed: 42,
            count: 30,
            repeats: 5,
            start: Some(start()),
            horizon_days: 20,
        };

        run_generate(&args).unwrap();
        let events = EventReader::from_path(&path).unwrap();

        assert_eq!(events.len(), 35);
        assert!(events.iter().all(|e| e.category.is_known()));
        assert!(events.iter().all(|e| e.zone.is_some()));
        assert!(events.iter().all(|e| {
            e.replacement_cost == Some((e.unit_cost * Decimal::new(85, 2)).round())
        }));
    }

    #[test]
    fn test_zero_count() {
        assert!(generate_rows(1, 0, 10, start(), 45).is_empty());
    }
}

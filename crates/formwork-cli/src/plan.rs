use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use formwork_calc::{
    AreaCalculator, FormworkPlanner, KitAssignment, KitPlanner, KitSummary, PlanReport,
    ProcurementLine, ProcurementScheduler, StandardizationScore,
};
use formwork_core::{DerivedEvent, EventReader, PlanConfig, SolverStrategy};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::render;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Events table (CSV with header row).
    pub input: PathBuf,

    /// TOML file with planning parameters; flags override it.
    #[arg(long, env = "FORMWORK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Days a set stays locked after a pour.
    #[arg(long)]
    pub cooldown: Option<u32>,

    /// Maximum uses per set before write-off.
    #[arg(long)]
    pub max_reuse: Option<u32>,

    /// Solve each construction zone separately.
    #[arg(long)]
    pub by_zone: bool,

    /// Solver used for the minimal set count.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Supplier lead time in days.
    #[arg(long, default_value_t = 5)]
    pub lead_time: u32,

    /// Reference date for procurement status (defaults to today).
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Print every timeline day instead of a summary.
    #[arg(long)]
    pub full_timeline: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    SlidingWindow,
    ConstraintModel,
}

impl From<StrategyArg> for SolverStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::SlidingWindow => SolverStrategy::SlidingWindow,
            StrategyArg::ConstraintModel => SolverStrategy::ConstraintModel,
        }
    }
}

/// JSON 輸出
#[derive(Debug, Serialize)]
pub struct PlanOutput<'a> {
    pub config: &'a PlanConfig,
    pub report: &'a PlanReport,
    pub area_by_category: BTreeMap<String, Decimal>,
    pub kits: Vec<KitAssignment>,
    pub kit_summary: Vec<KitSummary>,
    pub standardization: StandardizationScore,
    pub procurement: Vec<ProcurementLine>,
}

pub fn run_plan(args: &PlanArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let events = EventReader::from_path(&args.input)
        .with_context(|| format!("無法讀取構件資料 {}", args.input.display()))?;

    let report = FormworkPlanner::new(config.clone()).plan(&events)?;

    let derived: Vec<DerivedEvent> = report
        .events
        .iter()
        .map(|e| DerivedEvent {
            event: e.event.clone(),
            footprint: e.footprint,
        })
        .collect();
    let kits = KitPlanner::assign(&report.events, config.cooldown_days);
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let output = PlanOutput {
        config: &config,
        report: &report,
        area_by_category: AreaCalculator::totals_by_category(&derived),
        kit_summary: KitPlanner::summarize(&kits),
        kits,
        standardization: KitPlanner::standardization_score(&report.events),
        procurement: ProcurementScheduler::schedule(
            &report.optimization,
            &report.events,
            config.split_by_zone,
            args.lead_time,
            today,
        ),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::print_plan(&output, args.full_timeline);
    }

    Ok(())
}

/// 讀取配置檔並套用命令列參數
pub fn load_config(args: &PlanArgs) -> anyhow::Result<PlanConfig> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => PlanConfig::default(),
    };

    if let Some(cooldown) = args.cooldown {
        config.cooldown_days = cooldown;
    }
    if let Some(max_reuse) = args.max_reuse {
        config.max_reuse_count = Some(max_reuse);
    }
    if args.by_zone {
        config.split_by_zone = true;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }

    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> anyhow::Result<PlanConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("無法讀取配置檔 {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("配置檔格式錯誤 {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: Option<PathBuf>) -> PlanArgs {
        PlanArgs {
            input: PathBuf::from("elements.csv"),
            config,
            cooldown: None,
            max_reuse: None,
            by_zone: false,
            strategy: None,
            lead_time: 5,
            today: None,
            full_timeline: false,
            json: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = load_config(&args(None)).unwrap();
        assert_eq!(config, PlanConfig::default());
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "cooldown_days = 10\nmax_reuse_count = 8\nstrategy = \"constraint_model\""
        )
        .unwrap();

        let mut plan_args = args(Some(file.path().to_path_buf()));
        plan_args.cooldown = Some(14);
        plan_args.by_zone = true;

        let config = load_config(&plan_args).unwrap();

        assert_eq!(config.cooldown_days, 14);
        assert_eq!(config.max_reuse_count, Some(8));
        assert!(config.split_by_zone);
        assert_eq!(config.strategy, SolverStrategy::ConstraintModel);
    }

    #[test]
    fn test_invalid_cooldown_rejected() {
        let mut plan_args = args(None);
        plan_args.cooldown = Some(0);
        assert!(load_config(&plan_args).is_err());
    }

    #[test]
    fn test_run_plan_on_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "id,category,dim1,dim2,dim3,floor,occurrence_date,unit_cost\n\
             E-001,Slab,5,5,0.2,1,2025-11-01,3500\n\
             E-002,Slab,5,5,0.2,1,2025-11-02,3500"
        )
        .unwrap();

        let mut plan_args = args(None);
        plan_args.input = file.path().to_path_buf();
        plan_args.json = true;
        plan_args.today = NaiveDate::from_ymd_opt(2025, 10, 1);

        assert!(run_plan(&plan_args).is_ok());
    }

    #[test]
    fn test_run_plan_rejects_invalid_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "id,category,dim1,dim2,dim3,floor,occurrence_date,unit_cost\n\
             E-001,Slab,5,5,0.2,1,2025-11-01,3500\n\
             E-002,Slab,5,5,0.2,1,2025-13-40,3500"
        )
        .unwrap();

        let mut plan_args = args(None);
        plan_args.input = file.path().to_path_buf();
        plan_args.json = true;

        let err = run_plan(&plan_args).unwrap_err();
        let root = err.downcast_ref::<formwork_core::FormworkError>().unwrap();
        assert!(matches!(
            root,
            formwork_core::FormworkError::InvalidDate { row: 3, .. }
        ));
    }

    #[test]
    fn test_cooldown_above_limit_rejected() {
        let mut plan_args = args(None);
        plan_args.cooldown = Some(formwork_core::MAX_COOLDOWN_DAYS + 1);
        assert!(load_config(&plan_args).is_err());
    }
}

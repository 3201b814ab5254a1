//! # Formwork Core
//!
//! 核心資料模型與類型定義

pub mod cluster;
pub mod config;
pub mod event;
pub mod import;
pub mod plan;

// Re-export 主要類型
pub use cluster::{Cluster, ClusterId, ClusterKey, ClusteredEvent};
pub use config::{PlanConfig, SolverStrategy, MAX_COOLDOWN_DAYS, MAX_HORIZON_DAYS};
pub use event::{validate_events, Category, DerivedEvent, Event};
pub use import::EventReader;
pub use plan::{OptimizationResult, PlanWarning, TimelineEntry, WarningSeverity};

/// 模板規劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum FormworkError {
    #[error("讀取檔案失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("缺少必要欄位: {0}")]
    MissingColumn(String),

    #[error("第 {row} 行欄位 {column} 為空")]
    MissingValue { row: u64, column: String },

    #[error("第 {row} 行欄位 {column} 不是有效數值: {value}")]
    InvalidNumber {
        row: u64,
        column: String,
        value: String,
    },

    #[error("第 {row} 行欄位 {column} 不是有效日期: {value}")]
    InvalidDate {
        row: u64,
        column: String,
        value: String,
    },

    #[error("構件 {id} 的 {column} 不可為負數: {value}")]
    NegativeValue {
        id: String,
        column: String,
        value: rust_decimal::Decimal,
    },

    #[error("構件編號重複: {0}")]
    DuplicateId(String),

    #[error("構件 {id} 的 {column} 數值過大，計算溢位")]
    Overflow { id: String, column: String },

    #[error("規劃期間超出範圍: {0}")]
    InvalidHorizon(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FormworkError>;

//! # Formwork
//!
//! 模板周轉與採購規劃：面積計算、重複構件分群、最少套數、使用時間軸。

pub use formwork_calc as calc;
pub use formwork_core as model;
pub use formwork_optimizer as optimizer;

pub use formwork_calc::{run_plan, FormworkPlanner, PlanReport};
pub use formwork_core::{Category, Event, EventReader, FormworkError, PlanConfig, Result};

//! # 多次治疗排程模块
//!
//! 将疗程和套餐的选择展开为具体的治疗场次，包括：
//! - 间隔解析：把 "15 dias" 之类的描述转换为天数
//! - 场次模板展开：按次数、时长和间隔生成有序的场次模板
//! - 状态合并：在重新展开后保留用户已编辑的场次
//! - 时间计算：结束时间与按自然日推算的开始时间
//! - 自动传播：第一次场次定下日期后，推算同组其余场次

pub mod defaults;
pub mod engine;
pub mod interval;
pub mod propagation;
pub mod selection;
pub mod state;
pub mod temporal;
pub mod template;

// 重新导出主要类型
pub use defaults::SchedulingDefaults;
pub use engine::{validate_schedule, ScheduleOverview, SessionScheduler};
pub use interval::parse_interval_days;
pub use propagation::propagate;
pub use selection::Catalog;
pub use state::{
    materialize, related_sessions, retain_current, update_field, SessionState, SessionUpdate,
};
pub use temporal::{add_days, compute_end, format_local, parse_local};
pub use template::{SessionGroup, SessionKey, SessionTemplate, SourceType};

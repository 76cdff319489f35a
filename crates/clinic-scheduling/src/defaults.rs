//! 排程默认值

use serde::{Deserialize, Serialize};

/// 目录数据缺失时使用的默认值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulingDefaults {
    /// 未配置间隔时使用的描述
    pub interval_text: String,
    /// 间隔描述无法解析时的天数
    pub interval_days: u32,
    /// 单次时长（分钟）
    pub session_minutes: u32,
    /// 套餐项目无任何名称时的显示名
    pub session_label: String,
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            interval_text: "7 dias".to_string(),
            interval_days: 7,
            session_minutes: 60,
            session_label: "Session".to_string(),
        }
    }
}

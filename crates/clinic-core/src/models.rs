//! 核心数据模型定义
//!
//! 疗程与套餐均由外部目录维护，此处只作为只读输入。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 疗程的多次治疗建议
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionPolicy {
    pub recommended_count: Option<u32>,         // 建议次数
    pub estimated_session_minutes: Option<u32>, // 单次时长（分钟）
    pub interval: Option<String>,               // 间隔描述，如 "15 dias"
}

/// 疗程（治疗项目）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcedureRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub session_policy: Option<SessionPolicy>,
    /// 未配置单次时长时使用的整体预估时长
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
}

/// 套餐中的一个项目
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageItem {
    pub order: Option<u32>,
    pub sessions_count: u32,
    pub session_duration_minutes: Option<u32>,
    pub recommended_interval: Option<String>,
    pub procedure_id: Option<Uuid>,
    pub manual_name: Option<String>, // 手工填写的名称，优先级最高
    pub name: Option<String>,
}

/// 治疗套餐
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub items: Vec<PackageItem>,
}

/// 当前选择：套餐与疗程均按选择顺序排列，调用方负责去重
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    #[serde(default)]
    pub package_ids: Vec<Uuid>,
    #[serde(default)]
    pub procedure_ids: Vec<Uuid>,
}

impl Selection {
    pub fn new(package_ids: Vec<Uuid>, procedure_ids: Vec<Uuid>) -> Self {
        Self {
            package_ids,
            procedure_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.package_ids.is_empty() && self.procedure_ids.is_empty()
    }
}

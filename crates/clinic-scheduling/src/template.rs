//! 场次模板
//!
//! 场次模板是由疗程或套餐推导出的无状态描述，每次选择变化时整体重新生成，
//! 身份仅由确定性的 [`SessionKey`] 决定。

use crate::defaults::SchedulingDefaults;
use crate::interval::parse_interval_days_or;
use clinic_core::utils::{first_non_empty, positive_or};
use clinic_core::{PackageItem, PackageRef, ProcedureRef};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// 场次来源类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Package,   // 套餐
    Procedure, // 单个疗程
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Package => write!(f, "package"),
            SourceType::Procedure => write!(f, "procedure"),
        }
    }
}

/// 场次分组：来源类型与来源ID相同的场次属于同一组
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionGroup {
    pub source_type: SourceType,
    pub source_id: Uuid,
}

/// 场次复合键
///
/// 字符串形式只在序列化边界使用：
/// `package-{id}-{item}-{n}` 或 `procedure-{id}-{n}`，其中 `n` 从 0 开始。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub source_type: SourceType,
    pub source_id: Uuid,
    pub item_index: u32,     // 套餐项目序号，疗程固定为 0
    pub session_number: u32, // 从 1 开始
}

impl SessionKey {
    pub fn package(package_id: Uuid, item_index: u32, session_number: u32) -> Self {
        Self {
            source_type: SourceType::Package,
            source_id: package_id,
            item_index,
            session_number,
        }
    }

    pub fn procedure(procedure_id: Uuid, session_number: u32) -> Self {
        Self {
            source_type: SourceType::Procedure,
            source_id: procedure_id,
            item_index: 0,
            session_number,
        }
    }

    pub fn group(&self) -> SessionGroup {
        SessionGroup {
            source_type: self.source_type,
            source_id: self.source_id,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.session_number.saturating_sub(1);
        match self.source_type {
            SourceType::Package => write!(
                f,
                "package-{}-{}-{}",
                self.source_id, self.item_index, index
            ),
            SourceType::Procedure => write!(f, "procedure-{}-{}", self.source_id, index),
        }
    }
}

/// 场次模板
///
/// 序列化时额外输出字符串形式的 `id` 与 `session_number`，二者均由 `key`
/// 推导；反序列化只读取 `key`。
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionTemplate {
    pub key: SessionKey,
    pub item_id: Option<u32>, // 套餐项目序号（如有）
    pub total_sessions: u32,
    pub duration_minutes: u32,
    pub interval_text: String,
    pub interval_days: u32,
    pub display_name: String,
}

impl SessionTemplate {
    pub fn source_type(&self) -> SourceType {
        self.key.source_type
    }

    pub fn source_id(&self) -> Uuid {
        self.key.source_id
    }

    pub fn group(&self) -> SessionGroup {
        self.key.group()
    }

    pub fn session_number(&self) -> u32 {
        self.key.session_number
    }
}

/// 序列化视图
#[derive(Serialize)]
struct TemplateRecord<'a> {
    id: String,
    key: &'a SessionKey,
    item_id: Option<u32>,
    session_number: u32,
    total_sessions: u32,
    duration_minutes: u32,
    interval_text: &'a str,
    interval_days: u32,
    display_name: &'a str,
}

impl Serialize for SessionTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TemplateRecord {
            id: self.key.to_string(),
            key: &self.key,
            item_id: self.item_id,
            session_number: self.session_number(),
            total_sessions: self.total_sessions,
            duration_minutes: self.duration_minutes,
            interval_text: &self.interval_text,
            interval_days: self.interval_days,
            display_name: &self.display_name,
        }
        .serialize(serializer)
    }
}

/// 展开套餐：按项目顺序，每个项目重复 `sessions_count` 次
pub fn expand_package(
    package: &PackageRef,
    procedures: &HashMap<Uuid, ProcedureRef>,
    defaults: &SchedulingDefaults,
) -> Vec<SessionTemplate> {
    let capacity: usize = package.items.iter().map(|item| item.sessions_count as usize).sum();
    let mut templates = Vec::with_capacity(capacity);

    for item in &package.items {
        let item_index = item.order.unwrap_or(0);
        let duration_minutes = positive_or(item.session_duration_minutes, defaults.session_minutes);
        let interval_text = first_non_empty([item.recommended_interval.as_deref()])
            .unwrap_or(&defaults.interval_text)
            .to_string();
        let interval_days = parse_interval_days_or(&interval_text, defaults.interval_days);
        let display_name = resolve_item_name(item, procedures, defaults);

        for index in 0..item.sessions_count {
            let session_number = index + 1;
            templates.push(SessionTemplate {
                key: SessionKey::package(package.id, item_index, session_number),
                item_id: item.order,
                total_sessions: item.sessions_count,
                duration_minutes,
                interval_text: interval_text.clone(),
                interval_days,
                display_name: display_name.clone(),
            });
        }
    }

    tracing::debug!(
        "Expanded package {} into {} session templates",
        package.id,
        templates.len()
    );
    templates
}

/// 展开疗程：按建议次数生成场次
pub fn expand_procedure(
    procedure: &ProcedureRef,
    defaults: &SchedulingDefaults,
) -> Vec<SessionTemplate> {
    let policy = procedure.session_policy.clone().unwrap_or_default();

    let session_count = positive_or(policy.recommended_count, 1);
    let duration_minutes = positive_or(
        policy
            .estimated_session_minutes
            .filter(|minutes| *minutes > 0)
            .or(procedure.estimated_duration_minutes),
        defaults.session_minutes,
    );
    let interval_text = first_non_empty([policy.interval.as_deref()])
        .unwrap_or(&defaults.interval_text)
        .to_string();
    let interval_days = parse_interval_days_or(&interval_text, defaults.interval_days);

    let templates: Vec<SessionTemplate> = (1..=session_count)
        .map(|session_number| SessionTemplate {
            key: SessionKey::procedure(procedure.id, session_number),
            item_id: None,
            total_sessions: session_count,
            duration_minutes,
            interval_text: interval_text.clone(),
            interval_days,
            display_name: procedure.name.clone(),
        })
        .collect();

    tracing::debug!(
        "Expanded procedure {} into {} session templates",
        procedure.id,
        templates.len()
    );
    templates
}

/// 名称优先级：手工名称 → 关联疗程名称 → 项目名称 → 默认标签
fn resolve_item_name(
    item: &PackageItem,
    procedures: &HashMap<Uuid, ProcedureRef>,
    defaults: &SchedulingDefaults,
) -> String {
    let procedure_name = item
        .procedure_id
        .and_then(|id| procedures.get(&id))
        .map(|procedure| procedure.name.as_str());

    first_non_empty([item.manual_name.as_deref(), procedure_name, item.name.as_deref()])
        .unwrap_or(&defaults.session_label)
        .to_string()
}

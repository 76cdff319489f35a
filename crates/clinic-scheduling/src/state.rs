//! 场次状态合并
//!
//! 场次状态由调用方（预约表单）持有。每个函数按值接收集合并返回新的集合，
//! 用户已编辑的场次在重新展开后保持不变。

use crate::template::{SessionGroup, SessionKey, SessionTemplate};
use crate::temporal::parse_local;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 场次状态：模板字段加上可编辑的开始与结束时间
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    #[serde(flatten)]
    pub template: SessionTemplate,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl SessionState {
    /// 从模板创建未排期的场次
    pub fn from_template(template: &SessionTemplate) -> Self {
        Self {
            template: template.clone(),
            start: String::new(),
            end: String::new(),
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.template.key
    }

    pub fn group(&self) -> SessionGroup {
        self.template.group()
    }

    pub fn session_number(&self) -> u32 {
        self.template.session_number()
    }

    pub fn start_at(&self) -> Option<NaiveDateTime> {
        parse_local(&self.start)
    }

    pub fn end_at(&self) -> Option<NaiveDateTime> {
        parse_local(&self.end)
    }

    /// 开始时间非空即视为已排期
    pub fn is_scheduled(&self) -> bool {
        !self.start.trim().is_empty()
    }
}

/// 单个字段的更新
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SessionUpdate {
    Start(String),
    End(String),
    DurationMinutes(u32),
    IntervalDays(u32),
    DisplayName(String),
}

impl SessionUpdate {
    /// 应用到场次，其余字段保持不变
    pub fn apply_to(self, session: &mut SessionState) {
        match self {
            SessionUpdate::Start(start) => session.start = start,
            SessionUpdate::End(end) => session.end = end,
            SessionUpdate::DurationMinutes(minutes) => session.template.duration_minutes = minutes,
            SessionUpdate::IntervalDays(days) => session.template.interval_days = days,
            SessionUpdate::DisplayName(name) => session.template.display_name = name,
        }
    }
}

/// 为尚未存在的模板补齐场次状态
///
/// 仅追加：已有条目保持原位置，新条目按模板顺序追加在末尾，
/// 不再属于当前选择的条目也不会被移除（见 [`retain_current`]）。
pub fn materialize(
    mut current: Vec<SessionState>,
    templates: &[SessionTemplate],
) -> Vec<SessionState> {
    let mut present: HashSet<SessionKey> = current.iter().map(|s| *s.key()).collect();
    let before = current.len();

    for template in templates {
        if present.insert(template.key) {
            current.push(SessionState::from_template(template));
        }
    }

    tracing::debug!(
        "Materialized {} new sessions ({} total)",
        current.len() - before,
        current.len()
    );
    current
}

/// 更新单个场次的字段
///
/// 场次不存在时只补齐这一个场次再应用更新；模板中也没有时原样返回。
pub fn update_field(
    mut current: Vec<SessionState>,
    templates: &[SessionTemplate],
    key: &SessionKey,
    update: SessionUpdate,
) -> Vec<SessionState> {
    if let Some(existing) = current.iter_mut().find(|s| s.key() == key) {
        update.apply_to(existing);
        return current;
    }

    match templates.iter().find(|t| &t.key == key) {
        Some(template) => {
            let mut session = SessionState::from_template(template);
            update.apply_to(&mut session);
            current.push(session);
        }
        None => {
            tracing::warn!("Ignoring update for unknown session {}", key);
        }
    }

    current
}

/// 移除模板已不在当前选择中的场次，保持原有顺序
pub fn retain_current(
    mut current: Vec<SessionState>,
    templates: &[SessionTemplate],
) -> Vec<SessionState> {
    let keys: HashSet<&SessionKey> = templates.iter().map(|t| &t.key).collect();
    let before = current.len();
    current.retain(|s| keys.contains(s.key()));

    if current.len() != before {
        tracing::debug!("Pruned {} stale sessions", before - current.len());
    }
    current
}

/// 同组中的其他场次，按集合顺序返回
pub fn related_sessions<'a>(sessions: &'a [SessionState], key: &SessionKey) -> Vec<&'a SessionState> {
    let group = key.group();
    sessions
        .iter()
        .filter(|s| s.group() == group && s.key() != key)
        .collect()
}

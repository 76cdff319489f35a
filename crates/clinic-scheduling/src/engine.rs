//! 排程引擎
//!
//! 协调模板展开、状态合并、时间计算与自动传播，提供统一的排程接口。

use crate::propagation::propagate;
use crate::selection::Catalog;
use crate::state::{materialize, update_field, SessionState, SessionUpdate};
use crate::template::{SessionGroup, SessionKey, SessionTemplate};
use crate::temporal::compute_end;
use chrono::NaiveDateTime;
use clinic_core::{ClinicError, Result, Selection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 排程引擎
///
/// 引擎本身不持有场次状态：状态由调用方传入，处理后以新集合返回。
#[derive(Debug, Clone, Default)]
pub struct SessionScheduler {
    catalog: Catalog,
}

impl SessionScheduler {
    /// 创建新的排程引擎
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// 获取目录
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 展开当前选择
    pub fn expand_selection(&self, selection: &Selection) -> Vec<SessionTemplate> {
        self.catalog.expand_selection(selection)
    }

    /// 应用一次用户编辑
    ///
    /// 开始时间的编辑先补齐全部模板，再计算结束时间；若为第一次场次，
    /// 继续推算同组其余场次。其他字段只更新对应场次。
    pub fn apply_update(
        &self,
        state: Vec<SessionState>,
        templates: &[SessionTemplate],
        key: &SessionKey,
        update: SessionUpdate,
    ) -> Vec<SessionState> {
        match update {
            SessionUpdate::Start(start) => self.set_start(state, templates, key, start),
            other => update_field(state, templates, key, other),
        }
    }

    /// 设置场次开始时间并按需传播
    fn set_start(
        &self,
        state: Vec<SessionState>,
        templates: &[SessionTemplate],
        key: &SessionKey,
        start: String,
    ) -> Vec<SessionState> {
        let mut sessions = materialize(state, templates);

        let Some(edited) = sessions.iter_mut().find(|s| s.key() == key) else {
            tracing::warn!("Ignoring start for unknown session {}", key);
            return sessions;
        };

        edited.end = compute_end(&start, edited.template.duration_minutes);
        edited.start = start;
        tracing::debug!("Session {} scheduled at '{}'", key, edited.start);

        if edited.session_number() != 1 {
            return sessions;
        }

        let anchor = edited.clone();
        propagate(sessions, &anchor)
    }

    /// 获取排程概览
    pub fn overview(&self, sessions: &[SessionState]) -> ScheduleOverview {
        ScheduleOverview::from_sessions(sessions)
    }
}

/// 排程概览
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleOverview {
    pub total_sessions: usize,
    pub scheduled_sessions: usize,
    pub unscheduled_sessions: usize,
    pub groups: usize,
    pub first_start: Option<NaiveDateTime>,
    pub last_end: Option<NaiveDateTime>,
}

impl ScheduleOverview {
    pub fn from_sessions(sessions: &[SessionState]) -> Self {
        let groups: HashSet<SessionGroup> = sessions.iter().map(SessionState::group).collect();
        let scheduled_sessions = sessions.iter().filter(|s| s.is_scheduled()).count();

        Self {
            total_sessions: sessions.len(),
            scheduled_sessions,
            unscheduled_sessions: sessions.len() - scheduled_sessions,
            groups: groups.len(),
            first_start: sessions.iter().filter_map(SessionState::start_at).min(),
            last_end: sessions.iter().filter_map(SessionState::end_at).max(),
        }
    }
}

/// 提交前校验
///
/// 引擎本身从不调用；供调用方在提交预约前提示用户。
pub fn validate_schedule(sessions: &[SessionState]) -> Result<()> {
    let problems: Vec<String> = sessions
        .iter()
        .filter_map(|session| {
            let label = format!(
                "{} {}/{} ({})",
                session.template.display_name,
                session.session_number(),
                session.template.total_sessions,
                session.key()
            );

            match (session.start_at(), session.end_at()) {
                (None, _) => Some(format!("{}: missing start date", label)),
                (Some(start), Some(end)) if end < start => {
                    Some(format!("{}: ends before it starts", label))
                }
                _ => None,
            }
        })
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ClinicError::Validation(problems.join("; ")))
    }
}

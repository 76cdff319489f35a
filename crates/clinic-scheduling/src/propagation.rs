//! 自动传播
//!
//! 第一次场次定下开始时间后，按每个场次自身的间隔天数推算同组其余场次。

use crate::state::SessionState;
use crate::temporal::{add_days, compute_end, format_local, parse_local};

/// 由第一次场次推算同组第 2..N 次的开始与结束时间
///
/// 仅当 `edited` 是第一次场次且开始时间有效时生效，否则原样返回。
/// 只更新集合中已存在的同组场次；组外场次与 `edited` 本身不受影响。
pub fn propagate(mut sessions: Vec<SessionState>, edited: &SessionState) -> Vec<SessionState> {
    if edited.session_number() != 1 {
        return sessions;
    }

    let Some(first_start) = parse_local(&edited.start) else {
        tracing::debug!("Skipping propagation for {}: no valid start", edited.key());
        return sessions;
    };

    let group = edited.group();
    let mut updated = 0usize;

    for session in sessions
        .iter_mut()
        .filter(|s| s.group() == group && s.session_number() > 1)
    {
        // 偏移量使用该场次自身的间隔天数
        let day_offset = u64::from(session.session_number() - 1)
            * u64::from(session.template.interval_days);

        match add_days(first_start, day_offset) {
            Some(start) => {
                session.start = format_local(&start);
                session.end = compute_end(&session.start, session.template.duration_minutes);
                updated += 1;
            }
            None => {
                tracing::warn!("Date overflow propagating to session {}", session.key());
            }
        }
    }

    tracing::debug!("Propagated start of {} to {} sessions", edited.key(), updated);
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::materialize;
    use crate::template::{SessionKey, SessionTemplate};
    use uuid::Uuid;

    fn package_templates(package_id: Uuid, count: u32, interval_days: u32) -> Vec<SessionTemplate> {
        (1..=count)
            .map(|n| SessionTemplate {
                key: SessionKey::package(package_id, 0, n),
                item_id: Some(0),
                total_sessions: count,
                duration_minutes: 30,
                interval_text: format!("{} dias", interval_days),
                interval_days,
                display_name: "Peeling".to_string(),
            })
            .collect()
    }

    fn anchored(sessions: &[SessionState], start: &str) -> SessionState {
        let mut first = sessions[0].clone();
        first.start = start.to_string();
        first.end = compute_end(start, first.template.duration_minutes);
        first
    }

    #[test]
    fn test_propagation_dates() {
        let sessions = materialize(Vec::new(), &package_templates(Uuid::new_v4(), 3, 15));
        let first = anchored(&sessions, "2024-01-01T09:00");

        let result = propagate(sessions, &first);
        assert_eq!(result[1].start, "2024-01-16T09:00");
        assert_eq!(result[1].end, "2024-01-16T09:30");
        assert_eq!(result[2].start, "2024-01-31T09:00");
        assert_eq!(result[2].end, "2024-01-31T09:30");

        // 第一次场次本身不被修改
        assert!(result[0].start.is_empty());
    }

    #[test]
    fn test_invalid_anchor_is_noop() {
        let sessions = materialize(Vec::new(), &package_templates(Uuid::new_v4(), 3, 15));

        let mut first = sessions[0].clone();
        first.start = "não é uma data".to_string();
        assert_eq!(propagate(sessions.clone(), &first), sessions);

        first.start = String::new();
        assert_eq!(propagate(sessions.clone(), &first), sessions);
    }

    #[test]
    fn test_non_first_session_is_noop() {
        let sessions = materialize(Vec::new(), &package_templates(Uuid::new_v4(), 3, 15));

        let mut second = sessions[1].clone();
        second.start = "2024-01-01T09:00".to_string();
        assert_eq!(propagate(sessions.clone(), &second), sessions);
    }

    #[test]
    fn test_cross_group_isolation() {
        let edited_group = package_templates(Uuid::new_v4(), 2, 7);
        let other_group = package_templates(Uuid::new_v4(), 2, 7);
        let all: Vec<SessionTemplate> = edited_group.iter().chain(other_group.iter()).cloned().collect();
        let sessions = materialize(Vec::new(), &all);
        let first = anchored(&sessions, "2024-06-10T14:00");

        let result = propagate(sessions, &first);
        assert_eq!(result[1].start, "2024-06-17T14:00");
        assert!(result[2..].iter().all(|s| s.start.is_empty() && s.end.is_empty()));
    }

    #[test]
    fn test_offset_uses_each_session_interval() {
        let mut templates = package_templates(Uuid::new_v4(), 3, 10);
        templates[2].interval_days = 20;
        let sessions = materialize(Vec::new(), &templates);
        let first = anchored(&sessions, "2024-01-01T08:00");

        let result = propagate(sessions, &first);
        assert_eq!(result[1].start, "2024-01-11T08:00");
        assert_eq!(result[2].start, "2024-02-10T08:00");
    }

    #[test]
    fn test_unmaterialized_siblings_are_not_discovered() {
        let templates = package_templates(Uuid::new_v4(), 3, 15);
        let sessions = materialize(Vec::new(), &templates[..2]);
        let first = anchored(&sessions, "2024-01-01T09:00");

        let result = propagate(sessions, &first);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].start, "2024-01-16T09:00");
    }
}

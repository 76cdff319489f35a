//! 排程草稿
//!
//! 代表预约创建表单的一次提交：目录、当前选择、已有场次状态以及按顺序应用的编辑。

use clinic_core::{ClinicError, PackageRef, ProcedureRef, Result, Selection};
use clinic_scheduling::{
    materialize, retain_current, validate_schedule, Catalog, ScheduleOverview, SchedulingDefaults,
    SessionKey, SessionScheduler, SessionState, SessionUpdate,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 排程草稿输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingDraft {
    #[serde(default)]
    pub procedures: Vec<ProcedureRef>,
    #[serde(default)]
    pub packages: Vec<PackageRef>,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub sessions: Vec<SessionState>,
    #[serde(default)]
    pub edits: Vec<SessionEdit>,
}

/// 针对单个场次的一次编辑
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEdit {
    pub key: SessionKey,
    pub update: SessionUpdate,
}

/// 处理选项
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftOptions {
    /// 移除不再属于当前选择的场次
    pub prune: bool,
    /// 输出提交前校验结果
    pub validate: bool,
}

/// 处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOutcome {
    pub sessions: Vec<SessionState>,
    pub overview: ScheduleOverview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl SchedulingDraft {
    /// 解析 JSON 草稿
    pub fn from_json(text: &str) -> Result<Self> {
        let draft: SchedulingDraft = serde_json::from_str(text)?;
        if draft.selection.is_empty() && !draft.edits.is_empty() {
            return Err(ClinicError::Validation(
                "Draft contains edits but no selected packages or procedures".to_string(),
            ));
        }
        Ok(draft)
    }

    /// 运行排程引擎
    pub fn run(self, defaults: SchedulingDefaults, options: DraftOptions) -> DraftOutcome {
        let scheduler = SessionScheduler::new(Catalog::with_defaults(
            self.procedures,
            self.packages,
            defaults,
        ));

        let templates = scheduler.expand_selection(&self.selection);
        info!(
            "Draft expanded into {} session templates, applying {} edits",
            templates.len(),
            self.edits.len()
        );

        let mut sessions = materialize(self.sessions, &templates);
        for edit in self.edits {
            debug!("Applying {:?} to session {}", edit.update, edit.key);
            sessions = scheduler.apply_update(sessions, &templates, &edit.key, edit.update);
        }

        if options.prune {
            sessions = retain_current(sessions, &templates);
        }

        let validation_error = if options.validate {
            validate_schedule(&sessions).err().map(|e| e.to_string())
        } else {
            None
        };

        DraftOutcome {
            overview: scheduler.overview(&sessions),
            sessions,
            validation_error,
        }
    }
}

//! 选择展开
//!
//! 目录在每次渲染或更新前构建一次，按ID索引，避免对每个模板做线性查找。

use crate::defaults::SchedulingDefaults;
use crate::template::{expand_package, expand_procedure, SessionTemplate};
use clinic_core::{PackageRef, ProcedureRef, Selection};
use std::collections::HashMap;
use uuid::Uuid;

/// 疗程与套餐目录
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    procedures: HashMap<Uuid, ProcedureRef>,
    packages: HashMap<Uuid, PackageRef>,
    defaults: SchedulingDefaults,
}

impl Catalog {
    /// 创建新的目录
    pub fn new(
        procedures: impl IntoIterator<Item = ProcedureRef>,
        packages: impl IntoIterator<Item = PackageRef>,
    ) -> Self {
        Self::with_defaults(procedures, packages, SchedulingDefaults::default())
    }

    /// 使用指定默认值创建目录
    pub fn with_defaults(
        procedures: impl IntoIterator<Item = ProcedureRef>,
        packages: impl IntoIterator<Item = PackageRef>,
        defaults: SchedulingDefaults,
    ) -> Self {
        Self {
            procedures: procedures.into_iter().map(|p| (p.id, p)).collect(),
            packages: packages.into_iter().map(|p| (p.id, p)).collect(),
            defaults,
        }
    }

    pub fn procedure(&self, id: Uuid) -> Option<&ProcedureRef> {
        self.procedures.get(&id)
    }

    pub fn package(&self, id: Uuid) -> Option<&PackageRef> {
        self.packages.get(&id)
    }

    pub fn defaults(&self) -> &SchedulingDefaults {
        &self.defaults
    }

    /// 展开套餐，未找到时返回空列表
    pub fn expand_package(&self, package_id: Uuid) -> Vec<SessionTemplate> {
        match self.packages.get(&package_id) {
            Some(package) => expand_package(package, &self.procedures, &self.defaults),
            None => {
                tracing::warn!("Package {} not found in catalog, skipping", package_id);
                Vec::new()
            }
        }
    }

    /// 展开疗程，未找到时返回空列表
    pub fn expand_procedure(&self, procedure_id: Uuid) -> Vec<SessionTemplate> {
        match self.procedures.get(&procedure_id) {
            Some(procedure) => expand_procedure(procedure, &self.defaults),
            None => {
                tracing::warn!("Procedure {} not found in catalog, skipping", procedure_id);
                Vec::new()
            }
        }
    }

    /// 展开完整选择：先按选择顺序展开套餐，再展开疗程
    ///
    /// 该顺序决定显示顺序与合并稳定性，调用方不应重新排序。
    pub fn expand_selection(&self, selection: &Selection) -> Vec<SessionTemplate> {
        let templates: Vec<SessionTemplate> = selection
            .package_ids
            .iter()
            .flat_map(|id| self.expand_package(*id))
            .chain(
                selection
                    .procedure_ids
                    .iter()
                    .flat_map(|id| self.expand_procedure(*id)),
            )
            .collect();

        tracing::debug!(
            "Expanded selection of {} packages and {} procedures into {} templates",
            selection.package_ids.len(),
            selection.procedure_ids.len(),
            templates.len()
        );
        templates
    }
}

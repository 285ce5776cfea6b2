use std::collections::HashMap;

use super::error::{EngineError, EngineResult};
use super::types::{PieceTemplate, TemplateId};

// ==============================================================================
// --- 棋子模板注册表 ---
// ==============================================================================

/// 按注册顺序为模板分配连续编号，名称唯一
///
/// 棋盘构造时以 `Arc` 共享；此后模板数量 (即动作空间大小) 固定。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRegistry {
    templates: Vec<PieceTemplate>,
    by_name: HashMap<String, TemplateId>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: PieceTemplate) -> EngineResult<TemplateId> {
        if self.by_name.contains_key(&template.name) {
            return Err(EngineError::DuplicateTemplate(template.name));
        }
        let id = TemplateId::from_index(self.templates.len());
        self.by_name.insert(template.name.clone(), id);
        self.templates.push(template);
        Ok(id)
    }

    pub fn get(&self, id: TemplateId) -> Option<&PieceTemplate> {
        self.templates.get(id.index())
    }

    /// 通过占用网格编码查找
    pub fn resolve_code(&self, code: u32) -> EngineResult<(TemplateId, &PieceTemplate)> {
        TemplateId::from_code(code)
            .and_then(|id| self.get(id).map(|t| (id, t)))
            .ok_or(EngineError::UnknownTemplate(code))
    }

    pub fn id_of(&self, name: &str) -> EngineResult<TemplateId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownTemplateName(name.to_string()))
    }

    pub fn name_of(&self, id: TemplateId) -> &str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &PieceTemplate)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, t)| (TemplateId::from_index(i), t))
    }
}

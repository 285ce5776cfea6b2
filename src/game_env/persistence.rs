use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::board::GameBoard;
use super::constants::*;
use super::error::{EngineError, EngineResult};
use super::registry::TemplateRegistry;
use super::types::*;

// ==============================================================================
// --- 存档格式 ---
// ==============================================================================

/// 棋盘存档: 占用网格、颜色网格、王的坐标与尺寸
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBoard {
    pub rows: usize,
    pub cols: usize,
    pub piece_position: Vec<Vec<u32>>,
    pub piece_alignment: Vec<Vec<u8>>,
    pub kings: Vec<[usize; 2]>,
}

impl SavedBoard {
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// 检查网格形状与内容，返回 (格子, 模板编码, 玩家) 列表
    fn validate(&self, registry: &TemplateRegistry) -> EngineResult<Vec<(Square, u32, Player)>> {
        let shape_ok = |len: usize, rows: &[usize]| len == self.rows && rows.iter().all(|&l| l == self.cols);
        let position_rows: Vec<usize> = self.piece_position.iter().map(Vec::len).collect();
        let alignment_rows: Vec<usize> = self.piece_alignment.iter().map(Vec::len).collect();
        if !shape_ok(self.piece_position.len(), &position_rows) || !shape_ok(self.piece_alignment.len(), &alignment_rows) {
            return Err(EngineError::CorruptBoard(format!(
                "grids do not match the declared {}x{} size",
                self.rows, self.cols
            )));
        }

        let mut entries = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let code = self.piece_position[r][c];
                let color = self.piece_alignment[r][c];
                if code == NO_PIECE {
                    if color != EMPTY_SQUARE {
                        return Err(EngineError::CorruptBoard(format!("empty square ({}, {}) has a color", r, c)));
                    }
                    continue;
                }
                registry.resolve_code(code)?;
                let player = Player::from_code(color)
                    .ok_or_else(|| EngineError::CorruptBoard(format!("piece at ({}, {}) has color {}", r, c, color)))?;
                entries.push(((r, c), code, player));
            }
        }

        let mut royal_players = HashSet::new();
        let mut seen = HashSet::new();
        for &[r, c] in &self.kings {
            if r >= self.rows || c >= self.cols || self.piece_position[r][c] == NO_PIECE {
                return Err(EngineError::NotAPiece { row: r, col: c });
            }
            if !seen.insert((r, c)) {
                continue;
            }
            // 颜色已在上面校验过
            if let Some(player) = Player::from_code(self.piece_alignment[r][c]) {
                if !royal_players.insert(player) {
                    return Err(EngineError::DuplicateRoyal { player });
                }
            }
        }
        Ok(entries)
    }
}

/// 棋子模板存档: 名称 + 编辑器数值矩阵
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub name: String,
    pub movement: Vec<Vec<u8>>,
}

impl SavedTemplate {
    pub fn from_template(template: &PieceTemplate) -> Self {
        Self {
            name: template.name.clone(),
            movement: template.movement.to_codes(),
        }
    }

    pub fn to_template(&self) -> EngineResult<PieceTemplate> {
        Ok(PieceTemplate::new(self.name.clone(), MovementPattern::from_codes(&self.movement)?))
    }
}

/// 按列表顺序注册模板 (列表顺序即模板编号)
pub fn registry_from_saved(templates: &[SavedTemplate]) -> EngineResult<TemplateRegistry> {
    let mut registry = TemplateRegistry::new();
    for saved in templates {
        registry.register(saved.to_template()?)?;
    }
    Ok(registry)
}

pub fn registry_to_saved(registry: &TemplateRegistry) -> Vec<SavedTemplate> {
    registry.iter().map(|(_, t)| SavedTemplate::from_template(t)).collect()
}

// ==============================================================================
// --- 棋盘加载/导出扩展块 ---
// ==============================================================================

impl GameBoard {
    pub fn from_saved(saved: &SavedBoard, config: BoardConfig, registry: Arc<TemplateRegistry>) -> EngineResult<Self> {
        let mut board = GameBoard::new(config, registry);
        board.load_saved(saved)?;
        Ok(board)
    }

    /// 用存档替换当前局面
    ///
    /// 所有校验 (尺寸、模板、颜色、王的坐标与数量) 都在修改棋盘之前完成；
    /// 黑方棋子在 `place_piece` 中旋转移动矩阵。
    pub fn load_saved(&mut self, saved: &SavedBoard) -> EngineResult<()> {
        let expected = self.config().dims();
        let found = (saved.rows, saved.cols);
        if expected != found {
            return Err(EngineError::DimensionMismatch { expected, found });
        }
        let entries = saved.validate(self.registry())?;
        let kings: HashSet<Square> = saved.kings.iter().map(|&[r, c]| (r, c)).collect();

        self.clear();
        for (square, code, player) in entries {
            let (template, _) = self.registry().resolve_code(code)?;
            self.place_piece(template, square, player, kings.contains(&square))?;
        }
        Ok(())
    }

    pub fn to_saved(&self) -> SavedBoard {
        let piece_position = self.occupancy().outer_iter().map(|row| row.to_vec()).collect();
        let piece_alignment = self.alignment().outer_iter().map(|row| row.to_vec()).collect();
        let kings = self
            .pieces()
            .values()
            .filter(|p| p.is_royal)
            .map(|p| [p.position.0, p.position.1])
            .collect();
        let (rows, cols) = self.config().dims();
        SavedBoard {
            rows,
            cols,
            piece_position,
            piece_alignment,
            kings,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::*;
use super::error::{EngineError, EngineResult};

// ==============================================================================
// --- 基础数据结构 ---
// ==============================================================================

/// 棋盘坐标 (row, col)
pub type Square = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opposite(&self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// 对齐网格编码
    pub fn code(&self) -> u8 {
        match self {
            Player::White => WHITE_PIECE,
            Player::Black => BLACK_PIECE,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            WHITE_PIECE => Some(Player::White),
            BLACK_PIECE => Some(Player::Black),
            _ => None,
        }
    }

    /// 外部框架中的玩家编号: 白方 0, 黑方 1
    pub fn idx(&self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Player::White => "White",
            Player::Black => "Black",
        }
    }

    pub fn short(&self) -> char {
        match self {
            Player::White => 'w',
            Player::Black => 'b',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 棋盘尺寸配置
///
/// 构造后不可修改；改变尺寸需要创建新的棋盘、解析器与动作编码器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardConfig {
    rows: usize,
    cols: usize,
}

impl BoardConfig {
    pub fn new(rows: usize, cols: usize) -> EngineResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn total_squares(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// 从 `origin` 偏移 (dr, dc)，越界返回 None
    pub fn offset(&self, origin: Square, dr: isize, dc: isize) -> Option<Square> {
        let r = origin.0 as isize + dr;
        let c = origin.1 as isize + dc;
        if r < 0 || c < 0 || r >= self.rows as isize || c >= self.cols as isize {
            None
        } else {
            Some((r as usize, c as usize))
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_BOARD_ROWS,
            cols: DEFAULT_BOARD_COLS,
        }
    }
}

// ==============================================================================
// --- 移动描述矩阵 ---
// ==============================================================================

/// 移动矩阵中单个相对偏移的含义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCell {
    Empty,
    /// 跳跃落点，无视中间棋子
    Phase,
    /// 连续移动，沿射线扫描并被第一个棋子阻挡
    Walk,
    /// 棋子自身
    Center,
}

impl MoveCell {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            CELL_CODE_EMPTY | CELL_CODE_EMPTY_ALT => Some(MoveCell::Empty),
            CELL_CODE_PHASE => Some(MoveCell::Phase),
            CELL_CODE_WALK => Some(MoveCell::Walk),
            CELL_CODE_CENTER => Some(MoveCell::Center),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            MoveCell::Empty => CELL_CODE_EMPTY,
            MoveCell::Phase => CELL_CODE_PHASE,
            MoveCell::Walk => CELL_CODE_WALK,
            MoveCell::Center => CELL_CODE_CENTER,
        }
    }
}

/// 以棋子为中心的方阵，边长为奇数 `2 * radius + 1`
///
/// 按 `[dr + radius][dc + radius]` 行优先存储。`Walk` 只能位于经过中心的
/// 8 条方向线上 (横、竖、两条对角线)，其余位置的 `Walk` 会被拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementPattern {
    size: usize,
    cells: Vec<MoveCell>,
}

/// 连续移动只沿 8 个方向扫描，线外的 `Walk` 永远不会产生落点
fn check_walk_line(dr: isize, dc: isize, cell: MoveCell) -> EngineResult<()> {
    if cell == MoveCell::Walk && dr != 0 && dc != 0 && dr.abs() != dc.abs() {
        return Err(EngineError::MalformedMovement(format!(
            "walk offset ({}, {}) is not on a compass line",
            dr, dc
        )));
    }
    Ok(())
}

impl MovementPattern {
    /// 创建一个只有中心格的空矩阵
    pub fn new(size: usize) -> EngineResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(EngineError::MalformedMovement(format!(
                "side length must be odd, got {}",
                size
            )));
        }
        let mut cells = vec![MoveCell::Empty; size * size];
        let center = size / 2;
        cells[center * size + center] = MoveCell::Center;
        Ok(Self { size, cells })
    }

    /// 从持久化的数值矩阵构造 (编辑器编码: 0/255, 15, 20, 60)
    pub fn from_codes(rows: &[Vec<u8>]) -> EngineResult<Self> {
        let size = rows.len();
        let mut pattern = Self::new(size)?;
        let center = size / 2;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(EngineError::MalformedMovement(format!(
                    "row {} has length {}, expected {}",
                    r,
                    row.len(),
                    size
                )));
            }
            for (c, &code) in row.iter().enumerate() {
                let cell = MoveCell::from_code(code).ok_or_else(|| {
                    EngineError::MalformedMovement(format!("unknown cell code {} at ({}, {})", code, r, c))
                })?;
                let is_center = r == center && c == center;
                if (cell == MoveCell::Center) != is_center {
                    return Err(EngineError::MalformedMovement(format!(
                        "center marker must be exactly at ({}, {})",
                        center, center
                    )));
                }
                check_walk_line(r as isize - center as isize, c as isize - center as isize, cell)?;
                pattern.cells[r * size + c] = cell;
            }
        }
        Ok(pattern)
    }

    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(MoveCell::code).collect())
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// 读取偏移 (dr, dc) 的格子，超出矩阵视为 Empty
    pub fn cell(&self, dr: isize, dc: isize) -> MoveCell {
        let radius = self.radius() as isize;
        if dr.abs() > radius || dc.abs() > radius {
            return MoveCell::Empty;
        }
        let r = (dr + radius) as usize;
        let c = (dc + radius) as usize;
        self.cells[r * self.size + c]
    }

    pub fn set(&mut self, dr: isize, dc: isize, cell: MoveCell) -> EngineResult<()> {
        let radius = self.radius() as isize;
        if dr.abs() > radius || dc.abs() > radius {
            return Err(EngineError::MalformedMovement(format!(
                "offset ({}, {}) exceeds radius {}",
                dr, dc, radius
            )));
        }
        if (dr == 0 && dc == 0) != (cell == MoveCell::Center) {
            return Err(EngineError::MalformedMovement(
                "only the center offset may hold the center marker".to_string(),
            ));
        }
        check_walk_line(dr, dc, cell)?;
        let r = (dr + radius) as usize;
        let c = (dc + radius) as usize;
        self.cells[r * self.size + c] = cell;
        Ok(())
    }

    /// 链式设置多个偏移
    pub fn with_cells(mut self, offsets: &[(isize, isize)], cell: MoveCell) -> EngineResult<Self> {
        for &(dr, dc) in offsets {
            self.set(dr, dc, cell)?;
        }
        Ok(self)
    }

    /// 沿方向标记 `max_steps` 个连续偏移 (受矩阵半径限制)
    pub fn with_ray(mut self, direction: (isize, isize), max_steps: usize, cell: MoveCell) -> EngineResult<Self> {
        let steps = max_steps.min(self.radius());
        for k in 1..=steps as isize {
            self.set(direction.0 * k, direction.1 * k, cell)?;
        }
        Ok(self)
    }

    /// 旋转 180 度 (黑方棋子使用)
    pub fn rotated_180(&self) -> Self {
        let mut cells = self.cells.clone();
        cells.reverse();
        Self {
            size: self.size,
            cells,
        }
    }

    /// 按行优先顺序遍历所有非中心、非空的偏移
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize, MoveCell)> + '_ {
        let radius = self.radius() as isize;
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, &cell)| match cell {
            MoveCell::Empty | MoveCell::Center => None,
            _ => Some(((i / size) as isize - radius, (i % size) as isize - radius, cell)),
        })
    }

    /// 截取从 `origin` 出发仍落在棋盘内的子窗口
    ///
    /// 返回 (目标格, 格子类型)，行优先，不含中心。
    pub fn window(&self, origin: Square, config: &BoardConfig) -> impl Iterator<Item = (Square, MoveCell)> + '_ {
        let radius = self.radius() as isize;
        let (r0, c0) = (origin.0 as isize, origin.1 as isize);
        let dr_min = (-radius).max(-r0);
        let dr_max = radius.min(config.rows() as isize - 1 - r0);
        let dc_min = (-radius).max(-c0);
        let dc_max = radius.min(config.cols() as isize - 1 - c0);

        (dr_min..=dr_max).flat_map(move |dr| {
            (dc_min..=dc_max).filter_map(move |dc| match self.cell(dr, dc) {
                MoveCell::Empty | MoveCell::Center => None,
                cell => Some((((r0 + dr) as usize, (c0 + dc) as usize), cell)),
            })
        })
    }
}

// ==============================================================================
// --- 棋子模板与实例 ---
// ==============================================================================

/// 注册表按注册顺序分配的模板编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(usize);

impl TemplateId {
    pub fn from_index(index: usize) -> Self {
        TemplateId(index)
    }

    /// 占用网格编码 (0 为空位)
    pub fn from_code(code: u32) -> Option<Self> {
        if code == NO_PIECE {
            None
        } else {
            Some(TemplateId(code as usize - 1))
        }
    }

    /// 动作编码使用的模板索引
    pub fn index(&self) -> usize {
        self.0
    }

    pub fn code(&self) -> u32 {
        self.0 as u32 + 1
    }
}

/// 棋子模板: 名称 + 移动矩阵 (白方视角)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTemplate {
    pub name: String,
    pub movement: MovementPattern,
}

impl PieceTemplate {
    pub fn new(name: impl Into<String>, movement: MovementPattern) -> Self {
        Self {
            name: name.into(),
            movement,
        }
    }
}

/// 棋盘上的棋子实例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub template: TemplateId,
    /// 按颜色定向后的移动矩阵
    pub movement: MovementPattern,
    pub position: Square,
    pub player: Player,
    pub is_royal: bool,
}

impl Piece {
    /// 黑方从棋盘另一侧出发，移动矩阵旋转 180 度
    pub fn new(template: TemplateId, definition: &PieceTemplate, position: Square, player: Player, is_royal: bool) -> Self {
        let movement = match player {
            Player::White => definition.movement.clone(),
            Player::Black => definition.movement.rotated_180(),
        };
        Self {
            template,
            movement,
            position,
            player,
            is_royal,
        }
    }
}

use std::sync::Arc;

use super::board::GameBoard;
use super::constants::*;
use super::error::{EngineError, EngineResult};
use super::registry::TemplateRegistry;
use super::types::*;

// ==============================================================================
// --- 内置棋子 ---
// ==============================================================================
//
// 所有矩阵按白方朝向编写 (白方向行号减小的方向前进)，黑方在摆子时旋转 180°。

fn rays(directions: &[(isize, isize)], max_steps: usize) -> EngineResult<MovementPattern> {
    let mut pattern = MovementPattern::new(DEFAULT_MOVEMENT_SIZE)?;
    for &dir in directions {
        pattern = pattern.with_ray(dir, max_steps, MoveCell::Walk)?;
    }
    Ok(pattern)
}

fn orthogonal() -> Vec<(isize, isize)> {
    RAY_DIRECTIONS.iter().copied().filter(|&(dr, dc)| dr == 0 || dc == 0).collect()
}

fn diagonal() -> Vec<(isize, isize)> {
    RAY_DIRECTIONS.iter().copied().filter(|&(dr, dc)| dr != 0 && dc != 0).collect()
}

pub fn king() -> EngineResult<MovementPattern> {
    rays(&RAY_DIRECTIONS, 1)
}

pub fn queen() -> EngineResult<MovementPattern> {
    rays(&RAY_DIRECTIONS, DEFAULT_MOVEMENT_SIZE / 2)
}

pub fn rook() -> EngineResult<MovementPattern> {
    rays(&orthogonal(), DEFAULT_MOVEMENT_SIZE / 2)
}

pub fn bishop() -> EngineResult<MovementPattern> {
    rays(&diagonal(), DEFAULT_MOVEMENT_SIZE / 2)
}

pub fn knight() -> EngineResult<MovementPattern> {
    let jumps = [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];
    MovementPattern::new(DEFAULT_MOVEMENT_SIZE)?.with_cells(&jumps, MoveCell::Phase)
}

/// 兵: 只能向前走一格，同一格也可吃子 (无斜吃、无首步两格)
pub fn pawn() -> EngineResult<MovementPattern> {
    rays(&[(-1, 0)], 1)
}

/// 内置模板，注册顺序即模板编号: Pawn, Knight, Bishop, Rook, Queen, King
pub fn standard_templates() -> EngineResult<Vec<PieceTemplate>> {
    Ok(vec![
        PieceTemplate::new("Pawn", pawn()?),
        PieceTemplate::new("Knight", knight()?),
        PieceTemplate::new("Bishop", bishop()?),
        PieceTemplate::new("Rook", rook()?),
        PieceTemplate::new("Queen", queen()?),
        PieceTemplate::new("King", king()?),
    ])
}

pub fn standard_registry() -> EngineResult<Arc<TemplateRegistry>> {
    let mut registry = TemplateRegistry::new();
    for template in standard_templates()? {
        registry.register(template)?;
    }
    Ok(Arc::new(registry))
}

// ==============================================================================
// --- 预设布局 ---
// ==============================================================================

/// 预设开局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 8x8 国际象棋布局
    Classic,
    /// 5x5 Gardner 迷你棋布局
    Gardner,
    /// 空棋盘 (默认尺寸)
    Empty,
}

impl Layout {
    pub fn board_config(&self) -> BoardConfig {
        let side = match self {
            Layout::Classic | Layout::Empty => DEFAULT_BOARD_ROWS,
            Layout::Gardner => 5,
        };
        // 两种尺寸都非零
        BoardConfig::new(side, side).unwrap_or_default()
    }

    fn back_rank(&self) -> &'static [&'static str] {
        match self {
            Layout::Classic => &["Rook", "Knight", "Bishop", "Queen", "King", "Bishop", "Knight", "Rook"],
            Layout::Gardner => &["Rook", "Knight", "Bishop", "Queen", "King"],
            Layout::Empty => &[],
        }
    }

    /// 在已清空的棋盘上摆出布局，王标记为 royal
    pub fn setup(&self, board: &mut GameBoard) -> EngineResult<()> {
        let expected = self.board_config().dims();
        let found = board.config().dims();
        if expected != found {
            return Err(EngineError::DimensionMismatch { expected, found });
        }
        board.clear();

        let rank = self.back_rank();
        if rank.is_empty() {
            return Ok(());
        }
        let last = found.0 - 1;
        for (col, &name) in rank.iter().enumerate() {
            let royal = name == "King";
            board.place_named(name, (0, col), Player::Black, royal)?;
            board.place_named("Pawn", (1, col), Player::Black, false)?;
            board.place_named("Pawn", (last - 1, col), Player::White, false)?;
            board.place_named(name, (last, col), Player::White, royal)?;
        }
        Ok(())
    }

    /// 使用内置模板构造一个摆好布局的棋盘
    pub fn new_board(&self) -> EngineResult<GameBoard> {
        let mut board = GameBoard::new(self.board_config(), standard_registry()?);
        self.setup(&mut board)?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_order() {
        let reg = standard_registry().unwrap();
        assert_eq!(reg.len(), 6);
        assert_eq!(reg.id_of("Pawn").unwrap().code(), 1);
        assert_eq!(reg.id_of("King").unwrap().index(), 5);
    }

    #[test]
    fn test_piece_shapes() {
        let k = king().unwrap();
        assert_eq!(k.cell(-1, -1), MoveCell::Walk);
        assert_eq!(k.cell(-2, 0), MoveCell::Empty);

        let r = rook().unwrap();
        assert_eq!(r.cell(0, 7), MoveCell::Walk);
        assert_eq!(r.cell(1, 1), MoveCell::Empty);

        let b = bishop().unwrap();
        assert_eq!(b.cell(-7, 7), MoveCell::Walk);
        assert_eq!(b.cell(0, 1), MoveCell::Empty);

        let n = knight().unwrap();
        assert_eq!(n.cell(-2, 1), MoveCell::Phase);
        assert_eq!(n.cell(-1, 0), MoveCell::Empty);

        let p = pawn().unwrap();
        assert_eq!(p.cell(-1, 0), MoveCell::Walk);
        assert_eq!(p.cell(1, 0), MoveCell::Empty);
    }

    #[test]
    fn test_gardner_layout() {
        let board = Layout::Gardner.new_board().unwrap();
        assert_eq!(board.config().dims(), (5, 5));
        assert_eq!(board.occupied_count(), 20);
        assert!(board.piece_at((0, 4)).unwrap().is_royal);
        assert_eq!(board.piece_at((4, 4)).unwrap().player, Player::White);
        assert_eq!(board.board_to_string().lines().nth(2), Some("0 0 0 0 0"));

        // 白方开局: 5 个兵各一步 + 马的两种跳法
        assert_eq!(board.all_legal_actions().len(), 7);
    }

    #[test]
    fn test_classic_layout() {
        let board = Layout::Classic.new_board().unwrap();
        assert_eq!(board.occupied_count(), 32);
        let royals = board.pieces().values().filter(|p| p.is_royal).count();
        assert_eq!(royals, 2);
        // 8 个兵 + 两个马各两种跳法
        assert_eq!(board.all_legal_actions().len(), 12);
    }

    #[test]
    fn test_layout_rejects_wrong_board() {
        let mut board = GameBoard::new(BoardConfig::new(4, 4).unwrap(), standard_registry().unwrap());
        assert_eq!(
            Layout::Gardner.setup(&mut board),
            Err(EngineError::DimensionMismatch { expected: (5, 5), found: (4, 4) })
        );
        assert!(Layout::Empty.new_board().unwrap().pieces().is_empty());
    }
}

use ndarray::Array2;

use super::constants::*;
use super::types::*;

// ==============================================================================
// --- 走法解析器 (Movement Resolver) ---
// ==============================================================================

/// 目标格的占用情况 (相对于行棋方)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occupant {
    Empty,
    Friendly,
    Enemy,
}

/// 根据棋子的移动矩阵与棋盘占用计算合法落点
///
/// 纯函数，不修改任何状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementResolver {
    config: BoardConfig,
}

impl MovementResolver {
    pub fn new(config: BoardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// 计算 `piece` 从 `origin` 出发的全部合法落点
    ///
    /// 先列出跳跃落点 (行优先)，再按 N, NE, E, SE, S, SW, W, NW 列出射线落点，
    /// 结果不含重复。
    pub fn legal_destinations(
        &self,
        piece: &Piece,
        origin: Square,
        occupancy: &Array2<u32>,
        alignment: &Array2<u8>,
    ) -> Vec<Square> {
        debug_assert_eq!(occupancy.dim(), self.config.dims());
        debug_assert_eq!(alignment.dim(), self.config.dims());

        let mut targets = Vec::new();
        self.phased_destinations(piece, origin, occupancy, alignment, &mut targets);
        self.contiguous_destinations(piece, origin, occupancy, alignment, &mut targets);
        targets
    }

    fn phased_destinations(
        &self,
        piece: &Piece,
        origin: Square,
        occupancy: &Array2<u32>,
        alignment: &Array2<u8>,
        targets: &mut Vec<Square>,
    ) {
        for (sq, cell) in piece.movement.window(origin, &self.config) {
            if cell != MoveCell::Phase {
                continue;
            }
            match occupant(sq, piece.player, occupancy, alignment) {
                Occupant::Friendly => {}
                Occupant::Empty | Occupant::Enemy => push_unique(targets, sq),
            }
        }
    }

    fn contiguous_destinations(
        &self,
        piece: &Piece,
        origin: Square,
        occupancy: &Array2<u32>,
        alignment: &Array2<u8>,
        targets: &mut Vec<Square>,
    ) {
        let radius = piece.movement.radius() as isize;

        for &(dr, dc) in RAY_DIRECTIONS.iter() {
            for k in 1..=radius {
                let (odr, odc) = (dr * k, dc * k);
                let sq = match self.config.offset(origin, odr, odc) {
                    Some(sq) => sq,
                    None => break,
                };
                let walkable = piece.movement.cell(odr, odc) == MoveCell::Walk;

                match occupant(sq, piece.player, occupancy, alignment) {
                    Occupant::Empty => {
                        // 未标记的偏移不落子，但射线继续
                        if walkable {
                            push_unique(targets, sq);
                        }
                    }
                    Occupant::Enemy => {
                        if walkable {
                            push_unique(targets, sq);
                        }
                        break;
                    }
                    Occupant::Friendly => break,
                }
            }
        }
    }
}

fn occupant(sq: Square, mover: Player, occupancy: &Array2<u32>, alignment: &Array2<u8>) -> Occupant {
    if occupancy[[sq.0, sq.1]] == NO_PIECE {
        return Occupant::Empty;
    }
    match Player::from_code(alignment[[sq.0, sq.1]]) {
        Some(owner) if owner != mover => Occupant::Enemy,
        Some(_) => Occupant::Friendly,
        None => {
            debug_assert!(false, "occupied square {:?} has no alignment", sq);
            Occupant::Friendly
        }
    }
}

fn push_unique(targets: &mut Vec<Square>, sq: Square) {
    if !targets.contains(&sq) {
        targets.push(sq);
    }
}

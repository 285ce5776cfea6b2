use ndarray::Array2;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::actions::ActionCodec;
use super::constants::*;
use super::error::{EngineError, EngineResult};
use super::movement::MovementResolver;
use super::registry::TemplateRegistry;
use super::types::*;

// ==============================================================================
// --- 对局状态 ---
// ==============================================================================

/// 棋盘所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingSelection,
    PieceSelected,
    GameOver,
}

/// 被吃掉的棋子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPiece {
    pub template: TemplateId,
    pub player: Player,
    pub was_royal: bool,
}

/// 一步已完成的走子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub template: TemplateId,
    pub player: Player,
    pub from: Square,
    pub to: Square,
    pub captured: Option<CapturedPiece>,
}

/// `select_at` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// 无效点击 (越界、空位、对方棋子或对局已结束)
    Ignored,
    Selected { square: Square, destinations: Vec<Square> },
    /// 已选中棋子时点击了非法落点
    Deselected,
    Moved(MoveRecord),
}

/// 可配置棋盘的对局状态
///
/// 占用网格、颜色网格与 `pieces` 映射始终一一对应，所有修改都经过
/// `select_at` / `apply_action` 与摆子接口。
#[derive(Debug, Clone, PartialEq)]
pub struct GameBoard {
    config: BoardConfig,
    registry: Arc<TemplateRegistry>,
    resolver: MovementResolver,
    codec: ActionCodec,

    /// 0 = 空, 否则为模板编码
    occupancy: Array2<u32>,
    /// 0 = 空, 否则为 BLACK_PIECE / WHITE_PIECE
    alignment: Array2<u8>,
    /// 按行优先排序的棋子映射
    pieces: BTreeMap<Square, Piece>,

    turn: Player,
    selected: Option<Square>,
    legal_targets: Vec<Square>,
    game_over: bool,
    winner: Option<Player>,
    history: Vec<MoveRecord>,
}

impl GameBoard {
    pub fn new(config: BoardConfig, registry: Arc<TemplateRegistry>) -> Self {
        let codec = ActionCodec::new(registry.len(), config);
        Self {
            config,
            resolver: MovementResolver::new(config),
            codec,
            registry,
            occupancy: Array2::zeros(config.dims()),
            alignment: Array2::zeros(config.dims()),
            pieces: BTreeMap::new(),
            turn: Player::White,
            selected: None,
            legal_targets: Vec::new(),
            game_over: false,
            winner: None,
            history: Vec::new(),
        }
    }

    /// 清空棋盘并回到白方先手
    pub fn clear(&mut self) {
        self.occupancy.fill(NO_PIECE);
        self.alignment.fill(EMPTY_SQUARE);
        self.pieces.clear();
        self.turn = Player::White;
        self.selected = None;
        self.legal_targets.clear();
        self.game_over = false;
        self.winner = None;
        self.history.clear();
    }

    // --- 摆子 ---

    pub fn place_piece(&mut self, template: TemplateId, square: Square, player: Player, is_royal: bool) -> EngineResult<()> {
        let (row, col) = square;
        if !self.config.contains(row, col) {
            return Err(EngineError::OutOfBounds { row, col });
        }
        if self.pieces.contains_key(&square) {
            return Err(EngineError::SquareOccupied { row, col });
        }
        let definition = self
            .registry
            .get(template)
            .ok_or(EngineError::UnknownTemplate(template.code()))?;
        if is_royal && self.royal_of(player).is_some() {
            return Err(EngineError::DuplicateRoyal { player });
        }

        let piece = Piece::new(template, definition, square, player, is_royal);
        self.occupancy[[row, col]] = template.code();
        self.alignment[[row, col]] = player.code();
        self.pieces.insert(square, piece);
        // 摆子后旧的落点缓存可能失效
        self.clear_selection();
        self.debug_check_invariants();
        Ok(())
    }

    pub fn place_named(&mut self, name: &str, square: Square, player: Player, is_royal: bool) -> EngineResult<()> {
        let template = self.registry.id_of(name)?;
        self.place_piece(template, square, player, is_royal)
    }

    pub fn remove_piece(&mut self, square: Square) -> EngineResult<Piece> {
        let (row, col) = square;
        let piece = self
            .pieces
            .remove(&square)
            .ok_or(EngineError::NotAPiece { row, col })?;
        self.occupancy[[row, col]] = NO_PIECE;
        self.alignment[[row, col]] = EMPTY_SQUARE;
        self.clear_selection();
        self.debug_check_invariants();
        Ok(piece)
    }

    /// 指定行棋方 (布局场景用)，同时清除选择
    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_targets.clear();
    }

    // --- 交互入口 ---

    /// 处理一次棋盘点击
    pub fn select_at(&mut self, row: usize, col: usize) -> SelectOutcome {
        if self.game_over || !self.config.contains(row, col) {
            return SelectOutcome::Ignored;
        }
        let square = (row, col);

        if let Some(from) = self.selected {
            if self.legal_targets.contains(&square) {
                if let Some(record) = self.perform_move(from, square) {
                    return SelectOutcome::Moved(record);
                }
            }
            self.clear_selection();
            return SelectOutcome::Deselected;
        }

        match self.pieces.get(&square) {
            Some(piece) if piece.player == self.turn => {
                let destinations = self
                    .resolver
                    .legal_destinations(piece, square, &self.occupancy, &self.alignment);
                self.selected = Some(square);
                self.legal_targets = destinations.clone();
                SelectOutcome::Selected { square, destinations }
            }
            _ => SelectOutcome::Ignored,
        }
    }

    /// 执行外部框架给出的动作编号
    ///
    /// 对局结束后为空操作 (`Ok(None)`)；找不到可执行该动作的棋子时
    /// 返回 `NoMatchingPiece` 且不修改棋盘。
    pub fn apply_action(&mut self, action: usize) -> EngineResult<Option<MoveRecord>> {
        if self.game_over {
            return Ok(None);
        }
        let (template, dest) = self.codec.decode(action).ok_or(EngineError::ActionOutOfRange {
            action,
            size: self.codec.action_space_size(),
        })?;

        let origin = self.find_mover(template, dest).ok_or(EngineError::NoMatchingPiece {
            action,
            template: template.index(),
            row: dest.0,
            col: dest.1,
        })?;

        Ok(self.perform_move(origin, dest))
    }

    /// 走子 / 吃子 / 终局判定的唯一实现
    ///
    /// 目标格被己方棋子占据时拒绝执行并返回 `None`，棋盘不变。
    fn perform_move(&mut self, from: Square, to: Square) -> Option<MoveRecord> {
        let mover = self.pieces.get(&from)?.player;
        if matches!(self.pieces.get(&to), Some(occupant) if occupant.player == mover) {
            return None;
        }
        let mut piece = self.pieces.remove(&from)?;

        let captured = self.pieces.remove(&to).map(|victim| CapturedPiece {
            template: victim.template,
            player: victim.player,
            was_royal: victim.is_royal,
        });

        self.occupancy[[from.0, from.1]] = NO_PIECE;
        self.alignment[[from.0, from.1]] = EMPTY_SQUARE;
        self.occupancy[[to.0, to.1]] = piece.template.code();
        self.alignment[[to.0, to.1]] = mover.code();
        piece.position = to;

        let record = MoveRecord {
            template: piece.template,
            player: mover,
            from,
            to,
            captured,
        };
        self.pieces.insert(to, piece);

        if matches!(&record.captured, Some(c) if c.was_royal) {
            self.game_over = true;
            self.winner = Some(mover);
        }

        self.clear_selection();
        self.turn = self.turn.opposite();
        self.history.push(record.clone());
        self.debug_check_invariants();
        Some(record)
    }

    /// 深拷贝当前状态 (供搜索/前瞻使用)
    pub fn clone_state(&self) -> Self {
        self.clone()
    }

    // --- 查询 ---

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.selected.is_some() {
            GamePhase::PieceSelected
        } else {
            GamePhase::AwaitingSelection
        }
    }

    /// 某格棋子的合法落点，空位返回空列表
    pub fn legal_destinations_at(&self, square: Square) -> Vec<Square> {
        match self.pieces.get(&square) {
            Some(piece) => self
                .resolver
                .legal_destinations(piece, square, &self.occupancy, &self.alignment),
            None => Vec::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn resolver(&self) -> &MovementResolver {
        &self.resolver
    }

    pub fn occupancy(&self) -> &Array2<u32> {
        &self.occupancy
    }

    pub fn alignment(&self) -> &Array2<u8> {
        &self.alignment
    }

    pub fn pieces(&self) -> &BTreeMap<Square, Piece> {
        &self.pieces
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces.get(&square)
    }

    /// 某方王的位置
    pub fn royal_of(&self, player: Player) -> Option<Square> {
        self.pieces
            .values()
            .find(|p| p.player == player && p.is_royal)
            .map(|p| p.position)
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn legal_targets(&self) -> &[Square] {
        &self.legal_targets
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 非空格子数量
    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|&&code| code != NO_PIECE).count()
    }

    // --- 输出 ---

    pub fn board_to_string(&self) -> String {
        let mut out = String::new();
        for row in self.occupancy.rows() {
            let cells: Vec<String> = row.iter().map(|code| code.to_string()).collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }
        out
    }

    pub fn print_board(&self) {
        let width = 8;
        let separator = format!("   +{}", format!("{}+", "-".repeat(width)).repeat(self.config.cols()));

        print!("\n    ");
        for c in 0..self.config.cols() {
            print!("{:^w$} ", c, w = width);
        }
        println!("\n{}", separator);
        for r in 0..self.config.rows() {
            print!("{:>2} |", r);
            for c in 0..self.config.cols() {
                match self.pieces.get(&(r, c)) {
                    None => print!("{:^w$}|", ".", w = width),
                    Some(p) => {
                        let royal = if p.is_royal { "*" } else { "" };
                        let name: String = self.registry.name_of(p.template).chars().take(5).collect();
                        let label = format!("{}_{}{}", p.player.short(), name, royal);
                        print!("{:^w$}|", label, w = width);
                    }
                }
            }
            println!("\n{}", separator);
        }
        println!("当前玩家: {}", self.turn);
        println!("已走步数: {}", self.history.len());
        if let Some(w) = self.winner {
            println!("胜者: {}", w);
        }
        println!("---------------------------------------------");
    }

    // --- 内部一致性 ---

    fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for ((r, c), &code) in self.occupancy.indexed_iter() {
            let color = self.alignment[[r, c]];
            match self.pieces.get(&(r, c)) {
                None => debug_assert!(
                    code == NO_PIECE && color == EMPTY_SQUARE,
                    "grid marks ({}, {}) occupied without a piece",
                    r,
                    c
                ),
                Some(p) => debug_assert!(
                    p.template.code() == code && p.player.code() == color && p.position == (r, c),
                    "piece at ({}, {}) disagrees with the grids",
                    r,
                    c
                ),
            }
        }
        debug_assert_eq!(self.pieces.len(), self.occupied_count());
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.config.rows() {
            for c in 0..self.config.cols() {
                if c > 0 {
                    write!(f, " ")?;
                }
                match self.pieces.get(&(r, c)) {
                    None => write!(f, "  .")?,
                    Some(p) => {
                        let royal = if p.is_royal { '*' } else { ' ' };
                        write!(f, "{}{}{}", p.player.short(), p.template.code(), royal)?
                    }
                }
            }
            writeln!(f)?;
        }
        write!(f, "turn: {}", self.turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 一个可以跳到 3x3 范围内任意格子的棋子
    fn everywhere() -> MovementPattern {
        let mut p = MovementPattern::new(3).unwrap();
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr != 0 || dc != 0 {
                    p.set(dr, dc, MoveCell::Phase).unwrap();
                }
            }
        }
        p
    }

    fn board_2x2() -> GameBoard {
        let mut reg = TemplateRegistry::new();
        reg.register(PieceTemplate::new("Jumper", everywhere())).unwrap();
        reg.register(PieceTemplate::new("King", everywhere())).unwrap();
        GameBoard::new(BoardConfig::new(2, 2).unwrap(), Arc::new(reg))
    }

    #[test]
    fn test_select_and_move() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();

        match board.select_at(0, 0) {
            SelectOutcome::Selected { destinations, .. } => {
                assert_eq!(destinations, vec![(0, 1), (1, 0), (1, 1)])
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(board.phase(), GamePhase::PieceSelected);

        assert!(matches!(board.select_at(1, 1), SelectOutcome::Moved(_)));
        assert!(board.piece_at((0, 0)).is_none());
        assert_eq!(board.occupancy()[[0, 0]], NO_PIECE);
        assert_eq!(board.occupancy()[[1, 1]], 1);
        assert_eq!(board.alignment()[[1, 1]], WHITE_PIECE);
        assert_eq!(board.piece_at((1, 1)).unwrap().position, (1, 1));
        assert_eq!(board.turn(), Player::Black);
        assert_eq!(board.selected(), None);
        assert!(board.legal_targets().is_empty());
        assert_eq!(board.phase(), GamePhase::AwaitingSelection);
    }

    #[test]
    fn test_cannot_select_opponent() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::Black, false).unwrap();
        assert_eq!(board.select_at(0, 0), SelectOutcome::Ignored);
        assert_eq!(board.selected(), None);
        assert!(board.legal_targets().is_empty());
        assert_eq!(board.select_at(1, 1), SelectOutcome::Ignored);
        assert_eq!(board.select_at(5, 0), SelectOutcome::Ignored);
    }

    #[test]
    fn test_illegal_target_deselects() {
        let mut reg = TemplateRegistry::new();
        let step = MovementPattern::new(3).unwrap().with_cells(&[(0, 1)], MoveCell::Phase).unwrap();
        reg.register(PieceTemplate::new("Step", step)).unwrap();
        let mut board = GameBoard::new(BoardConfig::new(2, 2).unwrap(), Arc::new(reg));
        board.place_named("Step", (0, 0), Player::White, false).unwrap();
        let before = board.clone_state();

        board.select_at(0, 0);
        assert_eq!(board.select_at(1, 1), SelectOutcome::Deselected);
        assert_eq!(board.selected(), None);
        assert_eq!(board.occupancy(), before.occupancy());
        assert_eq!(board.turn(), Player::White);
    }

    #[test]
    fn test_royal_capture_ends_game() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        board.place_named("King", (1, 1), Player::Black, true).unwrap();
        board.select_at(0, 0);
        match board.select_at(1, 1) {
            SelectOutcome::Moved(record) => {
                let captured = record.captured.unwrap();
                assert!(captured.was_royal);
                assert_eq!(captured.player, Player::Black);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Player::White));
        assert_eq!(board.phase(), GamePhase::GameOver);
        assert_eq!(board.occupied_count(), 1);

        let frozen = board.clone_state();
        assert_eq!(board.select_at(1, 1), SelectOutcome::Ignored);
        assert_eq!(board.apply_action(0), Ok(None));
        assert_eq!(board, frozen);
    }

    #[test]
    fn test_place_errors() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        assert_eq!(
            board.place_named("Jumper", (0, 0), Player::Black, false),
            Err(EngineError::SquareOccupied { row: 0, col: 0 })
        );
        assert_eq!(
            board.place_named("Jumper", (2, 0), Player::Black, false),
            Err(EngineError::OutOfBounds { row: 2, col: 0 })
        );
        assert!(board.place_named("Queen", (1, 0), Player::Black, false).is_err());
        assert!(board.remove_piece((1, 1)).is_err());
        assert_eq!(board.remove_piece((0, 0)).unwrap().template.index(), 0);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_second_royal_is_rejected() {
        let mut board = board_2x2();
        board.place_named("King", (0, 0), Player::White, true).unwrap();
        let before = board.clone_state();
        assert_eq!(
            board.place_named("King", (0, 1), Player::White, true),
            Err(EngineError::DuplicateRoyal { player: Player::White })
        );
        assert_eq!(board, before);
        assert_eq!(board.royal_of(Player::White), Some((0, 0)));

        // 对方与非王棋子不受限制
        board.place_named("King", (1, 1), Player::Black, true).unwrap();
        board.place_named("Jumper", (0, 1), Player::White, false).unwrap();
        assert_eq!(board.royal_of(Player::Black), Some((1, 1)));

        // 王被移除后可以重新放置
        board.remove_piece((0, 0)).unwrap();
        assert_eq!(board.royal_of(Player::White), None);
        board.place_named("King", (1, 0), Player::White, true).unwrap();
    }

    #[test]
    fn test_placing_on_cached_target_clears_selection() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        assert!(matches!(board.select_at(0, 0), SelectOutcome::Selected { .. }));

        board.place_named("King", (1, 1), Player::White, true).unwrap();
        assert_eq!(board.selected(), None);
        assert!(board.legal_targets().is_empty());
        assert_eq!(board.phase(), GamePhase::AwaitingSelection);

        // 己方王不会被吃，点击只会重新选中它
        assert!(matches!(board.select_at(1, 1), SelectOutcome::Selected { .. }));
        assert_eq!(board.pieces().len(), 2);
        assert_eq!(board.winner(), None);
        assert!(!board.is_game_over());
        assert_eq!(board.piece_at((1, 1)).unwrap().player, Player::White);
    }

    #[test]
    fn test_blocker_placed_after_selection_stops_ray() {
        let mut reg = TemplateRegistry::new();
        let rook = MovementPattern::new(7).unwrap().with_ray((0, 1), 3, MoveCell::Walk).unwrap();
        reg.register(PieceTemplate::new("Rook", rook)).unwrap();
        let mut board = GameBoard::new(BoardConfig::new(1, 4).unwrap(), Arc::new(reg));
        board.place_named("Rook", (0, 0), Player::White, false).unwrap();

        match board.select_at(0, 0) {
            SelectOutcome::Selected { destinations, .. } => assert_eq!(destinations, vec![(0, 1), (0, 2), (0, 3)]),
            other => panic!("unexpected {:?}", other),
        }
        board.place_named("Rook", (0, 1), Player::Black, false).unwrap();

        assert_eq!(board.select_at(0, 3), SelectOutcome::Ignored);
        assert_eq!(board.piece_at((0, 0)).unwrap().player, Player::White);
        assert!(board.piece_at((0, 3)).is_none());
        assert_eq!(board.legal_destinations_at((0, 0)), vec![(0, 1)]);
    }

    #[test]
    fn test_removing_any_piece_clears_selection() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        board.place_named("Jumper", (1, 1), Player::Black, false).unwrap();
        board.select_at(0, 0);
        board.remove_piece((1, 1)).unwrap();
        assert_eq!(board.selected(), None);
        assert!(board.legal_targets().is_empty());
    }

    #[test]
    fn test_move_onto_friendly_piece_is_refused() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        board.place_named("King", (0, 1), Player::White, true).unwrap();
        let before = board.clone_state();
        assert_eq!(board.perform_move((0, 0), (0, 1)), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = board_2x2();
        board.place_named("Jumper", (0, 0), Player::White, false).unwrap();
        let snapshot = board.clone_state();
        let mut copy = board.clone_state();
        copy.select_at(0, 0);
        copy.select_at(0, 1);
        assert_eq!(board, snapshot);
        assert_ne!(copy.occupancy(), board.occupancy());
        assert_eq!(copy.turn(), Player::Black);
        assert_eq!(board.turn(), Player::White);
    }

    #[test]
    fn test_text_dumps_are_deterministic() {
        let mut board = board_2x2();
        board.place_named("King", (0, 1), Player::Black, true).unwrap();
        assert_eq!(board.board_to_string(), "0 2\n0 0\n");
        assert_eq!(board.board_to_string(), board.clone_state().board_to_string());
        assert_eq!(board.to_string(), "  . b2*\n  .   .\nturn: White");
    }
}

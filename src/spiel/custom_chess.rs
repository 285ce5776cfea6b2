use ndarray::Array3;
use std::fmt;
use std::sync::Arc;

use super::{Game, GameInfo, GameState, PlayerId};
use crate::game_env::{
    registry_from_saved, BoardConfig, EngineResult, GameBoard, Layout, SavedBoard, SavedTemplate, MAX_GAME_LENGTH, NUM_PLAYERS,
};

// ==============================================================================
// --- 对局工厂 ---
// ==============================================================================

/// 以某个初始局面为起点的自定义棋类游戏
#[derive(Debug, Clone)]
pub struct CustomChessGame {
    initial: GameBoard,
    max_game_length: usize,
}

impl CustomChessGame {
    pub fn new(initial: GameBoard) -> Self {
        Self {
            initial,
            max_game_length: MAX_GAME_LENGTH,
        }
    }

    pub fn from_layout(layout: Layout) -> EngineResult<Self> {
        Ok(Self::new(layout.new_board()?))
    }

    /// 从模板存档与棋盘存档构造 (模板列表顺序即模板编号)
    pub fn from_saved(templates: &[SavedTemplate], board: &SavedBoard) -> EngineResult<Self> {
        let registry = Arc::new(registry_from_saved(templates)?);
        let config = BoardConfig::new(board.rows, board.cols)?;
        Ok(Self::new(GameBoard::from_saved(board, config, registry)?))
    }

    pub fn with_max_game_length(mut self, max_game_length: usize) -> Self {
        self.max_game_length = max_game_length;
        self
    }

    pub fn initial_board(&self) -> &GameBoard {
        &self.initial
    }
}

impl Game for CustomChessGame {
    type State = CustomChessState;

    fn info(&self) -> GameInfo {
        GameInfo {
            num_distinct_actions: self.initial.codec().action_space_size(),
            num_players: NUM_PLAYERS,
            min_utility: -1.0,
            max_utility: 1.0,
            utility_sum: 0.0,
            max_game_length: self.max_game_length,
        }
    }

    fn observation_shape(&self) -> [usize; 3] {
        self.initial.observation_shape()
    }

    fn new_initial_state(&self) -> CustomChessState {
        CustomChessState {
            board: self.initial.clone_state(),
        }
    }
}

// ==============================================================================
// --- 对局状态 ---
// ==============================================================================

/// `GameBoard` 的薄包装，所有规则都委托给棋盘
#[derive(Debug, Clone, PartialEq)]
pub struct CustomChessState {
    board: GameBoard,
}

impl CustomChessState {
    pub fn from_board(board: GameBoard) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn into_board(self) -> GameBoard {
        self.board
    }
}

impl GameState for CustomChessState {
    fn current_player(&self) -> PlayerId {
        if self.board.is_game_over() {
            PlayerId::Terminal
        } else {
            PlayerId::Player(self.board.turn().idx())
        }
    }

    fn legal_actions(&self) -> Vec<usize> {
        self.board.all_legal_actions()
    }

    fn apply_action(&mut self, action: usize) -> EngineResult<()> {
        self.board.apply_action(action)?;
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.board.is_game_over()
    }

    fn returns(&self) -> [f64; NUM_PLAYERS] {
        self.board.returns()
    }

    fn observation_tensor(&self) -> Array3<f32> {
        self.board.observation_tensor()
    }

    fn observation_string(&self) -> String {
        self.board.board_to_string()
    }

    fn action_to_string(&self, action: usize) -> String {
        self.board.action_to_string(action)
    }

    fn clone_state(&self) -> Self {
        Self {
            board: self.board.clone_state(),
        }
    }
}

impl fmt::Display for CustomChessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

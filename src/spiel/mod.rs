//! 通用双人博弈接口
//!
//! - `GameState`：单个对局状态 (当前玩家、合法动作、执行动作、终局收益、观察)
//! - `Game`：对局工厂与静态信息
//! - `CustomChessGame` / `CustomChessState`：基于 `GameBoard` 的实现
//!
//! 搜索与对局代码 (`ai`、`mcts`、`self_play`) 只依赖这里的 trait。

use ndarray::Array3;

use crate::game_env::{EngineResult, NUM_PLAYERS};

mod custom_chess;

pub use custom_chess::{CustomChessGame, CustomChessState};

/// 行棋方标识，终局后为 `Terminal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    Player(usize),
    Terminal,
}

impl PlayerId {
    pub fn index(&self) -> Option<usize> {
        match self {
            PlayerId::Player(p) => Some(*p),
            PlayerId::Terminal => None,
        }
    }
}

/// 对局静态信息
#[derive(Debug, Clone, PartialEq)]
pub struct GameInfo {
    pub num_distinct_actions: usize,
    pub num_players: usize,
    pub min_utility: f64,
    pub max_utility: f64,
    pub utility_sum: f64,
    pub max_game_length: usize,
}

pub trait GameState: Clone {
    fn current_player(&self) -> PlayerId;
    fn legal_actions(&self) -> Vec<usize>;
    fn apply_action(&mut self, action: usize) -> EngineResult<()>;
    fn is_terminal(&self) -> bool;
    /// 各玩家收益，按 `PlayerId::Player(i)` 索引
    fn returns(&self) -> [f64; NUM_PLAYERS];
    fn observation_tensor(&self) -> Array3<f32>;
    fn observation_string(&self) -> String;
    fn action_to_string(&self, action: usize) -> String;

    fn clone_state(&self) -> Self {
        self.clone()
    }
}

pub trait Game {
    type State: GameState;

    fn info(&self) -> GameInfo;
    fn observation_shape(&self) -> [usize; 3];
    fn new_initial_state(&self) -> Self::State;
}

//! # Custom Chess - 可配置棋类规则引擎
//!
//! 任意尺寸棋盘、由移动矩阵定义走法的自定义棋子、轮流行棋、吃子与吃王终局。
//!
//! ## 模块
//! - `game_env`: 棋盘状态、走法解析、动作编码、存档
//! - `spiel`: 供搜索算法使用的通用双人博弈接口
//! - `ai` / `mcts`: 随机策略与 UCT 搜索
//! - `self_play`: 对局执行与统计
//!
//! ## 使用示例
//! ```rust
//! use custom_chess::{CustomChessGame, Game, GameState, Layout};
//!
//! let game = CustomChessGame::from_layout(Layout::Gardner).unwrap();
//! let mut state = game.new_initial_state();
//! let action = state.legal_actions()[0];
//! state.apply_action(action).unwrap();
//! ```

pub mod ai;
pub mod game_env;
pub mod mcts;
pub mod self_play;
pub mod spiel;

// 重新导出核心类型，方便外部使用
pub use game_env::{
    ActionCodec, BoardConfig, EngineError, EngineResult, GameBoard, GamePhase, Layout, MoveCell, MoveRecord,
    MovementPattern, Piece, PieceTemplate, Player, SavedBoard, SavedTemplate, SelectOutcome, TemplateId,
    TemplateRegistry,
};

pub use ai::{Policy, RandomPolicy};
pub use mcts::{MctsConfig, MctsPolicy};
pub use self_play::{play_game, run_match, GameRecord, MatchSummary, PlayConfig};
pub use spiel::{CustomChessGame, CustomChessState, Game, GameInfo, GameState, PlayerId};

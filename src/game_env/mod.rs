// ==============================================================================
// --- 模块声明 ---
// ==============================================================================

pub mod actions;
pub mod board;
pub mod constants;
pub mod error;
pub mod features;
pub mod movement;
pub mod persistence;
pub mod presets;
pub mod registry;
pub mod rules;
pub mod types;

// ==============================================================================
// --- 公共 API 重导出 ---
// ==============================================================================

// 从 constants.rs 导出所有常量
pub use constants::*;

// 从 types.rs 导出所有数据类型
pub use types::{BoardConfig, MoveCell, MovementPattern, Piece, PieceTemplate, Player, Square, TemplateId};

// 从 board.rs 导出主要的棋盘结构体
pub use board::{CapturedPiece, GameBoard, GamePhase, MoveRecord, SelectOutcome};

pub use actions::ActionCodec;
pub use error::{EngineError, EngineResult};
pub use movement::MovementResolver;
pub use persistence::{registry_from_saved, registry_to_saved, SavedBoard, SavedTemplate};
pub use presets::{standard_registry, Layout};
pub use registry::TemplateRegistry;

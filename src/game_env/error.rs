use thiserror::Error;

use super::types::Player;

/// 引擎错误类型
///
/// 无效选择 (点击空位 / 对方棋子) 与非法落点 (视为取消选择) 不属于错误，
/// 它们以 `SelectOutcome` 的形式返回。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// 动作解码成功，但当前行棋方没有该模板的棋子能走到目标格
    #[error("no piece of template {template} can reach ({row}, {col}) for action {action}")]
    NoMatchingPiece {
        action: usize,
        template: usize,
        row: usize,
        col: usize,
    },

    #[error("action {action} is outside the action space of size {size}")]
    ActionOutOfRange { action: usize, size: usize },

    /// 存档尺寸与当前棋盘配置不一致
    #[error("board dimensions mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("unknown piece template code {0}")]
    UnknownTemplate(u32),

    #[error("unknown piece template name '{0}'")]
    UnknownTemplateName(String),

    #[error("piece template '{0}' is already registered")]
    DuplicateTemplate(String),

    #[error("malformed movement matrix: {0}")]
    MalformedMovement(String),

    #[error("square ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("square ({row}, {col}) is already occupied")]
    SquareOccupied { row: usize, col: usize },

    #[error("square ({row}, {col}) holds no piece")]
    NotAPiece { row: usize, col: usize },

    /// 每方至多一个王
    #[error("{player} already has a royal piece")]
    DuplicateRoyal { player: Player },

    /// 存档中的网格不一致 (形状错误、颜色缺失等)
    #[error("corrupt saved board: {0}")]
    CorruptBoard(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

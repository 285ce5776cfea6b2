// ==============================================================================
// --- 常量定义 ---
// ==============================================================================

/// 对齐网格中的空位
pub const EMPTY_SQUARE: u8 = 0;
/// 黑方在对齐网格中的编码
pub const BLACK_PIECE: u8 = 1;
/// 白方在对齐网格中的编码
pub const WHITE_PIECE: u8 = 2;

/// 占用网格中的空位 (非零值 = 棋子模板编码 = 模板索引 + 1)
pub const NO_PIECE: u32 = 0;

/// 默认棋盘行数
pub const DEFAULT_BOARD_ROWS: usize = 8;
/// 默认棋盘列数
pub const DEFAULT_BOARD_COLS: usize = 8;

/// 棋子编辑器中移动矩阵的默认边长 (15x15, 中心为 (7, 7))
pub const DEFAULT_MOVEMENT_SIZE: usize = 15;

// --- 移动矩阵的持久化编码 (来自棋子编辑器) ---

/// 不可到达 (棋盘底纹的两种颜色)
pub const CELL_CODE_EMPTY: u8 = 0;
pub const CELL_CODE_EMPTY_ALT: u8 = 255;
/// 跳跃 (phased) 落点
pub const CELL_CODE_PHASE: u8 = 15;
/// 连续 (contiguous) 射线方向
pub const CELL_CODE_WALK: u8 = 20;
/// 棋子自身位置
pub const CELL_CODE_CENTER: u8 = 60;

// --- 方向常量 ---

/// 连续移动扫描的 8 个方向: N, NE, E, SE, S, SW, W, NW
pub const RAY_DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// 外部框架的游戏长度上限 (超过后对局判为截断)
pub const MAX_GAME_LENGTH: usize = 50;

/// 玩家数量
pub const NUM_PLAYERS: usize = 2;

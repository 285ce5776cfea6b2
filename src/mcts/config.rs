// src/mcts/config.rs
// MCTS 搜索配置与结果定义

/// UCT 搜索配置参数
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// UCT 探索常数 (c)
    pub uct_c: f64,
    /// 每次决策的模拟次数
    pub max_simulations: usize,
    /// 每个叶子节点的随机 rollout 次数
    pub rollout_count: usize,
    /// 单次 rollout 的最大步数，超过后按未分胜负计
    pub max_rollout_plies: usize,
    /// 随机种子，`None` 时使用系统熵
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    /// 默认配置
    ///
    /// * uct_c: 2.0
    /// * max_simulations: 1000
    /// * rollout_count: 1
    /// * max_rollout_plies: 200
    /// * seed: None
    fn default() -> Self {
        Self {
            uct_c: 2.0,
            max_simulations: 1000,
            rollout_count: 1,
            max_rollout_plies: 200,
            seed: None,
        }
    }
}

/// 根节点某个子节点的统计
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats {
    pub action: usize,
    pub visit_count: u32,
    /// 从行动方视角的平均收益
    pub mean_value: f64,
    /// 子节点为终局时的收益
    pub outcome: Option<[f64; crate::game_env::NUM_PLAYERS]>,
}

/// MCTS 搜索结果
#[derive(Debug, Clone)]
pub struct MctsSearchResult {
    /// 选择的动作索引
    pub action: usize,
    /// 实际执行的模拟次数
    pub simulations: usize,
    /// 根节点访问次数
    pub root_visit_count: u32,
    pub children: Vec<ChildStats>,
}

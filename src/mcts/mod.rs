// src/mcts/mod.rs
// UCT 蒙特卡洛树搜索
//
// 1. 选择: 自根节点按 UCT 分数下降，未访问子节点优先
// 2. 扩展: 为叶子创建全部合法动作的子节点 (随机顺序)
// 3. 评估: 终局直接取收益，否则交给 Evaluator (默认随机 rollout)
// 4. 回传: 每个节点累计其行动方视角的收益
// 最终选择一步致胜的动作，否则选择访问次数最多的动作。

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;

pub use config::{ChildStats, MctsConfig, MctsSearchResult};
pub use evaluator::{Evaluator, RandomRolloutEvaluator};
pub use node::{MctsArena, MctsNode};
pub use search::MctsPolicy;

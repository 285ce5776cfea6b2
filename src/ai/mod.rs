//! 简单 AI 策略模块
//!
//! - `Policy`：策略接口
//! - `RandomPolicy`：随机选择任何合法动作
//! - `MctsPolicy` (见 `crate::mcts`)：UCT 搜索 + 随机 rollout

use crate::spiel::GameState;

mod random;

pub use random::RandomPolicy;

/// 策略接口：给定状态，返回一个合法动作编号 (无合法动作时为 `None`)
pub trait Policy<S: GameState> {
    fn name(&self) -> &str;

    fn choose_action(&mut self, state: &S) -> anyhow::Result<Option<usize>>;
}

// src/mcts/evaluator.rs
// 叶子节点评估接口与随机 rollout 实现

use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game_env::NUM_PLAYERS;
use crate::spiel::GameState;

/// 评估器特征 (Trait)
///
/// 返回给定状态下各玩家的估计收益，按玩家编号索引。
pub trait Evaluator {
    fn evaluate<S: GameState>(&mut self, state: &S) -> anyhow::Result<[f64; NUM_PLAYERS]>;
}

/// 随机 rollout 评估器
///
/// 从叶子状态出发随机走子直到终局 (或达到步数上限)，取多次 rollout 的平均收益。
pub struct RandomRolloutEvaluator {
    rollout_count: usize,
    max_plies: usize,
    rng: StdRng,
}

impl RandomRolloutEvaluator {
    pub fn new(rollout_count: usize, max_plies: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rollout_count: rollout_count.max(1),
            max_plies,
            rng,
        }
    }
}

impl Evaluator for RandomRolloutEvaluator {
    fn evaluate<S: GameState>(&mut self, state: &S) -> anyhow::Result<[f64; NUM_PLAYERS]> {
        let mut total = [0.0; NUM_PLAYERS];

        for _ in 0..self.rollout_count {
            let mut working = state.clone_state();
            let mut plies = 0;
            while !working.is_terminal() && plies < self.max_plies {
                let action = match working.legal_actions().choose(&mut self.rng) {
                    Some(&a) => a,
                    None => break,
                };
                working
                    .apply_action(action)
                    .with_context(|| format!("rollout 第 {} 步执行动作 {} 失败", plies, action))?;
                plies += 1;
            }
            for (sum, r) in total.iter_mut().zip(working.returns()) {
                *sum += r;
            }
        }

        let n = self.rollout_count as f64;
        Ok(total.map(|sum| sum / n))
    }
}

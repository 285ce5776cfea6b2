// src/mcts/search.rs
// UCT 搜索核心: 选择、扩展、评估、回传

use anyhow::{anyhow, Context};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::config::{ChildStats, MctsConfig, MctsSearchResult};
use super::evaluator::{Evaluator, RandomRolloutEvaluator};
use super::node::{MctsArena, MctsNode};
use crate::ai::Policy;
use crate::spiel::GameState;

/// UCT 蒙特卡洛树搜索策略
///
/// 每次决策重新建树；叶子节点由评估器 `E` 给出各玩家收益。
pub struct MctsPolicy<E: Evaluator> {
    config: MctsConfig,
    evaluator: E,
    rng: StdRng,
}

impl MctsPolicy<RandomRolloutEvaluator> {
    /// 使用随机 rollout 评估器
    pub fn with_random_rollouts(config: MctsConfig) -> Self {
        let evaluator = RandomRolloutEvaluator::new(
            config.rollout_count,
            config.max_rollout_plies,
            config.seed.map(|s| s.wrapping_add(1)),
        );
        Self::new(config, evaluator)
    }
}

impl<E: Evaluator> MctsPolicy<E> {
    pub fn new(config: MctsConfig, evaluator: E) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { config, evaluator, rng }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// 从 `root_state` 出发执行一次完整搜索
    pub fn search<S: GameState>(&mut self, root_state: &S) -> anyhow::Result<MctsSearchResult> {
        if root_state.is_terminal() {
            return Err(anyhow!("cannot search from a terminal state"));
        }
        let mut arena = MctsArena::new();
        let root_idx = arena.allocate(MctsNode::new(root_state.clone_state(), None, None, None));

        let mut simulations = 0;
        while simulations < self.config.max_simulations {
            let path = self.apply_tree_policy(&mut arena, root_idx)?;
            let leaf_idx = path[path.len() - 1];

            let returns = match arena.get(leaf_idx).outcome {
                Some(outcome) => outcome,
                None => self
                    .evaluator
                    .evaluate(&arena.get(leaf_idx).state)
                    .context("叶子节点评估失败")?,
            };

            // 回传: 每个节点累计其行动方的收益
            for &idx in path.iter().rev() {
                let node = arena.get_mut(idx);
                node.visit_count += 1;
                if let Some(p) = node.player {
                    node.total_reward += returns[p];
                }
            }
            simulations += 1;

            // 根节点存在一步致胜的子节点时无需继续搜索
            if Self::proven_child(&arena, root_idx).is_some() {
                break;
            }
        }

        let action = Self::best_action(&arena, root_idx).ok_or_else(|| anyhow!("root state has no legal actions"))?;
        let root = arena.get(root_idx);
        let children = root
            .children
            .iter()
            .map(|&idx| {
                let child = arena.get(idx);
                ChildStats {
                    action: child.action.unwrap_or_default(),
                    visit_count: child.visit_count,
                    mean_value: child.mean_value(),
                    outcome: child.outcome,
                }
            })
            .collect();

        Ok(MctsSearchResult {
            action,
            simulations,
            root_visit_count: root.visit_count,
            children,
        })
    }

    /// 从根节点沿 UCT 选择下降，直到终局节点或新扩展出的叶子
    fn apply_tree_policy<S: GameState>(&mut self, arena: &mut MctsArena<S>, root_idx: usize) -> anyhow::Result<Vec<usize>> {
        let mut path = vec![root_idx];
        let mut current = root_idx;

        loop {
            if arena.get(current).outcome.is_some() {
                break;
            }
            if !arena.get(current).is_expanded {
                self.expand(arena, current)?;
                if arena.get(current).children.is_empty() {
                    break;
                }
            }

            let next = self.select_child(arena, current);
            path.push(next);
            current = next;
            if arena.get(next).visit_count == 0 {
                break;
            }
        }
        Ok(path)
    }

    /// 为节点创建全部合法动作对应的子节点 (顺序随机打乱)
    fn expand<S: GameState>(&mut self, arena: &mut MctsArena<S>, node_idx: usize) -> anyhow::Result<()> {
        let parent_state = arena.get(node_idx).state.clone_state();
        let mover = parent_state.current_player().index();
        let mut actions = parent_state.legal_actions();
        actions.shuffle(&mut self.rng);

        let mut children = Vec::with_capacity(actions.len());
        for action in actions {
            let mut child_state = parent_state.clone_state();
            child_state
                .apply_action(action)
                .with_context(|| format!("扩展节点时执行动作 {} 失败", action))?;
            let outcome = if child_state.is_terminal() {
                Some(child_state.returns())
            } else {
                None
            };
            children.push(arena.allocate(MctsNode::new(child_state, Some(action), mover, outcome)));
        }

        let node = arena.get_mut(node_idx);
        if children.is_empty() {
            // 无子可走: 按当前收益结束
            node.outcome = Some(parent_state.returns());
        }
        node.children = children;
        node.is_expanded = true;
        Ok(())
    }

    fn select_child<S>(&self, arena: &MctsArena<S>, node_idx: usize) -> usize {
        let node = arena.get(node_idx);
        let mut best_idx = node.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child_idx in &node.children {
            let score = arena.get(child_idx).uct_score(node.visit_count, self.config.uct_c);
            if score > best_score {
                best_score = score;
                best_idx = child_idx;
            }
        }
        best_idx
    }

    fn proven_child<S>(arena: &MctsArena<S>, root_idx: usize) -> Option<usize> {
        arena
            .get(root_idx)
            .children
            .iter()
            .copied()
            .find(|&idx| arena.get(idx).is_proven_win())
    }

    /// 最终动作: 优先一步致胜，否则访问次数最多 (平局比较平均收益)
    fn best_action<S>(arena: &MctsArena<S>, root_idx: usize) -> Option<usize> {
        if let Some(idx) = Self::proven_child(arena, root_idx) {
            return arena.get(idx).action;
        }
        arena
            .get(root_idx)
            .children
            .iter()
            .map(|&idx| arena.get(idx))
            .max_by(|a, b| {
                a.visit_count
                    .cmp(&b.visit_count)
                    .then(a.mean_value().total_cmp(&b.mean_value()))
            })
            .and_then(|node| node.action)
    }
}

impl<S: GameState, E: Evaluator> Policy<S> for MctsPolicy<E> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose_action(&mut self, state: &S) -> anyhow::Result<Option<usize>> {
        if state.is_terminal() || state.legal_actions().is_empty() {
            return Ok(None);
        }
        let result = self.search(state)?;
        Ok(Some(result.action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_env::{standard_registry, BoardConfig, GameBoard, Layout, Player};
    use crate::spiel::{CustomChessGame, CustomChessState, Game};

    fn config(sims: usize) -> MctsConfig {
        MctsConfig {
            max_simulations: sims,
            max_rollout_plies: 20,
            seed: Some(42),
            ..MctsConfig::default()
        }
    }

    #[test]
    fn test_picks_immediate_royal_capture() {
        let mut board = GameBoard::new(BoardConfig::new(4, 4).unwrap(), standard_registry().unwrap());
        board.place_named("Rook", (3, 0), Player::White, false).unwrap();
        board.place_named("King", (3, 3), Player::White, true).unwrap();
        board.place_named("King", (0, 0), Player::Black, true).unwrap();
        board.place_named("Knight", (0, 3), Player::Black, false).unwrap();
        let rook = board.registry().id_of("Rook").unwrap();
        let capture = board.codec().encode(rook, (0, 0));
        let state = CustomChessState::from_board(board);

        let mut policy = MctsPolicy::with_random_rollouts(config(200));
        let result = policy.search(&state).unwrap();
        assert_eq!(result.action, capture);
        assert!(result.simulations <= 200);
        assert_eq!(policy.choose_action(&state).unwrap(), Some(capture));
    }

    #[test]
    fn test_root_statistics() {
        let state = CustomChessGame::from_layout(Layout::Gardner).unwrap().new_initial_state();
        let mut policy = MctsPolicy::with_random_rollouts(config(30));
        let result = policy.search(&state).unwrap();

        assert_eq!(result.simulations, 30);
        assert_eq!(result.root_visit_count, 30);
        assert_eq!(result.children.len(), state.legal_actions().len());
        let child_visits: u32 = result.children.iter().map(|c| c.visit_count).sum();
        assert_eq!(child_visits, 30);
        assert!(state.legal_actions().contains(&result.action));
    }

    #[test]
    fn test_terminal_state_has_no_action() {
        let mut board = GameBoard::new(BoardConfig::new(2, 2).unwrap(), standard_registry().unwrap());
        board.place_named("Rook", (1, 0), Player::White, false).unwrap();
        board.place_named("King", (0, 0), Player::Black, true).unwrap();
        let rook = board.registry().id_of("Rook").unwrap();
        board.apply_action(board.codec().encode(rook, (0, 0))).unwrap();
        let state = CustomChessState::from_board(board);

        let mut policy = MctsPolicy::with_random_rollouts(config(10));
        assert_eq!(policy.choose_action(&state).unwrap(), None);
        assert!(policy.search(&state).is_err());
    }
}

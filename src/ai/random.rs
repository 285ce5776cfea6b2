use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Policy;
use crate::spiel::GameState;

/// 随机策略：在所有合法动作中等概率选择
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// `seed` 为 `None` 时使用系统熵
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<S: GameState> Policy<S> for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, state: &S) -> anyhow::Result<Option<usize>> {
        let valid_actions = state.legal_actions();
        Ok(valid_actions.choose(&mut self.rng).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_env::Layout;
    use crate::spiel::{CustomChessGame, Game};

    #[test]
    fn test_random_choice_is_legal_and_seeded() {
        let game = CustomChessGame::from_layout(Layout::Gardner).unwrap();
        let state = game.new_initial_state();
        let legal = state.legal_actions();

        let mut a = RandomPolicy::new(Some(7));
        let mut b = RandomPolicy::new(Some(7));
        for _ in 0..10 {
            let x = a.choose_action(&state).unwrap().unwrap();
            let y = b.choose_action(&state).unwrap().unwrap();
            assert!(legal.contains(&x));
            assert_eq!(x, y);
        }
    }
}

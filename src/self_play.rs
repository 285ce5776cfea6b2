// self_play.rs - 对局执行模块
//
// 提供单局对弈与多局对战的执行逻辑，策略通过 `Policy` trait 注入

use anyhow::{anyhow, bail, Context};
use std::collections::HashMap;
use std::time::Instant;

use crate::ai::Policy;
use crate::game_env::{MAX_GAME_LENGTH, NUM_PLAYERS};
use crate::spiel::{Game, GameState};

// ================ 配置 ================

/// 对局配置
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// 最大步数，达到后按和棋截断
    pub max_game_length: usize,
    /// 为 true 时不输出过程信息
    pub quiet: bool,
    /// 开局强制执行的动作 (`action_to_string` 格式)
    pub initial_actions: Vec<String>,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            max_game_length: MAX_GAME_LENGTH,
            quiet: false,
            initial_actions: Vec::new(),
        }
    }
}

// ================ 对局结果 ================

/// 单局对弈记录
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub returns: [f64; NUM_PLAYERS],
    pub actions: Vec<usize>,
    /// 每步动作的可读形式
    pub history: Vec<String>,
    /// 是否因步数上限而截断
    pub truncated: bool,
}

impl GameRecord {
    /// 收益为正的玩家编号
    pub fn winner(&self) -> Option<usize> {
        self.returns.iter().position(|&r| r > 0.0)
    }
}

/// 多局对战统计
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub games_played: usize,
    pub distinct_games: usize,
    pub overall_wins: [usize; NUM_PLAYERS],
    pub overall_returns: [f64; NUM_PLAYERS],
    pub truncated_games: usize,
}

// ================ 执行 ================

/// 在合法动作中查找可读形式为 `text` 的动作
pub fn find_action<S: GameState>(state: &S, text: &str) -> Option<usize> {
    state
        .legal_actions()
        .into_iter()
        .find(|&a| state.action_to_string(a) == text)
}

/// 运行一局对弈，`policies[i]` 控制玩家 i
pub fn play_game<G: Game>(
    game: &G,
    policies: &mut [&mut dyn Policy<G::State>],
    config: &PlayConfig,
) -> anyhow::Result<GameRecord> {
    if policies.len() != NUM_PLAYERS {
        bail!("需要 {} 个策略，实际为 {}", NUM_PLAYERS, policies.len());
    }
    let opt_print = |msg: String| {
        if !config.quiet {
            println!("{}", msg);
        }
    };

    let mut state = game.new_initial_state();
    let mut actions = Vec::new();
    let mut history = Vec::new();

    for text in &config.initial_actions {
        let action = find_action(&state, text).ok_or_else(|| anyhow!("无效的强制动作: {}", text))?;
        state
            .apply_action(action)
            .with_context(|| format!("强制动作 {} 执行失败", text))?;
        actions.push(action);
        history.push(text.clone());
        opt_print(format!("强制动作: {}", text));
    }

    let mut truncated = false;
    while !state.is_terminal() {
        if actions.len() >= config.max_game_length {
            truncated = true;
            break;
        }
        let player = match state.current_player().index() {
            Some(p) => p,
            None => break,
        };
        let policy = &mut policies[player];
        let action = match policy
            .choose_action(&state)
            .with_context(|| format!("玩家 {} ({}) 选择动作失败", player, policy.name()))?
        {
            Some(a) => a,
            None => {
                opt_print(format!("玩家 {} 无棋可走，对局结束", player));
                break;
            }
        };

        let text = state.action_to_string(action);
        opt_print(format!("玩家 {} 选择动作: {}", player, text));
        state
            .apply_action(action)
            .with_context(|| format!("玩家 {} 的动作 {} 执行失败", player, text))?;
        actions.push(action);
        history.push(text);
    }

    let returns = if truncated { [0.0; NUM_PLAYERS] } else { state.returns() };
    opt_print(format!("最终局面:\n{}", state.observation_string()));
    opt_print(format!(
        "收益: {:?}, 步数: {}{}",
        returns,
        actions.len(),
        if truncated { " (截断)" } else { "" }
    ));

    Ok(GameRecord {
        returns,
        actions,
        history,
        truncated,
    })
}

/// 连续进行 `num_games` 局并汇总结果
pub fn run_match<G: Game>(
    game: &G,
    policies: &mut [&mut dyn Policy<G::State>],
    config: &PlayConfig,
    num_games: usize,
) -> anyhow::Result<MatchSummary> {
    let start_time = Instant::now();
    let mut histories: HashMap<String, usize> = HashMap::new();
    let mut summary = MatchSummary {
        games_played: 0,
        distinct_games: 0,
        overall_wins: [0; NUM_PLAYERS],
        overall_returns: [0.0; NUM_PLAYERS],
        truncated_games: 0,
    };

    for game_num in 0..num_games {
        let record = play_game(game, policies, config).with_context(|| format!("第 {} 局失败", game_num + 1))?;
        *histories.entry(record.history.join(" ")).or_insert(0) += 1;
        for (i, &v) in record.returns.iter().enumerate() {
            summary.overall_returns[i] += v;
            if v > 0.0 {
                summary.overall_wins[i] += 1;
            }
        }
        if record.truncated {
            summary.truncated_games += 1;
        }
        summary.games_played += 1;
    }
    summary.distinct_games = histories.len();

    if !config.quiet {
        let names: Vec<&str> = policies.iter().map(|p| p.name()).collect();
        println!("对局数: {}", summary.games_played);
        println!("不同对局数: {}", summary.distinct_games);
        println!("玩家: {}", names.join(" vs "));
        println!("总胜局: {:?}", summary.overall_wins);
        println!("总收益: {:?}", summary.overall_returns);
        println!("耗时: {:.2?}", start_time.elapsed());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomPolicy;
    use crate::game_env::{standard_registry, BoardConfig, GameBoard, Layout, Player};
    use crate::mcts::{MctsConfig, MctsPolicy};
    use crate::spiel::{CustomChessGame, CustomChessState};

    fn quiet(max_game_length: usize) -> PlayConfig {
        PlayConfig {
            max_game_length,
            quiet: true,
            ..PlayConfig::default()
        }
    }

    #[test]
    fn test_random_game_terminates_zero_sum() {
        let game = CustomChessGame::from_layout(Layout::Gardner).unwrap();
        let mut white = RandomPolicy::new(Some(1));
        let mut black = RandomPolicy::new(Some(2));
        let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];

        for _ in 0..5 {
            let record = play_game(&game, &mut policies, &quiet(50)).unwrap();
            assert!(record.actions.len() <= 50);
            assert_eq!(record.actions.len(), record.history.len());
            assert_eq!(record.returns[0] + record.returns[1], 0.0);
            if record.truncated {
                assert_eq!(record.returns, [0.0, 0.0]);
                assert_eq!(record.actions.len(), 50);
            }
        }
    }

    #[test]
    fn test_truncation_at_max_length() {
        let game = CustomChessGame::from_layout(Layout::Classic).unwrap();
        let mut white = RandomPolicy::new(Some(5));
        let mut black = RandomPolicy::new(Some(6));
        let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];
        let record = play_game(&game, &mut policies, &quiet(2)).unwrap();
        assert!(record.truncated);
        assert_eq!(record.actions.len(), 2);
        assert_eq!(record.returns, [0.0, 0.0]);
        assert_eq!(record.winner(), None);
    }

    #[test]
    fn test_forced_initial_actions() {
        let game = CustomChessGame::from_layout(Layout::Gardner).unwrap();
        let mut white = RandomPolicy::new(Some(1));
        let mut black = RandomPolicy::new(Some(2));
        let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];

        let mut config = quiet(3);
        config.initial_actions = vec!["wPawn=(3, 2)->(2, 2)".to_string()];
        let record = play_game(&game, &mut policies, &config).unwrap();
        assert_eq!(record.history[0], "wPawn=(3, 2)->(2, 2)");

        config.initial_actions = vec!["wKing=(4, 4)->(0, 0)".to_string()];
        assert!(play_game(&game, &mut policies, &config).is_err());
    }

    #[test]
    fn test_mcts_beats_random_in_won_position() {
        let mut board = GameBoard::new(BoardConfig::new(4, 4).unwrap(), standard_registry().unwrap());
        board.place_named("Queen", (3, 3), Player::White, false).unwrap();
        board.place_named("King", (3, 0), Player::White, true).unwrap();
        board.place_named("King", (0, 0), Player::Black, true).unwrap();
        let game = CustomChessGame::new(board);

        let mut white = MctsPolicy::with_random_rollouts(MctsConfig {
            max_simulations: 100,
            max_rollout_plies: 10,
            seed: Some(9),
            ..MctsConfig::default()
        });
        let mut black = RandomPolicy::new(Some(3));
        let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];
        let record = play_game(&game, &mut policies, &quiet(50)).unwrap();
        assert_eq!(record.winner(), Some(0));
        assert_eq!(record.actions.len(), 1);
    }

    #[test]
    fn test_run_match_summary() {
        let game = CustomChessGame::from_layout(Layout::Gardner).unwrap();
        let mut white = RandomPolicy::new(Some(11));
        let mut black = RandomPolicy::new(Some(12));
        let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];

        let summary = run_match(&game, &mut policies, &quiet(40), 4).unwrap();
        assert_eq!(summary.games_played, 4);
        assert!(summary.distinct_games >= 1 && summary.distinct_games <= 4);
        assert!(summary.overall_wins[0] + summary.overall_wins[1] + summary.truncated_games <= 4);
        assert_eq!(summary.overall_returns[0], -summary.overall_returns[1]);

        let mut only_one: [&mut dyn Policy<CustomChessState>; 1] = [&mut white];
        assert!(play_game(&game, &mut only_one, &quiet(10)).is_err());
    }
}

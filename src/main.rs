use anyhow::Context;
use custom_chess::*;

fn main() -> anyhow::Result<()> {
    let num_games: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("无效的对局数: {}", arg))?,
        None => 3,
    };

    println!("=== 自定义棋类引擎 (Gardner 5x5) - MCTS vs 随机 演示 ===\n");

    let game = CustomChessGame::from_layout(Layout::Gardner).context("构造预设布局失败")?;
    let info = game.info();
    println!("动作空间大小: {}", info.num_distinct_actions);
    println!("观察张量形状: {:?}", game.observation_shape());
    println!("最大步数: {}", info.max_game_length);
    game.initial_board().print_board();

    let mut white = MctsPolicy::with_random_rollouts(MctsConfig {
        max_simulations: 300,
        ..MctsConfig::default()
    });
    let mut black = RandomPolicy::default();
    let mut policies: [&mut dyn Policy<CustomChessState>; 2] = [&mut white, &mut black];

    // 第一局输出完整过程
    let record = play_game(&game, &mut policies, &PlayConfig::default())?;
    match record.winner() {
        Some(0) => println!("结果: 白方获胜"),
        Some(_) => println!("结果: 黑方获胜"),
        None => println!("结果: 和棋"),
    }
    println!("动作序列: {}\n", record.history.join(" "));

    if num_games > 1 {
        let quiet = PlayConfig {
            quiet: true,
            ..PlayConfig::default()
        };
        let summary = run_match(&game, &mut policies, &quiet, num_games - 1)?;
        println!(
            "\n后续 {} 局: 白方胜 {}，黑方胜 {}，截断 {}",
            summary.games_played, summary.overall_wins[0], summary.overall_wins[1], summary.truncated_games
        );
    }

    println!("\n演示结束。");
    Ok(())
}

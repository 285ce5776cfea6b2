// src/mcts/node.rs
// MCTS 树节点定义与内存池管理

use slab::Slab;

use crate::game_env::NUM_PLAYERS;

// ============================================================================
// 内存池架构 (基于 Slab)
// ============================================================================

/// MCTS 树节点的内存池
///
/// 所有节点存放在 Slab 中，通过 usize 索引引用。
pub struct MctsArena<S> {
    nodes: Slab<MctsNode<S>>,
}

impl<S> MctsArena<S> {
    pub fn new() -> Self {
        Self { nodes: Slab::with_capacity(1024) }
    }

    /// 为节点分配内存并返回索引
    #[inline]
    pub fn allocate(&mut self, node: MctsNode<S>) -> usize {
        self.nodes.insert(node)
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &MctsNode<S> {
        &self.nodes[idx]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> &mut MctsNode<S> {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<S> Default for MctsArena<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 节点定义 (Node Definition)
// ============================================================================

/// MCTS 树节点
///
/// `player` 是走出 `action` 到达本节点的玩家，节点上累计的收益都取该玩家视角。
#[derive(Debug, Clone)]
pub struct MctsNode<S> {
    /// 到达本节点的动作 (根节点为 None)
    pub action: Option<usize>,
    /// 执行该动作的玩家 (根节点为 None)
    pub player: Option<usize>,
    /// 访问次数 (N)
    pub visit_count: u32,
    /// 收益总和 (W)
    pub total_reward: f64,
    /// 子节点在 Arena 中的索引
    pub children: Vec<usize>,
    pub is_expanded: bool,
    /// 终局 (或无子可走) 时的收益
    pub outcome: Option<[f64; NUM_PLAYERS]>,
    /// 节点对应的对局状态
    pub state: S,
}

impl<S> MctsNode<S> {
    pub fn new(state: S, action: Option<usize>, player: Option<usize>, outcome: Option<[f64; NUM_PLAYERS]>) -> Self {
        Self {
            action,
            player,
            visit_count: 0,
            total_reward: 0.0,
            children: Vec::new(),
            is_expanded: false,
            outcome,
            state,
        }
    }

    /// 平均收益 Q = W / N，未访问时为 0
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / self.visit_count as f64
        }
    }

    /// UCT 分数: Q + c * sqrt(ln(N_parent) / N)，未访问的节点优先
    pub fn uct_score(&self, parent_visits: u32, uct_c: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let exploration = ((parent_visits.max(1) as f64).ln() / self.visit_count as f64).sqrt();
        self.mean_value() + uct_c * exploration
    }

    /// 本节点是否是 `player` 的必胜终局
    pub fn is_proven_win(&self) -> bool {
        match (self.outcome, self.player) {
            (Some(r), Some(p)) => r[p] >= 1.0,
            _ => false,
        }
    }
}

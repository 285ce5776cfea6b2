use std::collections::HashSet;

use super::board::GameBoard;
use super::constants::NUM_PLAYERS;
use super::types::*;

// ==============================================================================
// --- 规则逻辑扩展块 (合法动作、动作掩码、胜负收益) ---
// ==============================================================================

impl GameBoard {
    /// 当前行棋方全部合法动作
    ///
    /// 按棋子 (行优先) 再按落点的插入顺序排列，不保证数值有序。
    /// 对局结束后为空。
    pub fn all_legal_actions(&self) -> Vec<usize> {
        if self.is_game_over() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let mut seen = HashSet::new();

        for (&square, piece) in self.pieces().iter().filter(|(_, p)| p.player == self.turn()) {
            for dest in self.resolver().legal_destinations(piece, square, self.occupancy(), self.alignment()) {
                let action = self.codec().encode(piece.template, dest);
                if seen.insert(action) {
                    actions.push(action);
                }
            }
        }
        actions
    }

    /// 动作掩码: 长度为动作空间大小，合法动作为 1
    pub fn action_masks(&self) -> Vec<i32> {
        let mut mask = vec![0; self.codec().action_space_size()];
        self.action_masks_into(&mut mask);
        mask
    }

    pub fn action_masks_into(&self, mask: &mut [i32]) {
        for m in mask.iter_mut() {
            *m = 0;
        }
        for action in self.all_legal_actions() {
            mask[action] = 1;
        }
    }

    /// 找到当前行棋方中能走到 `dest` 的第一个 `template` 棋子 (行优先)
    ///
    /// 同一模板有多个棋子可达同一格时，取最靠前的一个。
    pub fn find_mover(&self, template: TemplateId, dest: Square) -> Option<Square> {
        for (&square, piece) in self.pieces() {
            if piece.player != self.turn() || piece.template != template {
                continue;
            }
            let destinations = self
                .resolver()
                .legal_destinations(piece, square, self.occupancy(), self.alignment());
            if destinations.contains(&dest) {
                return Some(square);
            }
        }
        None
    }

    /// 终局收益: 白方胜 [1, -1]，黑方胜 [-1, 1]，未分胜负 [0, 0]
    pub fn returns(&self) -> [f64; NUM_PLAYERS] {
        match self.winner() {
            Some(Player::White) => [1.0, -1.0],
            Some(Player::Black) => [-1.0, 1.0],
            None => [0.0, 0.0],
        }
    }

    /// 动作的可读形式，例如 `wRook=(0, 0)->(3, 0)`
    pub fn action_to_string(&self, action: usize) -> String {
        let (template, dest) = match self.codec().decode(action) {
            Some(decoded) => decoded,
            None => return format!("invalid({})", action),
        };
        let name = self.registry().name_of(template);
        match self.find_mover(template, dest) {
            Some(from) => format!(
                "{}{}=({}, {})->({}, {})",
                self.turn().short(),
                name,
                from.0,
                from.1,
                dest.0,
                dest.1
            ),
            None => format!("{}->({}, {})", name, dest.0, dest.1),
        }
    }
}

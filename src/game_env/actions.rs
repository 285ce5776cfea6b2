use super::types::{BoardConfig, Square, TemplateId};

// ==============================================================================
// --- 动作编码 ---
// ==============================================================================

/// 动作编号 = 模板索引 * rows * cols + 目标行 * cols + 目标列
///
/// 编码不包含起点；起点由棋盘在执行动作时查找。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCodec {
    num_templates: usize,
    config: BoardConfig,
}

impl ActionCodec {
    pub fn new(num_templates: usize, config: BoardConfig) -> Self {
        Self { num_templates, config }
    }

    pub fn num_templates(&self) -> usize {
        self.num_templates
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// 动作空间大小
    pub fn action_space_size(&self) -> usize {
        self.num_templates * self.config.total_squares()
    }

    pub fn encode(&self, template: TemplateId, dest: Square) -> usize {
        debug_assert!(template.index() < self.num_templates);
        debug_assert!(self.config.contains(dest.0, dest.1));
        template.index() * self.config.total_squares() + dest.0 * self.config.cols() + dest.1
    }

    pub fn decode(&self, action: usize) -> Option<(TemplateId, Square)> {
        if action >= self.action_space_size() {
            return None;
        }
        let squares = self.config.total_squares();
        let template = TemplateId::from_index(action / squares);
        let sq = action % squares;
        Some((template, (sq / self.config.cols(), sq % self.config.cols())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_formula() {
        let codec = ActionCodec::new(3, BoardConfig::new(4, 5).unwrap());
        assert_eq!(codec.action_space_size(), 60);
        assert_eq!(codec.encode(TemplateId::from_index(2), (3, 1)), 2 * 20 + 3 * 5 + 1);
        assert_eq!(codec.decode(56), Some((TemplateId::from_index(2), (3, 1))));
    }

    #[test]
    fn test_codec_is_bijective_on_domain() {
        let codec = ActionCodec::new(2, BoardConfig::new(3, 2).unwrap());
        let mut seen = vec![false; codec.action_space_size()];
        for t in 0..2 {
            for r in 0..3 {
                for c in 0..2 {
                    let id = TemplateId::from_index(t);
                    let action = codec.encode(id, (r, c));
                    assert!(!seen[action]);
                    seen[action] = true;
                    assert_eq!(codec.decode(action), Some((id, (r, c))));
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_decode_out_of_range() {
        let codec = ActionCodec::new(1, BoardConfig::new(2, 2).unwrap());
        assert_eq!(codec.decode(4), None);
        assert_eq!(ActionCodec::new(0, BoardConfig::default()).decode(0), None);
    }
}

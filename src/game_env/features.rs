use ndarray::Array3;

use super::board::GameBoard;
use super::constants::NO_PIECE;

// ==============================================================================
// --- 特征提取扩展块 (Neural Network Input) ---
// ==============================================================================

impl GameBoard {
    /// 观察张量形状: (模板数 + 1, rows, cols)
    pub fn observation_shape(&self) -> [usize; 3] {
        let (rows, cols) = self.config().dims();
        [self.registry().len() + 1, rows, cols]
    }

    /// One-hot 平面: 第 i 层标记模板索引 i 所在的格子，最后一层标记空位
    pub fn observation_tensor(&self) -> Array3<f32> {
        let [channels, rows, cols] = self.observation_shape();
        let empty_plane = channels - 1;
        let mut tensor = Array3::<f32>::zeros((channels, rows, cols));

        for ((r, c), &code) in self.occupancy().indexed_iter() {
            if code == NO_PIECE {
                tensor[[empty_plane, r, c]] = 1.0;
            } else {
                tensor[[code as usize - 1, r, c]] = 1.0;
            }
        }
        tensor
    }

    /// 展平后的观察向量 (通道优先)
    pub fn observation_vec(&self) -> Vec<f32> {
        self.observation_tensor().iter().copied().collect()
    }
}

use serde::{Deserialize, Serialize};

use super::bitvec::RankBitVec;
use crate::alphabet::SENTINEL;

/// 采样后缀数组。
///
/// 采样规则（正反两个方向一致）：行 i 被采样，当且仅当
/// `SA[i] % stride == 0`，或 `BWT[i]` 为终止符（即 SA[i] 是某条序列的起点）。
/// 后一条保证 LF 回退永远不会跨过终止符，回退步数不超过 `stride - 1`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledSuffixArray {
    marks: RankBitVec,
    values: Vec<u32>,
    stride: u32,
}

impl SampledSuffixArray {
    pub fn build(sa: &[u32], bwt: &[u8], stride: u32) -> Self {
        debug_assert_eq!(sa.len(), bwt.len());
        let sampled = |i: usize| sa[i] % stride == 0 || bwt[i] == SENTINEL;
        let marks = RankBitVec::from_fn(sa.len(), sampled);
        let values: Vec<u32> = (0..sa.len()).filter(|&i| sampled(i)).map(|i| sa[i]).collect();
        log::debug!(
            "sampled {} of {} suffix array entries (stride {})",
            values.len(),
            sa.len(),
            stride
        );
        Self { marks, values, stride }
    }

    /// 行 `row` 已采样时返回其 SA 值
    #[inline]
    pub fn get(&self, row: usize) -> Option<u32> {
        if self.marks.get(row) {
            Some(self.values[self.marks.rank1(row)])
        } else {
            None
        }
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// 采样条数
    pub fn num_samples(&self) -> usize {
        self.values.len()
    }
}

//! BWT 上的秩字典（wavelet matrix）。
//!
//! 每层一条 [`RankBitVec`]，层数为 ⌈log₂ Σ⌉。`occ`、`rank_at`、`count_less`
//! 都只做 O(log Σ) 次位向量 rank，与文本长度无关。

use serde::{Deserialize, Serialize};

use super::bitvec::RankBitVec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDictionary {
    levels: Vec<RankBitVec>,
    /// 每层 0 的个数（1 区的起点）
    zeros: Vec<usize>,
    sigma: usize,
    len: usize,
}

impl RankDictionary {
    /// 由 BWT（秩 < sigma）构建
    pub fn build(bwt: &[u8], sigma: usize) -> Self {
        let max_symbol = sigma.saturating_sub(1).max(1);
        let num_levels = (usize::BITS - max_symbol.leading_zeros()) as usize;

        let mut levels = Vec::with_capacity(num_levels);
        let mut zeros = Vec::with_capacity(num_levels);
        let mut current = bwt.to_vec();
        let mut scratch = Vec::with_capacity(bwt.len());

        for level in 0..num_levels {
            let shift = num_levels - 1 - level;
            let bv = RankBitVec::from_fn(current.len(), |i| (current[i] >> shift) & 1 == 1);
            zeros.push(bv.count_zeros());
            levels.push(bv);

            // 稳定划分：本层为 0 的在前，为 1 的在后
            scratch.clear();
            scratch.extend(current.iter().copied().filter(|&s| (s >> shift) & 1 == 0));
            scratch.extend(current.iter().copied().filter(|&s| (s >> shift) & 1 == 1));
            std::mem::swap(&mut current, &mut scratch);
        }

        Self { levels, zeros, sigma, len: bwt.len() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn sigma(&self) -> usize {
        self.sigma
    }

    #[inline]
    fn bit(&self, c: u8, level: usize) -> bool {
        (c >> (self.levels.len() - 1 - level)) & 1 == 1
    }

    /// BWT[i] 的秩
    pub fn rank_at(&self, mut i: usize) -> u8 {
        debug_assert!(i < self.len);
        let mut c = 0u8;
        for (level, bv) in self.levels.iter().enumerate() {
            c <<= 1;
            if bv.get(i) {
                c |= 1;
                i = self.zeros[level] + bv.rank1(i);
            } else {
                i = bv.rank0(i);
            }
        }
        c
    }

    /// `BWT[0, i)` 中秩 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, i: usize) -> usize {
        self.occ_pair(c, 0, i).1
    }

    /// 同时返回 `occ(c, l)` 与 `occ(c, r)`，一次自顶向下遍历完成
    pub fn occ_pair(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        if c as usize >= self.sigma {
            return (0, 0);
        }
        let (mut start, mut lo, mut hi) = (0usize, l, r);
        for (level, bv) in self.levels.iter().enumerate() {
            if self.bit(c, level) {
                let z = self.zeros[level];
                start = z + bv.rank1(start);
                lo = z + bv.rank1(lo);
                hi = z + bv.rank1(hi);
            } else {
                start = bv.rank0(start);
                lo = bv.rank0(lo);
                hi = bv.rank0(hi);
            }
        }
        (lo - start, hi - start)
    }

    /// `BWT[l, r)` 中秩严格小于 c 的符号个数
    pub fn count_less(&self, c: u8, l: usize, r: usize) -> usize {
        if c as usize >= self.sigma {
            return r - l;
        }
        let (mut lo, mut hi) = (l, r);
        let mut less = 0usize;
        for (level, bv) in self.levels.iter().enumerate() {
            if self.bit(c, level) {
                less += bv.rank0(hi) - bv.rank0(lo);
                let z = self.zeros[level];
                lo = z + bv.rank1(lo);
                hi = z + bv.rank1(hi);
            } else {
                lo = bv.rank0(lo);
                hi = bv.rank0(hi);
            }
        }
        less
    }
}

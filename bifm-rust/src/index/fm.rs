use serde::{Deserialize, Serialize};

use super::bwt::{build_bwt, count_table};
use super::rank::RankDictionary;
use super::sa::build_sa;
use super::ssa::SampledSuffixArray;
use crate::alphabet::SENTINEL;

/// 单方向 FM 索引：
/// - 字母以内部秩 [0..sigma) 编码，0 预留为终止符。
/// - Occ 由 wavelet matrix 回答，与文本长度无关。
/// - 只保存采样 SA，其余位置通过 LF 回退恢复。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FMIndex {
    pub sigma: u8,
    /// C[i] = 文本中秩 < i 的累计数量，`c[sigma] == n`
    pub c: Vec<u32>,
    /// BWT 上的秩字典
    pub occ: RankDictionary,
    /// 采样 SA
    pub ssa: SampledSuffixArray,
}

impl FMIndex {
    /// 由秩编码文本构建。完整 SA 与 BWT 只在本函数内存在。
    pub fn build(text: &[u8], sigma: usize, stride: u32) -> Self {
        let sa = build_sa(text);
        let bwt = build_bwt(text, &sa);
        let c = count_table(text, sigma);
        let ssa = SampledSuffixArray::build(&sa, &bwt, stride);
        drop(sa);
        let occ = RankDictionary::build(&bwt, sigma);
        Self { sigma: sigma as u8, c, occ, ssa }
    }

    /// 文本长度 n
    #[inline]
    pub fn len(&self) -> usize {
        self.occ.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occ.is_empty()
    }

    /// 返回 BWT[0..pos) 中 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> usize {
        self.occ.occ(c, pos)
    }

    /// BWT[row] 的秩
    #[inline]
    pub fn bwt_symbol(&self, row: usize) -> u8 {
        self.occ.rank_at(row)
    }

    /// 返回在区间 [l, r) 上向左扩展字符 c 后的新区间
    #[inline]
    pub fn rank_range(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        let c0 = self.c[c as usize] as usize;
        let (ol, or) = self.occ.occ_pair(c, l, r);
        (c0 + ol, c0 + or)
    }

    /// LF 映射：从行 `row` 回退到文本中前一个位置所在的行
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        let c = self.bwt_symbol(row);
        self.c[c as usize] as usize + self.occ(c, row)
    }

    /// 恢复行 `row` 的 SA 值（文本位置）。
    ///
    /// 采样规则保证路径上不会遇到终止符，回退步数 < stride。
    pub fn locate(&self, mut row: usize) -> usize {
        let mut steps = 0usize;
        loop {
            if let Some(pos) = self.ssa.get(row) {
                return pos as usize + steps;
            }
            debug_assert_ne!(self.bwt_symbol(row), SENTINEL);
            row = self.lf(row);
            steps += 1;
        }
    }

    /// 反向搜索精确匹配，pat 已经是内部秩编码（不应包含 0）
    pub fn backward_search(&self, pat: &[u8]) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        let mut l = 0usize;
        let mut r = self.len();
        for &a in pat.iter().rev() {
            let (nl, nr) = self.rank_range(a, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_collection(lens: &[usize], sigma: u32, seed: u32) -> Vec<u8> {
        let mut x = seed;
        let mut text = Vec::new();
        for &len in lens {
            for _ in 0..len {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                text.push(((x >> 16) % (sigma - 1)) as u8 + 1);
            }
            text.push(0);
        }
        text
    }

    fn naive_count(text: &[u8], pat: &[u8]) -> usize {
        if pat.is_empty() {
            return text.len();
        }
        text.windows(pat.len()).filter(|w| *w == pat).count()
    }

    #[test]
    fn locate_recovers_full_sa_for_every_row() {
        for stride in [1u32, 2, 3, 7, 32] {
            let text = make_collection(&[17, 1, 40, 5], 5, stride * 13);
            let sa = build_sa(&text);
            let fm = FMIndex::build(&text, 5, stride);
            for (row, &pos) in sa.iter().enumerate() {
                assert_eq!(fm.locate(row), pos as usize, "stride={} row={}", stride, row);
            }
        }
    }

    #[test]
    fn lf_steps_back_one_text_position() {
        let text = make_collection(&[30], 5, 11);
        let sa = build_sa(&text);
        let fm = FMIndex::build(&text, 5, 4);
        let mut inverse = vec![0usize; sa.len()];
        for (row, &pos) in sa.iter().enumerate() {
            inverse[pos as usize] = row;
        }
        for (row, &pos) in sa.iter().enumerate() {
            if pos > 0 {
                assert_eq!(fm.lf(row), inverse[pos as usize - 1]);
            }
        }
    }

    #[test]
    fn backward_search_counts_match_naive() {
        let text = make_collection(&[50, 20, 33], 5, 5);
        let fm = FMIndex::build(&text, 5, 8);
        let pats: [&[u8]; 6] = [&[1], &[2, 3], &[1, 1], &[4, 3, 2], &[1, 2, 3, 4], &[3, 3, 3, 3, 3, 3]];
        for pat in pats {
            let got = fm.backward_search(pat).map_or(0, |(l, r)| r - l);
            assert_eq!(got, naive_count(&text, pat), "pat={:?}", pat);
        }
    }

    #[test]
    fn count_table_ends_at_text_length() {
        let text = make_collection(&[9, 9], 4, 2);
        let fm = FMIndex::build(&text, 4, 4);
        assert_eq!(fm.c[4] as usize, text.len());
        assert_eq!(fm.len(), text.len());
        for c in 0..4u8 {
            let total = text.iter().filter(|&&t| t == c).count();
            assert_eq!(fm.occ(c, fm.len()), total);
        }
    }
}

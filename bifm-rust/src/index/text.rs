use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, SENTINEL};
use crate::error::{IndexError, Result};

/// 索引整数宽度为 u32，拼接文本（含终止符）不能超过该长度
pub const MAX_TEXT_LEN: usize = u32::MAX as usize;

/// 序列边界表：`ends[i]` 为第 i 条序列（含其终止符）在全局文本中的结束位置（开区间）。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceBounds {
    ends: Vec<u32>,
}

impl SequenceBounds {
    /// 由各序列长度（不含终止符）构造
    pub fn from_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut ends = Vec::new();
        let mut acc = 0usize;
        for len in lengths {
            acc += len + 1;
            ends.push(acc as u32);
        }
        Self { ends }
    }

    /// 序列条数
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// 全局文本长度（含全部终止符）
    pub fn text_len(&self) -> usize {
        self.ends.last().map_or(0, |&e| e as usize)
    }

    #[inline]
    fn start(&self, seq: usize) -> usize {
        if seq == 0 { 0 } else { self.ends[seq - 1] as usize }
    }

    /// 第 `seq` 条序列在全局文本中的位置区间（不含终止符）
    pub fn range(&self, seq: usize) -> Option<Range<usize>> {
        if seq >= self.ends.len() {
            return None;
        }
        let start = self.start(seq);
        Some(start..self.ends[seq] as usize - 1)
    }

    /// 第 `seq` 条序列的长度（不含终止符）
    pub fn seq_len(&self, seq: usize) -> Option<usize> {
        self.range(seq).map(|r| r.len())
    }

    /// 全局位置 -> (序列编号, 序列内偏移)。
    /// 终止符位置返回的偏移等于该序列长度。
    pub fn to_local(&self, pos: usize) -> Option<(usize, usize)> {
        let seq = self.ends.partition_point(|&e| e as usize <= pos);
        if seq >= self.ends.len() {
            return None;
        }
        Some((seq, pos - self.start(seq)))
    }

    /// 反向集合（序列顺序颠倒）的边界表
    pub fn reversed(&self) -> Self {
        Self::from_lengths((0..self.len()).rev().map(|i| self.ends[i] as usize - self.start(i) - 1))
    }
}

/// 拼接后的秩编码文本。
///
/// 每条序列之后紧跟一个终止符（秩 0），`bounds` 记录各序列位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledText {
    pub ranks: Vec<u8>,
    pub bounds: SequenceBounds,
}

impl AssembledText {
    /// 拼接一个或多条序列。
    ///
    /// 接受任意 `AsRef<[u8]>` 元素的集合：`[&str]`、`Vec<Vec<u8>>`、`[b"..."]` 等；
    /// 单条序列写作 `[seq]` 即可。
    pub fn assemble<A, I, S>(sequences: I) -> Result<Self>
    where
        A: Alphabet,
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self::assemble_with_limit::<A, I, S>(sequences, MAX_TEXT_LEN)
    }

    pub(crate) fn assemble_with_limit<A, I, S>(sequences: I, limit: usize) -> Result<Self>
    where
        A: Alphabet,
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        A::check_size()?;

        let mut ranks: Vec<u8> = Vec::new();
        let mut lengths: Vec<usize> = Vec::new();

        for (seq_id, seq) in sequences.into_iter().enumerate() {
            let seq = seq.as_ref();
            if seq.is_empty() {
                return Err(IndexError::EmptyInput { sequence: Some(seq_id) });
            }
            let total = ranks.len() + seq.len() + 1;
            if total > limit {
                return Err(IndexError::SizeOverflow { len: total, max: limit });
            }
            ranks.reserve(seq.len() + 1);
            for (position, &symbol) in seq.iter().enumerate() {
                let r = A::text_rank(symbol).ok_or(IndexError::Alphabet {
                    symbol,
                    sequence: Some(seq_id),
                    position,
                })?;
                ranks.push(r);
            }
            ranks.push(SENTINEL);
            lengths.push(seq.len());
        }

        if lengths.is_empty() {
            return Err(IndexError::EmptyInput { sequence: None });
        }

        log::debug!("assembled {} sequence(s), text length {}", lengths.len(), ranks.len());
        Ok(Self { ranks, bounds: SequenceBounds::from_lengths(lengths) })
    }

    /// 反向集合文本：序列顺序与序列内容均颠倒，终止符仍位于每条序列之后。
    ///
    /// 正向文本中 `P` 后接的符号恰好是反向文本中 `reverse(P)` 前面的符号，
    /// 双向区间更新依赖这一点。
    pub fn reversed(&self) -> Self {
        let mut ranks = Vec::with_capacity(self.ranks.len());
        for seq in (0..self.bounds.len()).rev() {
            if let Some(range) = self.bounds.range(seq) {
                ranks.extend(self.ranks[range].iter().rev());
                ranks.push(SENTINEL);
            }
        }
        Self { ranks, bounds: self.bounds.reversed() }
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Dna4;

    #[test]
    fn assemble_inserts_terminators() {
        let t = AssembledText::assemble::<Dna4, _, _>(["AC", "G"]).unwrap();
        assert_eq!(t.ranks, vec![1, 2, 0, 3, 0]);
        assert_eq!(t.bounds.len(), 2);
        assert_eq!(t.bounds.range(0), Some(0..2));
        assert_eq!(t.bounds.range(1), Some(3..4));
        assert_eq!(t.bounds.range(2), None);
        assert_eq!(t.bounds.text_len(), 5);
    }

    #[test]
    fn to_local_maps_each_position() {
        let t = AssembledText::assemble::<Dna4, _, _>(["ACG", "T", "GG"]).unwrap();
        let expected = [
            (0, 0), (0, 1), (0, 2), (0, 3),
            (1, 0), (1, 1),
            (2, 0), (2, 1), (2, 2),
        ];
        for (pos, &exp) in expected.iter().enumerate() {
            assert_eq!(t.bounds.to_local(pos), Some(exp), "pos={}", pos);
        }
        assert_eq!(t.bounds.to_local(9), None);
    }

    #[test]
    fn rejects_empty_sequence_and_empty_collection() {
        let err = AssembledText::assemble::<Dna4, _, _>(["AC", ""]).unwrap_err();
        assert_eq!(err, IndexError::EmptyInput { sequence: Some(1) });

        let none: Vec<&[u8]> = Vec::new();
        let err = AssembledText::assemble::<Dna4, _, _>(none).unwrap_err();
        assert_eq!(err, IndexError::EmptyInput { sequence: None });
    }

    #[test]
    fn rejects_foreign_symbol_with_location() {
        let err = AssembledText::assemble::<Dna4, _, _>(["ACGT", "AXA"]).unwrap_err();
        assert_eq!(err, IndexError::Alphabet { symbol: b'X', sequence: Some(1), position: 1 });
    }

    #[test]
    fn size_overflow_is_detected_before_copying() {
        let err = AssembledText::assemble_with_limit::<Dna4, _, _>(["ACGT", "ACGT"], 9).unwrap_err();
        assert_eq!(err, IndexError::SizeOverflow { len: 10, max: 9 });
        assert!(AssembledText::assemble_with_limit::<Dna4, _, _>(["ACGT", "ACGT"], 10).is_ok());
    }

    #[test]
    fn reversed_collection_flips_order_and_content() {
        let t = AssembledText::assemble::<Dna4, _, _>(["ACG", "TT"]).unwrap();
        let r = t.reversed();
        assert_eq!(r.ranks, vec![4, 4, 0, 3, 2, 1, 0]);
        assert_eq!(r.len(), t.len());
        assert_eq!(r.bounds.range(0), Some(0..2));
        assert_eq!(r.bounds.range(1), Some(3..6));
        assert_eq!(r.bounds, t.bounds.reversed());
    }

    #[test]
    fn accepts_owned_and_borrowed_collections() {
        let owned: Vec<Vec<u8>> = vec![b"acgt".to_vec(), b"GG".to_vec()];
        let a = AssembledText::assemble::<Dna4, _, _>(&owned).unwrap();
        let b = AssembledText::assemble::<Dna4, _, _>([String::from("ACGT"), String::from("gg")]).unwrap();
        assert_eq!(a, b);
    }
}

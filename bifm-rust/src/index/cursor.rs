//! 索引游标：在双向 FM 索引上逐符号扩展当前查询。
//!
//! 游标只读索引，自身状态为两个等宽半开区间加深度，可以廉价复制；
//! 并行搜索时复制游标即可，不需要任何同步。

use std::marker::PhantomData;
use std::ops::Range;

use super::bi::BiFMIndex;
use super::fm::FMIndex;
use super::text::SequenceBounds;
use crate::alphabet::Alphabet;
use crate::error::{IndexError, Result};

/// 扩展方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 在查询前端追加（正向结构上的 backward step）
    Left,
    /// 在查询末端追加（反向结构上的 backward step）
    Right,
}

/// 游标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// 空查询，区间覆盖整个后缀数组
    Empty,
    /// 已匹配长度为 depth 的片段
    Matched(usize),
    /// 区间为空，不再有匹配
    Dead,
}

/// 一次出现：序列编号与序列内偏移（0 起）。
///
/// 查询非空时 `offset < 序列长度`。空查询的游标会枚举全部文本位置，
/// 其中终止符的 `offset` 等于序列长度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurrence {
    pub sequence: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    lb: usize,
    rb: usize,
}

impl Interval {
    const EMPTY: Interval = Interval { lb: 0, rb: 0 };

    #[inline]
    fn width(self) -> usize {
        self.rb - self.lb
    }
}

/// 最近一次扩展，cycle_back / cycle_front 需要父区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastStep {
    dir: Direction,
    /// 内部秩（字母表秩 + 1）
    rank: u8,
    fwd: Interval,
    rev: Interval,
}

/// 双向游标。
///
/// 不变式：`fwd` 与 `rev` 宽度始终相同，等于当前片段的出现次数。
#[derive(Debug, Clone, Copy)]
pub struct BiFMCursor<'a, A: Alphabet> {
    index: &'a BiFMIndex<A>,
    fwd: Interval,
    rev: Interval,
    depth: usize,
    dead: bool,
    last: Option<LastStep>,
}

impl<'a, A: Alphabet> PartialEq for BiFMCursor<'a, A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.index, other.index)
            && self.fwd == other.fwd
            && self.rev == other.rev
            && self.depth == other.depth
            && self.dead == other.dead
    }
}

impl<'a, A: Alphabet> BiFMCursor<'a, A> {
    pub(crate) fn new(index: &'a BiFMIndex<A>) -> Self {
        let full = Interval { lb: 0, rb: index.size() };
        Self { index, fwd: full, rev: full, depth: 0, dead: false, last: None }
    }

    /// 从给定的父区间按内部秩 c 扩展一步；结果为空时返回 None
    fn step(&self, fwd: Interval, rev: Interval, dir: Direction, c: u8) -> Option<(Interval, Interval)> {
        match dir {
            Direction::Right => {
                let rev_fm = self.index.reverse();
                let (lb, rb) = rev_fm.rank_range(c, rev.lb, rev.rb);
                if lb >= rb {
                    return None;
                }
                // 正向区间内，后继符号更小的行都排在前面
                let smaller = rev_fm.occ.count_less(c, rev.lb, rev.rb);
                let flb = fwd.lb + smaller;
                Some((Interval { lb: flb, rb: flb + (rb - lb) }, Interval { lb, rb }))
            }
            Direction::Left => {
                let fwd_fm = self.index.forward();
                let (lb, rb) = fwd_fm.rank_range(c, fwd.lb, fwd.rb);
                if lb >= rb {
                    return None;
                }
                let smaller = fwd_fm.occ.count_less(c, fwd.lb, fwd.rb);
                let rlb = rev.lb + smaller;
                Some((Interval { lb, rb }, Interval { lb: rlb, rb: rlb + (rb - lb) }))
            }
        }
    }

    /// 按内部秩扩展；结果为空时进入 Dead，返回新的出现次数
    fn extend_rank(&mut self, dir: Direction, c: u8) -> usize {
        if self.dead {
            return 0;
        }
        let parent = LastStep { dir, rank: c, fwd: self.fwd, rev: self.rev };
        self.depth += 1;
        self.last = Some(parent);
        match self.step(self.fwd, self.rev, dir, c) {
            Some((fwd, rev)) => {
                self.fwd = fwd;
                self.rev = rev;
                fwd.width()
            }
            None => {
                self.dead = true;
                self.fwd = Interval::EMPTY;
                self.rev = Interval::EMPTY;
                0
            }
        }
    }

    fn checked_rank(symbol: u8) -> Result<u8> {
        A::text_rank(symbol).ok_or(IndexError::Alphabet { symbol, sequence: None, position: 0 })
    }

    /// 在查询末端追加 `symbol`，返回新的出现次数。
    ///
    /// 结果为空不是错误：游标进入 Dead 并返回 0。符号不在字母表中时返回
    /// `IndexError::Alphabet`，游标保持不变。
    pub fn extend_right(&mut self, symbol: u8) -> Result<usize> {
        let c = Self::checked_rank(symbol)?;
        Ok(self.extend_rank(Direction::Right, c))
    }

    /// 在查询前端追加 `symbol`，语义与 [`extend_right`](Self::extend_right) 对称
    pub fn extend_left(&mut self, symbol: u8) -> Result<usize> {
        let c = Self::checked_rank(symbol)?;
        Ok(self.extend_rank(Direction::Left, c))
    }

    /// 依次向右追加整个 `query`。先校验整个查询，失败时游标不变。
    pub fn extend_right_seq(&mut self, query: &[u8]) -> Result<usize> {
        let ranks = A::encode_query(query)?;
        for c in ranks {
            self.extend_rank(Direction::Right, c);
        }
        Ok(self.count())
    }

    /// 把整个 `query` 接到当前片段前面（从 query 末尾开始逐个向左扩展）
    pub fn extend_left_seq(&mut self, query: &[u8]) -> Result<usize> {
        let ranks = A::encode_query(query)?;
        for c in ranks.into_iter().rev() {
            self.extend_rank(Direction::Left, c);
        }
        Ok(self.count())
    }

    /// 按最小的、仍有匹配的符号扩展；不存在时返回 false 且游标不变
    fn extend_any(&mut self, dir: Direction) -> bool {
        if self.dead {
            return false;
        }
        for c in 1..A::sigma() as u8 {
            if let Some((fwd, rev)) = self.step(self.fwd, self.rev, dir, c) {
                self.last = Some(LastStep { dir, rank: c, fwd: self.fwd, rev: self.rev });
                self.fwd = fwd;
                self.rev = rev;
                self.depth += 1;
                return true;
            }
        }
        false
    }

    pub fn extend_right_any(&mut self) -> bool {
        self.extend_any(Direction::Right)
    }

    pub fn extend_left_any(&mut self) -> bool {
        self.extend_any(Direction::Left)
    }

    /// 把最近一次同方向扩展的符号替换为下一个更大的、仍有匹配的符号
    fn cycle(&mut self, dir: Direction) -> bool {
        let last = match self.last {
            Some(last) if last.dir == dir => last,
            _ => return false,
        };
        for c in last.rank + 1..A::sigma() as u8 {
            if let Some((fwd, rev)) = self.step(last.fwd, last.rev, dir, c) {
                self.fwd = fwd;
                self.rev = rev;
                self.dead = false;
                self.last = Some(LastStep { rank: c, ..last });
                return true;
            }
        }
        false
    }

    /// 替换最后一次 extend_right 的符号（深度不变）。
    /// 上一步不是向右扩展，或没有更大的可行符号时返回 false，游标不变。
    pub fn cycle_back(&mut self) -> bool {
        self.cycle(Direction::Right)
    }

    /// 替换最后一次 extend_left 的符号
    pub fn cycle_front(&mut self) -> bool {
        self.cycle(Direction::Left)
    }

    /// 当前片段的出现次数
    #[inline]
    pub fn count(&self) -> usize {
        self.fwd.width()
    }

    /// 当前片段长度
    #[inline]
    pub fn query_length(&self) -> usize {
        self.depth
    }

    /// 最近一次扩展符号的字母表秩
    pub fn last_rank(&self) -> Option<u8> {
        self.last.map(|s| s.rank - 1)
    }

    pub fn state(&self) -> CursorState {
        if self.dead {
            CursorState::Dead
        } else if self.depth == 0 {
            CursorState::Empty
        } else {
            CursorState::Matched(self.depth)
        }
    }

    /// 正向后缀数组区间 [lb, rb)
    pub fn fwd_interval(&self) -> Range<usize> {
        self.fwd.lb..self.fwd.rb
    }

    /// 反向后缀数组区间 [lb, rb)
    pub fn rev_interval(&self) -> Range<usize> {
        self.rev.lb..self.rev.rb
    }

    /// 惰性枚举全部出现位置，长度恰好为 [`count`](Self::count)。
    ///
    /// 深度为 0 时会包含终止符所在位置，其偏移等于序列长度。
    pub fn locate(&self) -> Locate<'a> {
        Locate {
            fm: self.index.forward(),
            bounds: self.index.bounds(),
            rows: self.fwd.lb..self.fwd.rb,
        }
    }

    /// 惰性枚举所有非空子节点 `(symbol, child)`，本游标不变
    pub fn children(&self, dir: Direction) -> Children<'a, A> {
        Children { parent: *self, dir, next_rank: 1 }
    }

    /// 转为只支持向左扩展的单向游标（保留当前正向区间）
    pub fn to_fwd_cursor(&self) -> FmCursor<'a, A> {
        FmCursor {
            fm: self.index.forward(),
            bounds: self.index.bounds(),
            interval: self.fwd,
            depth: self.depth,
            dead: self.dead,
            _alphabet: PhantomData,
        }
    }
}

/// `locate` 返回的惰性迭代器
#[derive(Debug, Clone)]
pub struct Locate<'a> {
    fm: &'a FMIndex,
    bounds: &'a SequenceBounds,
    rows: Range<usize>,
}

impl<'a> Iterator for Locate<'a> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        let row = self.rows.next()?;
        // 每一行恰好对应一个文本位置，to_local 对 pos < n 总有结果
        let (sequence, offset) = self.bounds.to_local(self.fm.locate(row))?;
        Some(Occurrence { sequence, offset })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for Locate<'_> {}

/// `children` 返回的惰性迭代器
#[derive(Debug, Clone)]
pub struct Children<'a, A: Alphabet> {
    parent: BiFMCursor<'a, A>,
    dir: Direction,
    next_rank: u8,
}

impl<'a, A: Alphabet> Iterator for Children<'a, A> {
    type Item = (u8, BiFMCursor<'a, A>);

    fn next(&mut self) -> Option<Self::Item> {
        while (self.next_rank as usize) < A::sigma() {
            let c = self.next_rank;
            self.next_rank += 1;
            let mut child = self.parent;
            if child.extend_rank(self.dir, c) > 0 {
                return Some((A::symbol_of(c - 1), child));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(A::sigma().saturating_sub(self.next_rank as usize)))
    }
}

/// 单向游标：只在正向结构上向左扩展，状态只有一个区间。
#[derive(Debug, Clone, Copy)]
pub struct FmCursor<'a, A: Alphabet> {
    fm: &'a FMIndex,
    bounds: &'a SequenceBounds,
    interval: Interval,
    depth: usize,
    dead: bool,
    _alphabet: PhantomData<fn() -> A>,
}

impl<'a, A: Alphabet> FmCursor<'a, A> {
    pub(crate) fn new(fm: &'a FMIndex, bounds: &'a SequenceBounds) -> Self {
        Self {
            fm,
            bounds,
            interval: Interval { lb: 0, rb: fm.len() },
            depth: 0,
            dead: false,
            _alphabet: PhantomData,
        }
    }

    fn extend_rank(&mut self, c: u8) -> usize {
        if self.dead {
            return 0;
        }
        self.depth += 1;
        let (lb, rb) = self.fm.rank_range(c, self.interval.lb, self.interval.rb);
        if lb >= rb {
            self.dead = true;
            self.interval = Interval::EMPTY;
            return 0;
        }
        self.interval = Interval { lb, rb };
        rb - lb
    }

    pub fn extend_left(&mut self, symbol: u8) -> Result<usize> {
        let c = A::text_rank(symbol).ok_or(IndexError::Alphabet { symbol, sequence: None, position: 0 })?;
        Ok(self.extend_rank(c))
    }

    pub fn extend_left_seq(&mut self, query: &[u8]) -> Result<usize> {
        let ranks = A::encode_query(query)?;
        for c in ranks.into_iter().rev() {
            self.extend_rank(c);
        }
        Ok(self.count())
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.interval.width()
    }

    #[inline]
    pub fn query_length(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> CursorState {
        if self.dead {
            CursorState::Dead
        } else if self.depth == 0 {
            CursorState::Empty
        } else {
            CursorState::Matched(self.depth)
        }
    }

    pub fn locate(&self) -> Locate<'a> {
        Locate { fm: self.fm, bounds: self.bounds, rows: self.interval.lb..self.interval.rb }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Dna4;
    use crate::config::IndexConfig;

    fn index(seqs: &[&str]) -> BiFMIndex<Dna4> {
        BiFMIndex::build(seqs, IndexConfig::with_sampling_stride(3)).unwrap()
    }

    fn naive_count(seqs: &[&str], q: &str) -> usize {
        seqs.iter()
            .map(|s| {
                let s = s.as_bytes();
                if q.len() > s.len() {
                    0
                } else {
                    s.windows(q.len()).filter(|w| *w == q.as_bytes()).count()
                }
            })
            .sum()
    }

    #[test]
    fn empty_cursor_spans_whole_text() {
        let idx = index(&["ACGT"]);
        let cur = idx.cursor();
        assert_eq!(cur.state(), CursorState::Empty);
        assert_eq!(cur.count(), 5);
        assert_eq!(cur.query_length(), 0);
        assert_eq!(cur.last_rank(), None);
        assert_eq!(cur.fwd_interval(), 0..5);
        assert_eq!(cur.rev_interval(), 0..5);
    }

    #[test]
    fn right_and_left_extensions_keep_widths_equal() {
        let seqs = ["ACGTACGGTACA", "GGTAC"];
        let idx = index(&seqs);
        let mut cur = idx.cursor();
        cur.extend_right(b'G').unwrap();
        cur.extend_left(b'C').unwrap();
        cur.extend_right(b'T').unwrap();
        assert_eq!(cur.fwd_interval().len(), cur.rev_interval().len());
        assert_eq!(cur.count(), naive_count(&seqs, "CGT"));
        assert_eq!(cur.state(), CursorState::Matched(3));
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'T'));
    }

    #[test]
    fn dead_cursor_stays_dead() {
        let idx = index(&["AAAA"]);
        let mut cur = idx.cursor();
        assert_eq!(cur.extend_right(b'C').unwrap(), 0);
        assert_eq!(cur.state(), CursorState::Dead);
        let depth = cur.query_length();
        assert_eq!(cur.extend_left(b'A').unwrap(), 0);
        assert_eq!(cur.extend_right(b'A').unwrap(), 0);
        assert_eq!(cur.query_length(), depth);
        assert_eq!(cur.state(), CursorState::Dead);
        assert!(!cur.extend_right_any());
        assert_eq!(cur.locate().count(), 0);
    }

    #[test]
    fn bad_symbol_leaves_cursor_untouched() {
        let idx = index(&["ACGT"]);
        let mut cur = idx.cursor();
        cur.extend_right(b'C').unwrap();
        let before = cur;
        assert!(matches!(cur.extend_right(b'N'), Err(IndexError::Alphabet { symbol: b'N', .. })));
        assert!(matches!(cur.extend_left(b'$'), Err(IndexError::Alphabet { .. })));
        assert!(matches!(cur.extend_right_seq(b"GTX"), Err(IndexError::Alphabet { position: 2, .. })));
        assert_eq!(cur, before);
    }

    #[test]
    fn extend_left_seq_prepends_whole_query() {
        let seqs = ["TTACGATTACG"];
        let idx = index(&seqs);
        let mut a = idx.cursor();
        a.extend_right_seq(b"CG").unwrap();
        a.extend_left_seq(b"TTA").unwrap();
        assert_eq!(a.count(), naive_count(&seqs, "TTACG"));
        let mut b = idx.cursor();
        b.extend_right_seq(b"TTACG").unwrap();
        assert_eq!(a.fwd_interval(), b.fwd_interval());
        assert_eq!(a.rev_interval(), b.rev_interval());
    }

    #[test]
    fn children_enumerate_nonempty_extensions_in_order() {
        let idx = index(&["ACAGAT"]);
        let mut cur = idx.cursor();
        cur.extend_right(b'A').unwrap();
        let kids: Vec<(u8, usize)> = cur.children(Direction::Right).map(|(s, c)| (s, c.count())).collect();
        assert_eq!(kids, vec![(b'C', 1), (b'G', 1), (b'T', 1)]);
        let left: Vec<u8> = cur.children(Direction::Left).map(|(s, _)| s).collect();
        assert_eq!(left, vec![b'C', b'G']);
        assert_eq!(cur.query_length(), 1);
        assert_eq!(cur.count(), 3);
    }

    #[test]
    fn cycle_back_walks_siblings() {
        let idx = index(&["ACAGAT"]);
        let mut cur = idx.cursor();
        cur.extend_right(b'A').unwrap();
        assert!(cur.extend_right_any());
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'C'));
        assert!(cur.cycle_back());
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'G'));
        assert!(cur.cycle_back());
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'T'));
        let before = cur;
        assert!(!cur.cycle_back());
        assert_eq!(cur, before);
        assert!(!cur.cycle_front());
        assert_eq!(cur.query_length(), 2);
    }

    #[test]
    fn extend_left_any_then_cycle_front_walks_siblings() {
        let idx = index(&["ACAGAT"]);
        let mut cur = idx.cursor();
        cur.extend_right(b'A').unwrap();
        // AA 不出现，最小的可行前驱是 C
        assert!(cur.extend_left_any());
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'C'));
        assert_eq!(cur.count(), 1);
        assert_eq!(cur.query_length(), 2);
        assert!(cur.cycle_front());
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'G'));
        assert_eq!(cur.count(), 1);
        let before = cur;
        assert!(!cur.cycle_front());
        assert_eq!(cur, before);
        assert!(!cur.cycle_back());
        assert_eq!(cur.query_length(), 2);
        let hits: Vec<Occurrence> = cur.locate().collect();
        assert_eq!(hits, vec![Occurrence { sequence: 0, offset: 3 }]);
    }

    #[test]
    fn locate_length_equals_count() {
        let idx = index(&["GATTACA", "TTA"]);
        let mut cur = idx.cursor();
        assert_eq!(cur.locate().len(), cur.count());
        cur.extend_right_seq(b"TA").unwrap();
        let mut it = cur.locate();
        assert_eq!(it.len(), 2);
        it.next();
        assert_eq!(it.size_hint(), (1, Some(1)));
        cur.extend_right(b'G').unwrap();
        assert_eq!(cur.locate().len(), 0);
    }

    #[test]
    fn cycle_front_revives_dead_branch() {
        let idx = index(&["ACAGAT"]);
        let mut cur = idx.cursor();
        cur.extend_right(b'A').unwrap();
        assert_eq!(cur.extend_left(b'A').unwrap(), 0);
        assert!(cur.cycle_front());
        assert_eq!(cur.state(), CursorState::Matched(2));
        assert_eq!(cur.last_rank(), Dna4::rank_of(b'C'));
        assert_eq!(cur.count(), 1);
    }

    #[test]
    fn fwd_cursor_matches_bidirectional_count() {
        let seqs = ["GATTACAGATTACA", "TACAT"];
        let idx = index(&seqs);
        let mut uni = idx.fwd_cursor();
        uni.extend_left_seq(b"TACA").unwrap();
        let mut bi = idx.cursor();
        bi.extend_right_seq(b"TACA").unwrap();
        assert_eq!(uni.count(), bi.count());
        assert_eq!(uni.count(), naive_count(&seqs, "TACA"));
        let mut a: Vec<Occurrence> = uni.locate().collect();
        let mut b: Vec<Occurrence> = bi.to_fwd_cursor().locate().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}

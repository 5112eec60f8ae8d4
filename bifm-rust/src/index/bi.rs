use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use super::cursor::{BiFMCursor, FmCursor, Occurrence};
use super::fm::FMIndex;
use super::text::{AssembledText, SequenceBounds};
use crate::alphabet::Alphabet;
use crate::config::IndexConfig;
use crate::error::Result;

/// 构建元信息（来源文件、序列名、命令行、时间戳），随索引一起保存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    /// 与序列编号一一对应；库调用方可以留空
    pub sequence_names: Vec<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 双向 FM 索引。
///
/// `fwd` 建立在拼接文本上，`rev` 建立在反向集合（序列顺序与内容都颠倒）上，
/// 两者共享 n、Σ 与边界表。构建完成后只读，可以在任意多个线程间共享。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct BiFMIndex<A> {
    alphabet: String,
    fwd: FMIndex,
    rev: FMIndex,
    bounds: SequenceBounds,
    config: IndexConfig,
    meta: IndexMeta,
    #[serde(skip)]
    _alphabet: PhantomData<fn() -> A>,
}

impl<A: Alphabet> BiFMIndex<A> {
    /// 由一条或多条序列构建索引。
    ///
    /// 任一错误（非法符号、空序列、长度溢出、非法配置）都会让构建整体失败。
    pub fn build<I, S>(sequences: I, config: IndexConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        config.validate()?;
        let text = AssembledText::assemble::<A, I, S>(sequences)?;
        let rev_text = text.reversed();
        let sigma = A::sigma();
        let stride = config.sampling_stride;

        let (fwd, rev) = rayon::join(
            || FMIndex::build(&text.ranks, sigma, stride),
            || FMIndex::build(&rev_text.ranks, sigma, stride),
        );

        log::info!(
            "built {} index: {} sequence(s), text length {}, {} + {} SA samples",
            A::NAME,
            text.bounds.len(),
            text.len(),
            fwd.ssa.num_samples(),
            rev.ssa.num_samples()
        );

        Ok(Self {
            alphabet: A::NAME.to_string(),
            fwd,
            rev,
            bounds: text.bounds,
            config,
            meta: IndexMeta::default(),
            _alphabet: PhantomData,
        })
    }

    /// 单条序列、默认配置
    pub fn from_sequence<S: AsRef<[u8]>>(sequence: S) -> Result<Self> {
        Self::build([sequence], IndexConfig::default())
    }

    /// 拼接文本长度 n（含全部终止符）
    #[inline]
    pub fn size(&self) -> usize {
        self.fwd.len()
    }

    /// 字母表符号数（不含终止符）
    pub fn alphabet_size(&self) -> usize {
        A::SIZE
    }

    pub fn sequence_count(&self) -> usize {
        self.bounds.len()
    }

    /// 第 i 条序列在全局文本中的位置区间（不含终止符）
    pub fn sequence_bounds(&self, i: usize) -> Option<Range<usize>> {
        self.bounds.range(i)
    }

    pub fn bounds(&self) -> &SequenceBounds {
        &self.bounds
    }

    pub fn forward(&self) -> &FMIndex {
        &self.fwd
    }

    pub fn reverse(&self) -> &FMIndex {
        &self.rev
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 空查询状态的双向游标
    pub fn cursor(&self) -> BiFMCursor<'_, A> {
        BiFMCursor::new(self)
    }

    /// 只支持向左扩展的单向游标
    pub fn fwd_cursor(&self) -> FmCursor<'_, A> {
        FmCursor::new(&self.fwd, &self.bounds)
    }

    /// 查询的出现次数
    pub fn count(&self, query: &[u8]) -> Result<usize> {
        self.cursor().extend_right_seq(query)
    }

    /// 查询的全部出现位置，按 (序列, 偏移) 排序
    pub fn locate(&self, query: &[u8]) -> Result<Vec<Occurrence>> {
        let mut cur = self.cursor();
        cur.extend_right_seq(query)?;
        let mut hits: Vec<Occurrence> = cur.locate().collect();
        hits.sort_unstable();
        Ok(hits)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("cannot create '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        w.flush()?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("cannot open '{}'", path.display()))?;
        let idx: Self = bincode::deserialize_from(BufReader::new(f))
            .with_context(|| format!("'{}' is not a valid index file", path.display()))?;
        if idx.alphabet != A::NAME {
            bail!(
                "index '{}' was built over alphabet '{}', expected '{}'",
                path.display(),
                idx.alphabet,
                A::NAME
            );
        }
        Ok(idx)
    }

    /// 索引文件中记录的字母表名称
    pub fn alphabet_name(&self) -> &str {
        &self.alphabet
    }
}

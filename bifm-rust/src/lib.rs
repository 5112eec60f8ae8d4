//! # bifm-rust
//!
//! 面向有限字母表（核酸、氨基酸等）的双向 FM 索引。
//!
//! 本 crate 提供：
//!
//! - **索引构建**：把一条或多条序列拼接为带终止符的文本，构建正向与反向
//!   两套结构（BWT 秩字典 + 采样后缀数组）
//! - **游标**：在查询两端逐符号扩展匹配区间，随时得到出现次数、枚举位置，
//!   或惰性枚举所有非空子节点，供近似匹配等外部算法遍历
//! - **持久化**：bincode 序列化的单文件索引
//!
//! ## 快速示例
//!
//! ```rust
//! use bifm_rust::alphabet::Dna4;
//! use bifm_rust::config::IndexConfig;
//! use bifm_rust::index::BiFMIndex;
//!
//! let index = BiFMIndex::<Dna4>::build(["ACGTACGTAGCT", "GATTACA"], IndexConfig::default()).unwrap();
//!
//! let mut cursor = index.cursor();
//! cursor.extend_right(b'T').unwrap();
//! cursor.extend_left(b'G').unwrap();
//! cursor.extend_right(b'A').unwrap();
//! assert_eq!(cursor.count(), 2);
//!
//! let mut hits: Vec<_> = cursor.locate().map(|o| (o.sequence, o.offset)).collect();
//! hits.sort();
//! assert_eq!(hits, vec![(0, 2), (0, 6)]);
//! ```
//!
//! ## 模块说明
//!
//! - [`alphabet`] — 字母表与秩映射
//! - [`index`] — 文本拼接、后缀数组、BWT、秩字典、采样 SA、双向索引与游标
//! - [`config`] — 构建参数
//! - [`error`] — 错误类型
//! - [`io`] — FASTA 解析（命令行使用）

pub mod alphabet;
pub mod config;
pub mod error;
pub mod index;
pub mod io;

pub use error::{IndexError, Result};

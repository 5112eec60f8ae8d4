//! 索引构建与查询：文本拼接 → 后缀数组 → BWT → 秩字典 / 采样 SA → 双向索引与游标。

pub mod bi;
pub mod bitvec;
pub mod bwt;
pub mod cursor;
pub mod fm;
pub mod rank;
pub mod sa;
pub mod ssa;
pub mod text;

pub use bi::{BiFMIndex, IndexMeta};
pub use cursor::{BiFMCursor, Children, CursorState, Direction, FmCursor, Locate, Occurrence};
pub use fm::FMIndex;

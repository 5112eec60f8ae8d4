use rayon::prelude::*;

/// 超过该长度时排序交给 rayon 并行执行
const PAR_SORT_THRESHOLD: usize = 1 << 16;

/// 构建后缀数组（倍增法，O(n log² n)）。
///
/// 输入为秩编码文本，允许包含多个 0（每条序列之后的终止符）。
/// 比较规则为普通字典序：某后缀是另一后缀的前缀时排在前面，
/// 因此相同的终止符按其后的后缀排序，得到全序。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<u32> = (0..n as u32).collect();
    // 秩从 1 开始，0 表示越过文本末尾
    let mut rank: Vec<u32> = text.iter().map(|&b| b as u32 + 1).collect();
    let mut next: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    loop {
        let key = |i: u32| {
            let i = i as usize;
            (rank[i], if i + k < n { rank[i + k] } else { 0 })
        };
        if n >= PAR_SORT_THRESHOLD {
            sa.par_sort_unstable_by_key(|&i| key(i));
        } else {
            sa.sort_unstable_by_key(|&i| key(i));
        }

        next[sa[0] as usize] = 1;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            next[b as usize] = next[a as usize] + u32::from(key(a) != key(b));
        }

        std::mem::swap(&mut rank, &mut next);
        if rank[sa[n - 1] as usize] as usize == n {
            break;
        }
        k <<= 1;
    }

    log::debug!("suffix array built: n={}, doubling rounds up to k={}", n, k);
    sa
}

use shape::TokenSequence;
use std::collections::HashMap;

/// 结构 token 频次 (label -> count)
///
/// 每个提交只构建一次，两两比较时复用。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBag {
    counts: HashMap<&'static str, u64>,
    norm_sq: u64,
}

impl TokenBag {
    pub fn from_sequence(seq: &TokenSequence) -> Self {
        let mut counts: HashMap<&'static str, u64> = HashMap::new();
        for token in seq.iter() {
            *counts.entry(token).or_insert(0) += 1;
        }
        let norm_sq = counts.values().map(|c| c * c).sum();
        Self { counts, norm_sq }
    }

    /// 不同 label 的数量
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// 余弦相似度，范围 [0, 1]
    pub fn cosine(&self, other: &TokenBag) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        // 空序列已在上面返回，这里保留范数为 0 的兜底
        if self.norm_sq == 0 || other.norm_sq == 0 {
            return 0.0;
        }

        // 只遍历较小的词表
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let dot: u64 = small
            .counts
            .iter()
            .map(|(label, count)| count * large.count(label))
            .sum();

        // dot / sqrt(|a|² |b|²)，整数累加，完全相同的频次精确得到 1.0
        let dot = dot as f64;
        ((dot / self.norm_sq as f64) * (dot / other.norm_sq as f64))
            .sqrt()
            .min(1.0)
    }
}

/// 两个 token 序列的余弦相似度
///
/// 任一序列为空时返回 0。与 token 顺序无关。
pub fn score(a: &TokenSequence, b: &TokenSequence) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    TokenBag::from_sequence(a).cosine(&TokenBag::from_sequence(b))
}

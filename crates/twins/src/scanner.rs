use crate::config::TwinsConfig;
use crate::corpus::Snippet;
use crate::scorer::TokenBag;
use rayon::prelude::*;
use serde::Serialize;
use shape::{ShapeError, Tokenizer};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid threshold {0}: expected a value between 0 and 1")]
    InvalidThreshold(f64),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] ShapeError),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// 默认阈值，只自动标记几乎相同的结构
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// 相似对，`id_a < id_b`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPair {
    pub id_a: String,
    pub id_b: String,
    pub similarity: f64,
    /// token 序列完全相同
    pub identical: bool,
}

impl SimilarPair {
    /// 规范化配对顺序
    pub fn new(a: &str, b: &str, similarity: f64, identical: bool) -> Self {
        let (id_a, id_b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            id_a: id_a.to_string(),
            id_b: id_b.to_string(),
            similarity,
            identical,
        }
    }
}

/// 因 tokenize 失败被排除的提交
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub id: String,
    pub error: ShapeError,
}

/// 扫描结果
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// 按相似度降序
    pub pairs: Vec<SimilarPair>,
    pub skipped: Vec<SkippedEntry>,
    /// 输入提交数
    pub entries: usize,
    /// 实际比较的配对数
    pub comparisons: usize,
}

/// 已 tokenize 的提交
struct Prepared<'a> {
    id: &'a str,
    bag: TokenBag,
    fingerprint: String,
}

/// 语料扫描器
pub struct Scanner {
    threshold: f64,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn from_config(config: &TwinsConfig) -> Self {
        Self::new().with_threshold(config.threshold)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 扫描所有提交，返回相似度 >= 阈值的配对
    ///
    /// 语法错误的提交不参与任何比较，记录在 `ScanReport::skipped`。
    pub fn scan(&self, entries: &[Snippet]) -> Result<ScanReport> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScanError::InvalidThreshold(self.threshold));
        }

        // 语言加载失败直接返回错误，不计入 skipped
        Tokenizer::new()?;

        let (prepared, skipped) = prepare(entries);
        let comparisons = count_comparisons(&prepared);
        let candidates = compare_all(&prepared, self.threshold);

        // 按规范化 ID 去重，同一 ID 重复出现时保留索引顺序中的第一个
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut pairs: Vec<SimilarPair> = candidates
            .into_iter()
            .filter(|p| seen.insert((p.id_a.clone(), p.id_b.clone())))
            .collect();

        pairs.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id_a.cmp(&b.id_a))
                .then_with(|| a.id_b.cmp(&b.id_b))
        });

        tracing::info!(
            "Scanned {} submissions ({} skipped), {} comparisons, {} similar pairs",
            entries.len(),
            skipped.len(),
            comparisons,
            pairs.len()
        );

        Ok(ScanReport {
            pairs,
            skipped,
            entries: entries.len(),
            comparisons,
        })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// 扫描提交，直接返回相似对
pub fn scan(entries: &[Snippet], threshold: f64) -> Result<Vec<SimilarPair>> {
    Ok(Scanner::new().with_threshold(threshold).scan(entries)?.pairs)
}

/// 并行 tokenize，每个 worker 一个 parser
fn prepare(entries: &[Snippet]) -> (Vec<Prepared<'_>>, Vec<SkippedEntry>) {
    let results: Vec<_> = entries
        .par_iter()
        .map_init(Tokenizer::new, |tokenizer, entry| match tokenizer {
            Ok(t) => t.tokenize(&entry.code),
            Err(e) => Err(e.clone()),
        })
        .collect();

    let mut prepared = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(seq) => {
                tracing::debug!("{}: {} tokens", entry.id, seq.len());
                prepared.push(Prepared {
                    id: &entry.id,
                    bag: TokenBag::from_sequence(&seq),
                    fingerprint: seq.fingerprint(),
                });
            }
            Err(error) => {
                tracing::warn!("Skipping {}: {}", entry.id, error);
                skipped.push(SkippedEntry {
                    id: entry.id.clone(),
                    error,
                });
            }
        }
    }

    (prepared, skipped)
}

/// 两两比较 (i < j)，按行并行，结果保持索引顺序
fn compare_all(prepared: &[Prepared<'_>], threshold: f64) -> Vec<SimilarPair> {
    (0..prepared.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &prepared[i];
            prepared[i + 1..]
                .iter()
                .filter(move |b| b.id != a.id)
                .filter_map(move |b| {
                    let similarity = a.bag.cosine(&b.bag);
                    (similarity >= threshold).then(|| {
                        SimilarPair::new(a.id, b.id, similarity, a.fingerprint == b.fingerprint)
                    })
                })
        })
        .collect()
}

/// 不同 ID 的配对数: C(n, 2) 减去同 ID 配对
fn count_comparisons(prepared: &[Prepared<'_>]) -> usize {
    let n = prepared.len();
    let mut per_id: HashMap<&str, usize> = HashMap::new();
    for p in prepared {
        *per_id.entry(p.id).or_insert(0) += 1;
    }
    let same_id: usize = per_id.values().map(|c| c * (c - 1) / 2).sum();
    n * n.saturating_sub(1) / 2 - same_id
}

//! twins - 结构相似提交检测
//!
//! 基于结构 token 频次余弦相似度，对提交代码两两比对

mod config;
mod corpus;
mod report;
mod scanner;
mod scorer;

pub use config::{OutputFormat, TwinsConfig};
pub use corpus::{load, load_dir, parse_json, parse_json_lines, CorpusError, Snippet};
pub use report::{format_text, round_score, to_json};
pub use scanner::{
    scan, ScanError, ScanReport, Scanner, SimilarPair, SkippedEntry, DEFAULT_THRESHOLD,
};
pub use scorer::{score, TokenBag};

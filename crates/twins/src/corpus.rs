//! 提交代码加载 - JSON / JSON Lines / 目录

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON error on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("submission #{index}: both \"student_id\" and \"code\" are required (missing {field})")]
    MissingField { index: usize, field: &'static str },
    #[error("no submissions found in {}", .0.display())]
    Empty(PathBuf),
}

pub type Result<T> = std::result::Result<T, CorpusError>;

/// 一份提交: 提交者标识 + 源码
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: String,
    pub code: String,
}

impl Snippet {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
        }
    }
}

/// 未校验的提交记录
#[derive(Debug, Deserialize)]
struct RawSubmission {
    #[serde(alias = "id")]
    student_id: Option<String>,
    code: Option<String>,
}

impl RawSubmission {
    fn accept(self, index: usize) -> Result<Snippet> {
        let id = self
            .student_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CorpusError::MissingField { index, field: "student_id" })?;
        let code = self
            .code
            .filter(|code| !code.is_empty())
            .ok_or(CorpusError::MissingField { index, field: "code" })?;
        Ok(Snippet { id, code })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCorpus {
    List(Vec<RawSubmission>),
    Wrapped { submissions: Vec<RawSubmission> },
}

/// 解析 JSON: `[{"student_id": ..., "code": ...}]` 或 `{"submissions": [...]}`
pub fn parse_json(text: &str) -> Result<Vec<Snippet>> {
    let raw: RawCorpus = serde_json::from_str(text)?;
    let submissions = match raw {
        RawCorpus::List(list) => list,
        RawCorpus::Wrapped { submissions } => submissions,
    };
    submissions
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.accept(i))
        .collect()
}

/// 解析 JSON Lines，每行一条提交，空行忽略
pub fn parse_json_lines(text: &str) -> Result<Vec<Snippet>> {
    let mut snippets = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawSubmission = serde_json::from_str(line).map_err(|source| CorpusError::JsonLine {
            line: line_no + 1,
            source,
        })?;
        snippets.push(raw.accept(snippets.len())?);
    }
    Ok(snippets)
}

/// 加载目录下所有 `.py` 文件，文件名 (不含扩展名) 作为提交者标识
pub fn load_dir(dir: &Path) -> Result<Vec<Snippet>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_python_file(path))
        .collect();
    paths.sort();

    let mut snippets = Vec::with_capacity(paths.len());
    for path in paths {
        let id = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };
        let code = std::fs::read_to_string(&path)?;
        if code.is_empty() {
            tracing::warn!("Skipping empty submission {}", path.display());
            continue;
        }
        snippets.push(Snippet { id, code });
    }

    if snippets.is_empty() {
        return Err(CorpusError::Empty(dir.to_path_buf()));
    }
    Ok(snippets)
}

/// 按路径类型加载: 目录、`.jsonl` 或 JSON
pub fn load(path: &Path) -> Result<Vec<Snippet>> {
    if path.is_dir() {
        return load_dir(path);
    }

    let text = std::fs::read_to_string(path)?;
    let is_jsonl = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("jsonl"))
        .unwrap_or(false);

    if is_jsonl {
        parse_json_lines(&text)
    } else {
        parse_json(&text)
    }
}

fn is_python_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("py"))
        .unwrap_or(false)
}

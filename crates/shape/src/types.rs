use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
    #[error("Language error: {0}")]
    Language(String),
    #[error("parser returned no tree")]
    Parse,
}

impl ShapeError {
    /// 输入本身无法解析 (而不是解析器环境问题)
    pub fn is_syntax(&self) -> bool {
        matches!(self, ShapeError::Syntax { .. })
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;

/// 结构 token 序列 - 语法树前序遍历的节点类别
///
/// 不含标识符名、字面量值、注释和空白，所以重命名变量不会改变序列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence(Vec<&'static str>);

impl TokenSequence {
    pub fn new(labels: Vec<&'static str>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.0
    }

    /// 结构指纹 (SHA256 前16位)
    ///
    /// 指纹相同即 token 序列完全相同。
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(label.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl FromIterator<&'static str> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_format() {
        let seq = TokenSequence::new(vec!["module", "expression_statement", "identifier"]);
        let fp = seq.fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = TokenSequence::new(vec!["module", "Add", "identifier"]);
        let b = TokenSequence::new(vec!["module", "identifier", "Add"]);
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_labels() {
        let a = TokenSequence::new(vec!["ab", "c"]);
        let b = TokenSequence::new(vec!["a", "bc"]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_serialize_as_array() {
        let seq = TokenSequence::new(vec!["module", "pass_statement"]);
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"["module","pass_statement"]"#);
        assert_eq!(seq.to_string(), "module pass_statement");
    }

    #[test]
    fn test_syntax_error_display() {
        let err = ShapeError::Syntax { line: 3, column: 4 };
        assert!(err.is_syntax());
        assert_eq!(err.to_string(), "syntax error at line 3, column 4");
        assert!(!ShapeError::Parse.is_syntax());
    }
}

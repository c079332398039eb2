//! shape - 代码结构 token 化
//!
//! 把 Python 代码解析成语法树，输出不含标识符和字面量的结构 token 序列

mod rules;
mod tokenizer;
mod types;
mod validate;

pub use tokenizer::{check, tokenize, Tokenizer};
pub use types::{Result, ShapeError, TokenSequence};

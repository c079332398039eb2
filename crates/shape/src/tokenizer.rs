//! 结构 tokenizer - 使用 tree-sitter 把 Python 代码转换成结构 token 序列

use crate::rules::{is_operator_field, operator_label, rule_for, TokenRule};
use crate::types::{Result, ShapeError, TokenSequence};
use crate::validate::find_invalid;
use tree_sitter::{Node, Parser, Tree};

/// 结构 tokenizer
///
/// 持有一个可复用的 tree-sitter `Parser`。`Parser` 不是 `Sync`，
/// 并行场景下每个 worker 各自创建一个。
pub struct Tokenizer {
    parser: Parser,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| ShapeError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    /// 代码 -> 结构 token 序列
    ///
    /// 语法错误返回 `ShapeError::Syntax`，调用方应把它当作"不可比较"而不是相似度 0。
    pub fn tokenize(&mut self, code: &str) -> Result<TokenSequence> {
        let tree = self.parse(code)?;
        let mut tokens = Vec::new();
        collect_tokens(tree.root_node(), &mut tokens);
        Ok(TokenSequence::new(tokens))
    }

    /// 仅检查语法
    pub fn check(&mut self, code: &str) -> Result<()> {
        self.parse(code).map(|_| ())
    }

    fn parse(&mut self, code: &str) -> Result<Tree> {
        let tree = self.parser.parse(code, None).ok_or(ShapeError::Parse)?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(first_error(root)));
        }
        if let Some(bad) = find_invalid(root) {
            return Err(syntax_error(bad));
        }

        Ok(tree)
    }
}

fn syntax_error(at: Node) -> ShapeError {
    let pos = at.start_position();
    ShapeError::Syntax {
        line: pos.row + 1,
        column: pos.column,
    }
}

/// 单次 tokenize，内部创建临时 parser
pub fn tokenize(code: &str) -> Result<TokenSequence> {
    Tokenizer::new()?.tokenize(code)
}

/// 单次语法检查
pub fn check(code: &str) -> Result<()> {
    Tokenizer::new()?.check(code)
}

/// 定位语法错误: 沿 `has_error()` 的子节点下降到最深处
///
/// MISSING 节点直接返回；落在 ERROR 节点上时优先报告其中未闭合的括号。
fn first_error(root: Node) -> Node {
    let mut node = root;

    'descend: loop {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_missing() {
                return child;
            }
            if child.has_error() {
                node = child;
                continue 'descend;
            }
        }
        break;
    }

    if node.is_error() {
        if let Some(open) = unclosed_bracket(node) {
            return open;
        }
    }
    node
}

/// ERROR 节点中第一个没有配对的左括号
fn unclosed_bracket(node: Node) -> Option<Node> {
    let mut open = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "(" | "[" | "{" => open.push(child),
            ")" | "]" | "}" => {
                open.pop();
            }
            _ => {}
        }
    }
    open.first().copied()
}

/// 单个节点的 token，返回 (token, 是否继续访问子节点)
fn visit(node: Node, field: Option<&str>) -> (Option<&'static str>, bool) {
    // 匿名节点 (关键字、标点) 只有运算符会输出
    if !node.is_named() {
        if !field.is_some_and(is_operator_field) {
            return (None, false);
        }
        // `not in` / `is not` 是两个同名的匿名节点，只输出一次
        let repeated = node
            .prev_sibling()
            .is_some_and(|prev| !prev.is_named() && prev.kind() == node.kind());
        if repeated {
            return (None, false);
        }
        let label = node
            .parent()
            .and_then(|parent| operator_label(parent.kind(), node.kind()));
        return (label, false);
    }

    match rule_for(node.kind()) {
        TokenRule::Kind => (Some(node.kind()), true),
        TokenRule::Label(label) => (Some(label), true),
        TokenRule::Operator => {
            let label = node
                .child_by_field_name("operator")
                .and_then(|op| operator_label(node.kind(), op.kind()))
                .unwrap_or(node.kind());
            (Some(label), true)
        }
        TokenRule::Skip => (None, false),
    }
}

/// 前序遍历，按源码顺序访问所有子节点
fn collect_tokens(root: Node, tokens: &mut Vec<&'static str>) {
    let mut cursor = root.walk();

    loop {
        let (token, descend) = visit(cursor.node(), cursor.field_name());
        if let Some(token) = token {
            tokens.push(token);
        }

        if descend && cursor.goto_first_child() {
            continue;
        }

        // 回溯到下一个兄弟节点
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(code: &str) -> Vec<&'static str> {
        tokenize(code).unwrap().as_slice().to_vec()
    }

    #[test]
    fn test_tokenize_binary_expression() {
        assert_eq!(
            tokens("a + b"),
            vec!["module", "expression_statement", "Add", "identifier", "Add", "identifier"]
        );
    }

    #[test]
    fn test_tokenize_function() {
        assert_eq!(
            tokens("def f(a,b): return a+b"),
            vec![
                "module",
                "function_definition",
                "identifier",
                "parameters",
                "identifier",
                "identifier",
                "block",
                "return_statement",
                "Add",
                "identifier",
                "Add",
                "identifier",
            ]
        );
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(tokens(""), vec!["module"]);
    }

    #[test]
    fn test_renamed_identifiers_and_literals() {
        let a = tokenize("def add(a, b):\n    total = a + b * 2\n    return total\n").unwrap();
        let b = tokenize("def plus(x, y):\n    s = x + y * 10\n    return s\n").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_literal_kinds_are_normalized() {
        let a = tokenize("x = 1").unwrap();
        let b = tokenize("x = 2.5").unwrap();
        let c = tokenize("x = 'hello'").unwrap();
        let d = tokenize("x = None").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_string_content_is_ignored() {
        let a = tokenize("s = \"abc\\n\"").unwrap();
        let b = tokenize("s = \"\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_formatting_and_comments_are_ignored() {
        let a = tokenize("def f(a,b): return a+b").unwrap();
        let b = tokenize("# helper\ndef f(a, b):\n    # sum\n    return a + b  # done\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_operator_kind_differs() {
        let add = tokenize("a + b").unwrap();
        let sub = tokenize("a - b").unwrap();
        assert_ne!(add, sub);
        assert!(sub.iter().any(|t| t == "Sub"));
        assert!(!sub.iter().any(|t| t == "binary_operator"));
    }

    #[test]
    fn test_unary_and_augmented_operators() {
        let seq = tokenize("x -= -y").unwrap();
        assert!(seq.iter().any(|t| t == "augmented_assignment"));
        assert!(seq.iter().any(|t| t == "Sub"));
        assert!(seq.iter().any(|t| t == "unary_operator"));
        assert!(seq.iter().any(|t| t == "USub"));
    }

    #[test]
    fn test_comparison_operators() {
        let lt = tokenize("a < b").unwrap();
        let gt = tokenize("a > b").unwrap();
        assert!(lt.iter().any(|t| t == "comparison_operator"));
        assert!(lt.iter().any(|t| t == "Lt"));
        assert_ne!(lt, gt);

        assert_ne!(tokenize("a not in b").unwrap(), tokenize("a in b").unwrap());
    }

    #[test]
    fn test_two_word_comparison_emits_one_label() {
        assert_eq!(
            tokens("a not in b"),
            vec!["module", "expression_statement", "comparison_operator", "identifier", "NotIn", "identifier"]
        );
        assert_eq!(
            tokens("a is not b"),
            vec!["module", "expression_statement", "comparison_operator", "identifier", "IsNot", "identifier"]
        );
        assert_eq!(
            tokens("a in b"),
            vec!["module", "expression_statement", "comparison_operator", "identifier", "In", "identifier"]
        );
    }

    #[test]
    fn test_boolean_operator() {
        let seq = tokenize("a and b").unwrap();
        assert!(seq.iter().any(|t| t == "boolean_operator"));
        assert!(seq.iter().any(|t| t == "And"));
    }

    #[test]
    fn test_deterministic_order() {
        let code = "for i in range(10):\n    if i % 2 == 0:\n        print(i)\n";
        assert_eq!(tokenize(code).unwrap(), tokenize(code).unwrap());
    }

    #[test]
    fn test_syntax_error() {
        let err = tokenize("def f(:\n    return").unwrap_err();
        assert!(err.is_syntax());

        let err = tokenize("x = (1, 2").unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_syntax_error_location() {
        match tokenize("x = 1\ny = = 2\n") {
            Err(ShapeError::Syntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_bracket_location() {
        match tokenize("x = (1, 2") {
            Err(ShapeError::Syntax { line, column }) => {
                assert_eq!(line, 1);
                assert!(column >= 4, "column = {}", column);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_brackets() {
        let code = "(".repeat(200_000);
        assert!(tokenize(&code).unwrap_err().is_syntax());
    }

    #[test]
    fn test_unexpected_indent() {
        match tokenize("a = 1\n    b = 2\n") {
            Err(ShapeError::Syntax { line, column }) => assert_eq!((line, column), (2, 4)),
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert!(tokenize("def f(a,b):\n    return a+b\n        x = 1\n").unwrap_err().is_syntax());
        assert!(tokenize("if x:\n        a = 1\n    b = 2\n").unwrap_err().is_syntax());
        assert!(tokenize("    x = 1\n").unwrap_err().is_syntax());
    }

    #[test]
    fn test_grammar_only_rejections() {
        for code in [
            "x := 1\n",
            "y = x := 1\n",
            "del 1\n",
            "del a, f()\n",
            "print \"x\"\n",
            "a <> b\n",
        ] {
            let err = tokenize(code).unwrap_err();
            assert!(err.is_syntax(), "{:?} -> {:?}", code, err);
        }
    }

    #[test]
    fn test_valid_layouts_are_accepted() {
        for code in [
            "a = 1; b = 2\nc = 3\n",
            "def f(): return 1\n",
            "def f():\n    x = (1,\n         2)\n    # note\n    return x\n",
            "class A:\n    def m(self):\n        pass\n\n    y = 1\n",
            "if (n := 10) > 5:\n    del a[0], b.c\n",
            "while chunk := read():\n    pass\n",
            "a, *rest = items\nx.y = z[0] = 1\n",
            "print(a)\n",
        ] {
            assert!(check(code).is_ok(), "{:?} -> {:?}", code, check(code));
        }
    }

    #[test]
    fn test_tokenizer_is_reusable() {
        let mut tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize("x = (").is_err());
        assert_eq!(tokenizer.tokenize("a + b").unwrap().len(), 6);
        assert!(tokenizer.check("a - b").is_ok());
    }
}

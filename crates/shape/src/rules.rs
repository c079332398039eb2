//! 节点规则表 - 决定每种语法节点输出什么结构 token

/// 单个节点的 token 规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRule {
    /// 输出节点自身的语法类别 (tree-sitter kind)
    Kind,
    /// 输出具体运算符种类 (Add / Sub / Mult ...)，而不是通用的 binary_operator
    Operator,
    /// 输出固定标签，用于字面量归一化
    Label(&'static str),
    /// 忽略节点及其整棵子树
    Skip,
}

/// 字面量统一输出的标签
pub const CONSTANT: &str = "constant";

/// 节点 kind -> 规则，未列出的节点使用 `TokenRule::Kind`
const NODE_RULES: &[(&str, TokenRule)] = &[
    ("binary_operator", TokenRule::Operator),
    // 字面量: 值不同但结构相同
    ("integer", TokenRule::Label(CONSTANT)),
    ("float", TokenRule::Label(CONSTANT)),
    ("string", TokenRule::Label(CONSTANT)),
    ("true", TokenRule::Label(CONSTANT)),
    ("false", TokenRule::Label(CONSTANT)),
    ("none", TokenRule::Label(CONSTANT)),
    ("ellipsis", TokenRule::Label(CONSTANT)),
    // 注释、续行、字符串内部片段不属于结构
    ("comment", TokenRule::Skip),
    ("line_continuation", TokenRule::Skip),
    ("string_start", TokenRule::Skip),
    ("string_content", TokenRule::Skip),
    ("string_end", TokenRule::Skip),
    ("escape_sequence", TokenRule::Skip),
    ("escape_interpolation", TokenRule::Skip),
];

const BINARY_OPERATORS: &[(&str, &str)] = &[
    ("+", "Add"),
    ("-", "Sub"),
    ("*", "Mult"),
    ("/", "Div"),
    ("//", "FloorDiv"),
    ("%", "Mod"),
    ("**", "Pow"),
    ("@", "MatMult"),
    ("<<", "LShift"),
    (">>", "RShift"),
    ("&", "BitAnd"),
    ("|", "BitOr"),
    ("^", "BitXor"),
];

const AUGMENTED_OPERATORS: &[(&str, &str)] = &[
    ("+=", "Add"),
    ("-=", "Sub"),
    ("*=", "Mult"),
    ("/=", "Div"),
    ("//=", "FloorDiv"),
    ("%=", "Mod"),
    ("**=", "Pow"),
    ("@=", "MatMult"),
    ("<<=", "LShift"),
    (">>=", "RShift"),
    ("&=", "BitAnd"),
    ("|=", "BitOr"),
    ("^=", "BitXor"),
];

const UNARY_OPERATORS: &[(&str, &str)] = &[
    ("+", "UAdd"),
    ("-", "USub"),
    ("~", "Invert"),
];

const BOOLEAN_OPERATORS: &[(&str, &str)] = &[
    ("and", "And"),
    ("or", "Or"),
];

// `not in` / `is not` 在语法树中是两个同名匿名节点
const COMPARISON_OPERATORS: &[(&str, &str)] = &[
    ("not in", "NotIn"),
    ("is not", "IsNot"),
    ("<", "Lt"),
    ("<=", "LtE"),
    (">", "Gt"),
    (">=", "GtE"),
    ("==", "Eq"),
    ("!=", "NotEq"),
    ("<>", "NotEq"),
    ("in", "In"),
    ("is", "Is"),
];

/// 查询节点规则
pub fn rule_for(kind: &str) -> TokenRule {
    NODE_RULES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, rule)| *rule)
        .unwrap_or(TokenRule::Kind)
}

/// 查询运算符标签
///
/// `parent_kind` 是携带运算符的节点 kind，同一个符号在不同上下文含义不同
/// (`-` 在 binary_operator 中是 Sub，在 unary_operator 中是 USub)。
pub fn operator_label(parent_kind: &str, operator: &str) -> Option<&'static str> {
    let table = match parent_kind {
        "binary_operator" => BINARY_OPERATORS,
        "augmented_assignment" => AUGMENTED_OPERATORS,
        "unary_operator" => UNARY_OPERATORS,
        "boolean_operator" => BOOLEAN_OPERATORS,
        "comparison_operator" => COMPARISON_OPERATORS,
        _ => return None,
    };
    table
        .iter()
        .find(|(op, _)| *op == operator)
        .map(|(_, label)| *label)
}

/// 是否是携带运算符的字段名
pub fn is_operator_field(field: &str) -> bool {
    field == "operator" || field == "operators"
}

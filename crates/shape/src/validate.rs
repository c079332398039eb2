//! 语法补充检查 - tree-sitter 容错接受、但 Python 3 解释器拒绝的写法

use tree_sitter::Node;

/// 不能作为赋值 / del 目标的表达式
const INVALID_TARGETS: &[&str] = &[
    "integer",
    "float",
    "string",
    "concatenated_string",
    "true",
    "false",
    "none",
    "ellipsis",
    "call",
    "await",
    "lambda",
    "binary_operator",
    "unary_operator",
    "comparison_operator",
    "boolean_operator",
    "not_operator",
    "conditional_expression",
    "named_expression",
    "dictionary",
    "set",
    "list_comprehension",
    "dictionary_comprehension",
    "set_comprehension",
    "generator_expression",
];

/// 目标容器，逐个检查其中的元素
const TARGET_GROUPS: &[&str] = &[
    "expression_list",
    "pattern_list",
    "tuple",
    "tuple_pattern",
    "list",
    "list_pattern",
    "parenthesized_expression",
    "list_splat",
    "list_splat_pattern",
];

/// Python 2 语句
const LEGACY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// 前序遍历整棵树，返回第一个不合法的节点
pub(crate) fn find_invalid(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();

    loop {
        if let Some(bad) = check_node(cursor.node()) {
            return Some(bad);
        }

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn check_node(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "module" => misaligned_statement(node, Some(0)),
        "block" => misaligned_statement(node, None),
        // 未加括号的海象表达式不能单独成句或作为赋值右值
        "named_expression" => node
            .parent()
            .filter(|p| {
                matches!(
                    p.kind(),
                    "expression_statement" | "assignment" | "augmented_assignment"
                )
            })
            .map(|_| node),
        "delete_statement" => node.named_child(0).and_then(invalid_target),
        "assignment" | "augmented_assignment" => {
            node.child_by_field_name("left").and_then(invalid_target)
        }
        "comparison_operator" => {
            let mut cursor = node.walk();
            let found = node.children(&mut cursor).find(|c| c.kind() == "<>");
            found
        }
        kind if LEGACY_STATEMENTS.contains(&kind) => Some(node),
        _ => None,
    }
}

/// 同一层语句必须对齐，分号后的同行语句除外
///
/// `column` 为 `None` 时以第一条语句的列为准。
fn misaligned_statement(container: Node<'_>, column: Option<usize>) -> Option<Node<'_>> {
    let mut expected = column;
    let mut after_semicolon = false;
    let mut cursor = container.walk();

    for child in container.children(&mut cursor) {
        if !child.is_named() {
            after_semicolon = child.kind() == ";";
            continue;
        }
        if child.kind() == "comment" || after_semicolon {
            after_semicolon = false;
            continue;
        }

        let start = child.start_position().column;
        match expected {
            Some(col) if col != start => return Some(child),
            Some(_) => {}
            None => expected = Some(start),
        }
    }

    None
}

/// 返回目标中第一个不可赋值的表达式
fn invalid_target(target: Node<'_>) -> Option<Node<'_>> {
    let mut pending = vec![target];

    while let Some(node) = pending.pop() {
        let kind = node.kind();
        if INVALID_TARGETS.contains(&kind) {
            return Some(node);
        }
        if TARGET_GROUPS.contains(&kind) {
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect();
            pending.extend(children.into_iter().rev());
        }
    }

    None
}

//! 扫描结果输出

use crate::scanner::ScanReport;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    /// `[id_a, id_b, similarity]`
    similar_pairs: Vec<(&'a str, &'a str, f64)>,
    skipped: Vec<JsonSkipped<'a>>,
}

#[derive(Serialize)]
struct JsonSkipped<'a> {
    id: &'a str,
    error: String,
}

/// 相似度保留 6 位小数
pub fn round_score(similarity: f64) -> f64 {
    (similarity * 1_000_000.0).round() / 1_000_000.0
}

/// JSON 输出: `{"similar_pairs": [["S1", "S2", 1.0]], "skipped": [...]}`
pub fn to_json(report: &ScanReport) -> serde_json::Result<String> {
    let json = JsonReport {
        similar_pairs: report
            .pairs
            .iter()
            .map(|p| (p.id_a.as_str(), p.id_b.as_str(), round_score(p.similarity)))
            .collect(),
        skipped: report
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                id: &s.id,
                error: s.error.to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&json)
}

/// 文本输出，最多显示 `max_results` 对
pub fn format_text(report: &ScanReport, threshold: f64, max_results: usize) -> String {
    let mut lines = vec![format!(
        "Found {} similar pairs (threshold: {:.0}%) among {} submissions",
        report.pairs.len(),
        threshold * 100.0,
        report.entries
    )];
    lines.push("=".repeat(60));

    for (i, pair) in report.pairs.iter().take(max_results).enumerate() {
        let marker = if pair.identical { " (identical structure)" } else { "" };
        lines.push(String::new());
        lines.push(format!("[{}] similarity: {:.2}%{}", i + 1, pair.similarity * 100.0, marker));
        lines.push(format!("  A: {}", pair.id_a));
        lines.push(format!("  B: {}", pair.id_b));
    }

    if report.pairs.len() > max_results {
        lines.push(String::new());
        lines.push(format!("... {} more pairs", report.pairs.len() - max_results));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Skipped {} submissions that failed to parse:",
            report.skipped.len()
        ));
        for s in &report.skipped {
            lines.push(format!("  {}: {}", s.id, s.error));
        }
    }

    lines.join("\n")
}

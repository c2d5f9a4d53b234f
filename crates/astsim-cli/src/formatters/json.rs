use astsim_core::SimilarityReport;
use serde_json::json;

pub fn format_json(file1: &str, file2: &str, report: &SimilarityReport) -> String {
    let blocks: Vec<serde_json::Value> = report
        .blocks
        .iter()
        .map(|m| json!({ "a": m.a, "b": m.b, "size": m.size }))
        .collect();

    let output = json!({
        "fileA": file1,
        "fileB": file2,
        "grammar": report.grammar,
        "similarity": report.similarity,
        "summary": {
            "tokensA": report.tokens_a,
            "tokensB": report.tokens_b,
            "matched": report.matched,
        },
        "blocks": blocks,
    });

    serde_json::to_string_pretty(&output).unwrap_or_default()
}

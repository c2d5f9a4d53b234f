use astsim_core::SimilarityReport;
use colored::Colorize;

pub fn format_terminal(
    file1: &str,
    file2: &str,
    report: &SimilarityReport,
    show_blocks: bool,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let header = format!("─ {file1} ↔ {file2} ({}) ", report.grammar);
    let pad_len = 55usize.saturating_sub(header.chars().count());
    lines.push(format!("┌{header}{}", "─".repeat(pad_len)).dimmed().to_string());
    lines.push("│".dimmed().to_string());

    let score = format!("{:.4}", report.similarity);
    let score = if report.similarity >= 0.8 {
        score.green().bold()
    } else if report.similarity >= 0.5 {
        score.yellow().bold()
    } else {
        score.red().bold()
    };
    lines.push(format!("{}  similarity  {score}", "│".dimmed()));
    lines.push(format!(
        "{}  tokens      {} / {}",
        "│".dimmed(),
        report.tokens_a,
        report.tokens_b
    ));
    lines.push(format!("{}  matched     {}", "│".dimmed(), report.matched));

    for (file, count) in [(file1, report.tokens_a), (file2, report.tokens_b)] {
        if count == 0 {
            lines.push(format!(
                "{}  {}",
                "│".dimmed(),
                format!("{file}: no leaf tokens (empty or unparseable)").dimmed()
            ));
        }
    }

    if show_blocks && !report.blocks.is_empty() {
        lines.push("│".dimmed().to_string());
        for m in &report.blocks {
            lines.push(format!(
                "{}  a[{}..{}] = b[{}..{}]  {}",
                "│".dimmed(),
                m.a,
                m.a + m.size,
                m.b,
                m.b + m.size,
                format!("{} tokens", m.size).dimmed()
            ));
        }
    }

    lines.push("│".dimmed().to_string());
    lines.push("└".dimmed().to_string());
    lines.join("\n")
}

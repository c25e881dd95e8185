//! Report and history formatting, plus splitting for chat size limits.

use crate::domain::analysis::Analysis;

use super::texts;

/// Reports shorter than this replace the "in progress" message in place
pub const EDIT_LIMIT_CHARS: usize = 4000;

/// Maximum size of one chunk when a report is sent in parts
pub const CHUNK_CHARS: usize = 3900;

/// Page size of the history listing
pub const HISTORY_PAGE_SIZE: i64 = 5;

/// Idea prefix shown per history entry
pub const HISTORY_IDEA_CHARS: usize = 80;

/// How a rendered report reaches the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Edit the placeholder message into the full report
    Edit(String),
    /// Delete the placeholder and send these parts in order
    Chunks(Vec<String>),
}

/// Full board report for one analysis
pub fn render_report(analysis: &Analysis) -> String {
    format!(
        "📊 РЕЗУЛЬТАТЫ АНАЛИЗА\n\n\
         💡 ИДЕЯ: {}\n\n\
         👨‍💼 ВЕРДИКТ МОДЕРАТОРА:\n{}\n\n\
         📈 СТРАТЕГИЯ:\n{}\n\n\
         💰 ФИНАНСЫ:\n{}\n\n\
         🔍 АУДИТ:\n{}\n\n\
         🌍 РЫНОК:\n{}\n",
        analysis.idea_text,
        analysis.moderator,
        analysis.strategist,
        analysis.financier,
        analysis.auditor,
        analysis.analyst,
    )
}

/// Choose between an in-place edit and chunked delivery
pub fn plan_delivery(report: String) -> Delivery {
    if report.chars().count() < EDIT_LIMIT_CHARS {
        Delivery::Edit(report)
    } else {
        Delivery::Chunks(split_chunks(&report, CHUNK_CHARS))
    }
}

/// Split `text` into consecutive parts of at most `max_chars` characters.
///
/// Parts never overlap and concatenate back to `text`.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// History listing, newest first as given
pub fn render_history(analyses: &[Analysis]) -> String {
    if analyses.is_empty() {
        return texts::HISTORY_EMPTY.to_string();
    }

    let mut text = format!("{}\n\n", texts::HISTORY_HEADER);
    for analysis in analyses {
        text.push_str("• ");
        text.push_str(&idea_preview(&analysis.idea_text));
        text.push('\n');
    }
    text
}

fn idea_preview(idea: &str) -> String {
    match idea.char_indices().nth(HISTORY_IDEA_CHARS) {
        None => idea.to_string(),
        Some((cut, _)) => format!("{}...", &idea[..cut]),
    }
}

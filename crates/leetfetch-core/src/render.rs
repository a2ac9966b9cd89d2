//! Terminal presentation of catalog matches and problem detail.

use colored::Colorize;

use crate::catalog::{CatalogEntry, Difficulty, ProblemDetail};
use crate::markup::html_to_text;

/// Render at most `limit` catalog matches, one per line.
pub fn search_results(matches: &[&CatalogEntry], limit: usize) -> String {
    let lines: Vec<String> = matches
        .iter()
        .take(limit)
        .map(|entry| {
            let paid = if entry.paid_only {
                format!(" {}", "(paid)".dimmed())
            } else {
                String::new()
            };
            format!(
                "{} {}  {}{}",
                entry.frontend_id.bold(),
                entry.title,
                difficulty_label(entry.difficulty),
                paid
            )
        })
        .collect();
    if lines.is_empty() {
        return "No matches.".red().to_string();
    }
    lines.join("\n")
}

/// Render a problem: header, metadata line, converted body, canonical URL.
pub fn problem_detail(detail: &ProblemDetail, url: &str) -> String {
    let header = format!(
        "{} {}",
        format!("#{}", detail.frontend_id).bold(),
        detail.title.bold()
    );
    let mut meta = difficulty_label(detail.difficulty);
    let tags = detail
        .tags
        .iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if !tags.is_empty() {
        meta = format!("{}  {}", meta, tags.dimmed());
    }
    let body = html_to_text(detail.content.as_deref().unwrap_or(""));
    [
        header,
        meta,
        String::new(),
        body,
        String::new(),
        url.blue().to_string(),
    ]
    .join("\n")
}

fn difficulty_label(difficulty: Difficulty) -> String {
    match difficulty {
        Difficulty::Easy => "Easy".green().to_string(),
        Difficulty::Medium => "Medium".yellow().to_string(),
        Difficulty::Hard => "Hard".red().to_string(),
        Difficulty::Unknown => "Unknown".to_string(),
    }
}

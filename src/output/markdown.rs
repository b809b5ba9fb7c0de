//! Markdown summary generation
//!
//! This module generates human-readable markdown reports of crawl results,
//! including traversal statistics, document statistics and leaderboards.

use crate::output::summary::{CrawlSummary, DocumentBrief, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote crawl report to {}", output_path.display());
    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# PDF Scout Crawl Summary\n\n");

    // Run information
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds ({:.2} minutes)\n",
        summary.elapsed_seconds,
        summary.elapsed_seconds / 60.0
    ));
    md.push_str(&format!(
        "- **Status**: {}\n\n",
        if summary.interrupted {
            "interrupted"
        } else {
            "completed"
        }
    ));

    // Traversal statistics
    md.push_str("## Crawl Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Crawled | {} |\n", summary.pages_crawled));
    md.push_str(&format!(
        "| Pages per Second | {:.2} |\n",
        summary.pages_per_second
    ));
    md.push_str(&format!("| Errors | {} |\n", summary.errors_count));
    md.push_str(&format!("| Error Rate | {:.2}% |\n", summary.error_rate()));
    md.push_str(&format!(
        "| Duplicate URLs Skipped | {} |\n",
        summary.duplicate_urls_skipped
    ));
    md.push_str(&format!(
        "| External URLs Skipped | {} |\n",
        summary.external_urls_skipped
    ));
    md.push_str(&format!(
        "| Blocked by robots.txt | {} |\n",
        summary.robots_blocked_urls
    ));
    md.push_str(&format!("| Unique Domains | {} |\n\n", summary.unique_domains));

    // Document statistics
    md.push_str("## Documents\n\n");
    md.push_str(&format!("- **Total PDFs**: {}\n", summary.total_pdfs));
    md.push_str(&format!("- **PDFs per Page**: {:.2}\n", summary.pdfs_per_page()));
    md.push_str(&format!(
        "- **Total Size**: {:.2} MB\n",
        summary.total_size_bytes as f64 / (1024.0 * 1024.0)
    ));
    if let Some(average) = summary.average_size_bytes {
        md.push_str(&format!(
            "- **Average Size**: {:.2} MB\n",
            average / (1024.0 * 1024.0)
        ));
    }
    md.push_str(&format!(
        "- **Average Confidence**: {:.2}\n",
        summary.average_confidence
    ));
    md.push_str(&format!("- **With Author**: {}\n", summary.pdfs_with_authors));
    md.push_str(&format!("- **With ISBN**: {}\n\n", summary.pdfs_with_isbn));

    if summary.total_pdfs > 0 {
        md.push_str("| Size Class | Count |\n");
        md.push_str("|------------|-------|\n");
        md.push_str(&format!("| Small (< 1 MB) | {} |\n", summary.size_buckets.small));
        md.push_str(&format!(
            "| Medium (1-10 MB) | {} |\n",
            summary.size_buckets.medium
        ));
        md.push_str(&format!("| Large (>= 10 MB) | {} |\n", summary.size_buckets.large));
        md.push_str(&format!("| Unknown | {} |\n\n", summary.size_buckets.unknown));
    }

    if !summary.pdfs_by_domain.is_empty() {
        md.push_str("## PDFs by Domain\n\n");
        md.push_str("| Domain | PDFs |\n");
        md.push_str("|--------|------|\n");
        for (domain, count) in &summary.pdfs_by_domain {
            md.push_str(&format!("| {} | {} |\n", domain, count));
        }
        md.push('\n');
    }

    push_leaderboard(&mut md, "Largest PDFs", &summary.largest, |brief| {
        format!(
            "{:.2} MB",
            brief.file_size_bytes.unwrap_or(0) as f64 / (1024.0 * 1024.0)
        )
    });
    push_leaderboard(&mut md, "Most Recently Discovered", &summary.most_recent, |brief| {
        brief.discovered_at.format("%Y-%m-%d %H:%M:%S").to_string()
    });
    push_leaderboard(&mut md, "Highest Confidence", &summary.top_confidence, |brief| {
        format!("{:.2}", brief.confidence_score)
    });

    if !summary.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for failed in summary.failed_urls.iter().take(50) {
            md.push_str(&format!("| {} | {} |\n", failed.url, escape_cell(&failed.reason)));
        }
        if summary.failed_urls.len() > 50 {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.failed_urls.len() - 50
            ));
        }
        md.push('\n');
    }

    md
}

fn push_leaderboard(
    md: &mut String,
    heading: &str,
    briefs: &[DocumentBrief],
    value: impl Fn(&DocumentBrief) -> String,
) {
    if briefs.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    md.push_str("| Document | Value |\n");
    md.push_str("|----------|-------|\n");
    for brief in briefs {
        md.push_str(&format!(
            "| [{}]({}) | {} |\n",
            escape_cell(brief.label()),
            brief.url,
            value(brief)
        ));
    }
    md.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

//! CSV export of discovered PDFs
//!
//! Two layouts exist: the site catalog with every field of a record, and the
//! book catalog with bibliographic fields and the confidence score. Fields
//! containing commas, quotes or line breaks are quoted by the csv writer.

use crate::classifier::PdfDocumentRecord;
use crate::output::summary::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Columns of the site catalog
pub const SITE_HEADERS: [&str; 14] = [
    "URL",
    "Title",
    "Author",
    "File Size (Bytes)",
    "File Size (MB)",
    "Content Type",
    "Last Modified",
    "Discovered On Page",
    "Discovery Date",
    "Response Code",
    "Depth",
    "Link Text",
    "Link Context",
    "Domain",
];

/// Columns of the book catalog
pub const BOOK_HEADERS: [&str; 9] = [
    "Title",
    "Author",
    "Website",
    "Source URL",
    "File Size (MB)",
    "Crawl Date",
    "Confidence Score",
    "ISBN",
    "Publication Year",
];

const DISCOVERY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CRAWL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the site catalog to `writer`, returning the number of rows
pub fn write_site_csv<W: Write>(records: &[PdfDocumentRecord], writer: W) -> OutputResult<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(SITE_HEADERS)?;

    for record in records {
        writer.write_record([
            record.url.clone(),
            record.title.clone(),
            record.author.clone().unwrap_or_default(),
            record
                .file_size_bytes
                .map(|size| size.to_string())
                .unwrap_or_default(),
            format_mb(record),
            record.content_type.clone().unwrap_or_default(),
            record.last_modified.clone().unwrap_or_default(),
            record.discovered_on_page.clone(),
            record
                .discovery_timestamp
                .format(DISCOVERY_DATE_FORMAT)
                .to_string(),
            record
                .http_status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            record.depth.to_string(),
            record.link_text.clone(),
            record.link_context.clone(),
            record.domain.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(records.len())
}

/// Writes the book catalog to `writer`
///
/// Records scoring below `min_confidence` are left out. Returns the number
/// of rows written.
pub fn write_book_csv<W: Write>(
    records: &[PdfDocumentRecord],
    min_confidence: f64,
    writer: W,
) -> OutputResult<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(BOOK_HEADERS)?;

    let mut written = 0;
    for record in records
        .iter()
        .filter(|r| r.confidence_score >= min_confidence)
    {
        writer.write_record([
            record.title.clone(),
            record
                .author
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            record.domain.clone(),
            record.url.clone(),
            format_mb(record),
            record
                .discovery_timestamp
                .format(CRAWL_DATE_FORMAT)
                .to_string(),
            format!("{:.2}", record.confidence_score),
            record.isbn.clone().unwrap_or_default(),
            record
                .publication_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Exports the site catalog to a file
pub fn export_site_csv(records: &[PdfDocumentRecord], path: &Path) -> OutputResult<usize> {
    let written = write_site_csv(records, File::create(path)?)?;
    tracing::info!("Exported {} PDFs to {}", written, path.display());
    Ok(written)
}

/// Exports the book catalog to a file
pub fn export_book_csv(
    records: &[PdfDocumentRecord],
    min_confidence: f64,
    path: &Path,
) -> OutputResult<usize> {
    let written = write_book_csv(records, min_confidence, File::create(path)?)?;
    tracing::info!(
        "Exported {} of {} books to {} (min confidence {:.2})",
        written,
        records.len(),
        path.display(),
        min_confidence
    );
    Ok(written)
}

/// Writes discovered sitemap URLs, one per line
pub fn write_sitemap_urls(urls: &[String], path: &Path) -> OutputResult<()> {
    let mut file = File::create(path)?;
    for url in urls {
        writeln!(file, "{}", url)?;
    }
    tracing::info!("Saved {} sitemap URLs to {}", urls.len(), path.display());
    Ok(())
}

fn format_mb(record: &PdfDocumentRecord) -> String {
    record
        .file_size_mb()
        .map(|mb| format!("{:.2}", mb))
        .unwrap_or_default()
}

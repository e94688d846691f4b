//! Report export
//!
//! `ReportExporter` is the contract for turning one record into a
//! downloadable artifact. The shipped implementation renders plain text;
//! a richer rendering engine can slot in behind the same trait.

use crate::db::models::AnalysisRecord;
use crate::errors::Result;

/// A rendered report ready to be served as an attachment
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait ReportExporter: Send + Sync {
    fn render(&self, record: &AnalysisRecord) -> Result<ReportArtifact>;
}

/// Plain-text report renderer
pub struct TextReportExporter;

impl ReportExporter for TextReportExporter {
    fn render(&self, record: &AnalysisRecord) -> Result<ReportArtifact> {
        let mut body = String::new();
        body.push_str("PaperInsight Analysis Report\n");
        body.push_str("============================\n\n");
        body.push_str(&format!("Paper Title: {}\n", record.title));
        body.push_str(&format!(
            "Type: {} ({}%)\n",
            record.document_type,
            (record.type_confidence * 100.0).round() as i64
        ));
        body.push_str(&format!(
            "Nature: {} ({}%)\n\n",
            record.nature,
            (record.nature_confidence * 100.0).round() as i64
        ));

        body.push_str("Key Evidence:\n");
        if record.evidence.is_empty() {
            body.push_str("  (none recorded)\n");
        } else {
            for (index, evidence) in record.evidence.iter().enumerate() {
                body.push_str(&format!("  {}. {}\n", index + 1, evidence));
            }
        }

        if !record.keywords.is_empty() {
            body.push_str(&format!("\nKeywords: {}\n", record.keywords.join(", ")));
        }

        body.push_str(&format!("\nOriginal file: {}\n", record.original_file_name));
        body.push_str(&format!(
            "Uploaded: {}\n",
            record.upload_timestamp.to_rfc3339()
        ));
        body.push_str(&format!(
            "Processing time: {} ms\n",
            record.processing_time_ms
        ));

        Ok(ReportArtifact {
            file_name: format!("{}_report.txt", sanitize_file_name(&record.title)),
            content_type: "text/plain; charset=utf-8",
            bytes: body.into_bytes(),
        })
    }
}

/// Keep the attachment filename header-safe
fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "analysis".to_string()
    } else {
        cleaned
    }
}

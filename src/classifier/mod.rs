//! Document classification
//!
//! The external classification service sits behind the [`Classifier`]
//! trait; [`FallbackClassifier`] is the deterministic local substitute the
//! upload pipeline engages whenever the service is unreachable.

pub mod client;
pub mod fallback;

pub use client::HttpClassifier;
pub use fallback::FallbackClassifier;

use async_trait::async_trait;

use crate::db::models::{DocumentType, PaperNature};
use crate::errors::Result;

/// A submitted file as seen by the pipeline
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Where a classification came from. Fallback output is plausible but
/// synthetic and must stay distinguishable from a genuine result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationOrigin {
    Service,
    Fallback,
}

impl ClassificationOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationOrigin::Service => "service",
            ClassificationOrigin::Fallback => "fallback",
        }
    }
}

/// Structured classification of one document
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// None means the caller keeps its provisional title
    pub title: Option<String>,
    pub document_type: DocumentType,
    pub type_confidence: f64,
    pub nature: PaperNature,
    pub nature_confidence: f64,
    pub evidence: Vec<String>,
    pub keywords: Vec<String>,
    pub origin: ClassificationOrigin,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, file: &UploadedFile) -> Result<ClassificationResult>;
}

/// Human-readable title from a file name: extension stripped, separators
/// normalized to spaces, each word title-cased.
pub fn title_from_file_name(name: &str) -> String {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! SeaORM entity for the `analyses` table
//!
//! Enum-valued columns are stored as text and decoded leniently: a row
//! written by an older build never poisons a listing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::models::AnalysisRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub original_file_name: String,

    pub upload_timestamp: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text")]
    pub document_type: String,

    pub type_confidence: f64,

    #[sea_orm(column_type = "Text")]
    pub nature: String,

    pub nature_confidence: f64,

    #[sea_orm(column_type = "JsonBinary")]
    pub evidence: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub keywords: Json,

    pub processing_time_ms: i64,

    pub file_size_bytes: i64,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub owner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AnalysisRecord {
    fn from(model: Model) -> Self {
        AnalysisRecord {
            id: model.id,
            title: model.title,
            original_file_name: model.original_file_name,
            upload_timestamp: model.upload_timestamp.with_timezone(&chrono::Utc),
            document_type: model.document_type.parse().unwrap_or_default(),
            type_confidence: model.type_confidence,
            nature: model.nature.parse().unwrap_or_default(),
            nature_confidence: model.nature_confidence,
            evidence: serde_json::from_value(model.evidence).unwrap_or_default(),
            keywords: serde_json::from_value(model.keywords).unwrap_or_default(),
            processing_time_ms: model.processing_time_ms.max(0) as u64,
            file_size_bytes: model.file_size_bytes.max(0) as u64,
            status: model.status.parse().unwrap_or_default(),
            error_message: model.error_message,
            owner_id: model.owner_id,
        }
    }
}

impl From<&AnalysisRecord> for ActiveModel {
    fn from(record: &AnalysisRecord) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(record.id),
            title: Set(record.title.clone()),
            original_file_name: Set(record.original_file_name.clone()),
            upload_timestamp: Set(record.upload_timestamp.into()),
            document_type: Set(record.document_type.to_string()),
            type_confidence: Set(record.type_confidence),
            nature: Set(record.nature.to_string()),
            nature_confidence: Set(record.nature_confidence),
            evidence: Set(serde_json::json!(record.evidence)),
            keywords: Set(serde_json::json!(record.keywords)),
            processing_time_ms: Set(record.processing_time_ms as i64),
            file_size_bytes: Set(record.file_size_bytes as i64),
            status: Set(record.status.to_string()),
            error_message: Set(record.error_message.clone()),
            owner_id: Set(record.owner_id.clone()),
        }
    }
}

//! Postgres-backed store
//!
//! Filtering and pagination go through SeaORM conditions; the statistics
//! aggregate is a single raw statement, decoded by column index.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
};
use uuid::Uuid;

use super::entity::{ActiveModel, Column, Entity};
use super::models::{AnalysisRecord, AnalysisStats, AnalysisStatus};
use super::{AnalysisFilter, AnalysisStore};
use crate::config::DatabaseConfig;
use crate::errors::Result;

#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = sea_orm::ConnectOptions::new(&config.url);
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(false);

        let db = sea_orm::Database::connect(options).await?;
        Ok(Self { db })
    }

    fn condition(filter: &AnalysisFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.to_string()));
        }
        if let Some(document_type) = filter.document_type {
            condition = condition.add(Column::DocumentType.eq(document_type.to_string()));
        }
        if let Some(nature) = filter.nature {
            condition = condition.add(Column::Nature.eq(nature.to_string()));
        }
        if let Some(term) = &filter.title_contains {
            let pattern = format!("%{}%", term.to_lowercase());
            condition =
                condition.add(Expr::expr(Func::lower(Expr::col(Column::Title))).like(pattern));
        }
        if let Some(from) = filter.uploaded_from {
            condition = condition.add(Column::UploadTimestamp.gte(from));
        }
        if let Some(to) = filter.uploaded_to {
            condition = condition.add(Column::UploadTimestamp.lte(to));
        }
        condition
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn create(&self, record: AnalysisRecord) -> Result<AnalysisRecord> {
        let model = ActiveModel::from(&record).insert(&self.db).await?;
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        let model = Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, record: AnalysisRecord) -> Result<AnalysisRecord> {
        let model = ActiveModel::from(&record).update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = Entity::delete_many()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn query(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<AnalysisRecord>, u64)> {
        let condition = Self::condition(filter);

        let total = Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let models = Entity::find()
            .filter(condition)
            .order_by_desc(Column::UploadTimestamp)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn aggregate_stats(&self, status: AnalysisStatus) -> Result<AnalysisStats> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT
                COUNT(*) AS total_analyses,
                COUNT(*) FILTER (WHERE document_type = 'Conference') AS conference_count,
                COUNT(*) FILTER (WHERE document_type = 'Journal') AS journal_count,
                COUNT(*) FILTER (WHERE nature = 'Implementation') AS implementation_count,
                COUNT(*) FILTER (WHERE nature = 'Theoretical') AS theoretical_count,
                COALESCE(AVG(type_confidence), 0) AS avg_type_confidence,
                COALESCE(AVG(nature_confidence), 0) AS avg_nature_confidence
            FROM analyses
            WHERE status = $1
            "#,
            vec![status.to_string().into()],
        );

        let row = match self.db.query_one(statement).await? {
            Some(row) => row,
            None => return Ok(AnalysisStats::default()),
        };

        Ok(AnalysisStats {
            total_analyses: row.try_get_by_index::<i64>(0).map_err(DbErr::from)? as u64,
            conference_count: row.try_get_by_index::<i64>(1).map_err(DbErr::from)? as u64,
            journal_count: row.try_get_by_index::<i64>(2).map_err(DbErr::from)? as u64,
            implementation_count: row.try_get_by_index::<i64>(3).map_err(DbErr::from)? as u64,
            theoretical_count: row.try_get_by_index::<i64>(4).map_err(DbErr::from)? as u64,
            avg_type_confidence: row.try_get_by_index::<f64>(5).map_err(DbErr::from)?,
            avg_nature_confidence: row.try_get_by_index::<f64>(6).map_err(DbErr::from)?,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(Into::into)
    }
}

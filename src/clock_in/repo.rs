use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;
use tokio::sync::RwLock;
use tracing::debug;

use super::repo_types::{ClockInFields, ClockInFilter, ClockInRecord};
use crate::id::RecordId;

#[async_trait]
pub trait ClockInRepository: Send + Sync {
    async fn insert(
        &self,
        fields: ClockInFields,
        insert_datetime: PrimitiveDateTime,
    ) -> anyhow::Result<RecordId>;
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<ClockInRecord>>;
    async fn find(&self, filter: &ClockInFilter) -> anyhow::Result<Vec<ClockInRecord>>;
    async fn update(&self, id: RecordId, fields: ClockInFields) -> anyhow::Result<bool>;
    async fn delete(&self, id: RecordId) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgClockIns {
    db: PgPool,
}

impl PgClockIns {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClockInRepository for PgClockIns {
    async fn insert(
        &self,
        fields: ClockInFields,
        insert_datetime: PrimitiveDateTime,
    ) -> anyhow::Result<RecordId> {
        let id = RecordId::generate();
        sqlx::query(
            r#"
            INSERT INTO clock_in_records (id, email, location, insert_datetime)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(&fields.email)
        .bind(&fields.location)
        .bind(insert_datetime)
        .execute(&self.db)
        .await
        .context("insert clock-in record")?;
        Ok(id)
    }

    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<ClockInRecord>> {
        let record = sqlx::query_as::<_, ClockInRecord>(
            r#"
            SELECT id, email, location, insert_datetime
              FROM clock_in_records
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find clock-in record by id")?;
        Ok(record)
    }

    async fn find(&self, filter: &ClockInFilter) -> anyhow::Result<Vec<ClockInRecord>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, email, location, insert_datetime FROM clock_in_records",
        );
        filter.push_where(&mut qb);
        debug!(sql = qb.sql(), "clock-in filter");
        let rows = qb
            .build_query_as::<ClockInRecord>()
            .fetch_all(&self.db)
            .await
            .context("filter clock-in records")?;
        Ok(rows)
    }

    async fn update(&self, id: RecordId, fields: ClockInFields) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE clock_in_records SET email = $2, location = $3 WHERE id = $1")
            .bind(id)
            .bind(&fields.email)
            .bind(&fields.location)
            .execute(&self.db)
            .await
            .context("update clock-in record")?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM clock_in_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete clock-in record")?;
        Ok(res.rows_affected() > 0)
    }
}

#[derive(Default)]
pub struct MemoryClockIns {
    docs: RwLock<Vec<ClockInRecord>>,
}

#[async_trait]
impl ClockInRepository for MemoryClockIns {
    async fn insert(
        &self,
        fields: ClockInFields,
        insert_datetime: PrimitiveDateTime,
    ) -> anyhow::Result<RecordId> {
        let id = RecordId::generate();
        self.docs
            .write()
            .await
            .push(ClockInRecord::new(id, fields, insert_datetime));
        Ok(id)
    }

    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<ClockInRecord>> {
        Ok(self.docs.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn find(&self, filter: &ClockInFilter) -> anyhow::Result<Vec<ClockInRecord>> {
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update(&self, id: RecordId, fields: ClockInFields) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let Some(record) = docs.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.email = fields.email;
        record.location = fields.location;
        Ok(true)
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|r| r.id != id);
        Ok(docs.len() != before)
    }
}

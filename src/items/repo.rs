use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;
use tokio::sync::RwLock;
use tracing::debug;

use super::repo_types::{EmailCount, Item, ItemFields, ItemFilter};
use crate::id::RecordId;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Stores a new item and returns its generated id.
    async fn insert(&self, fields: ItemFields, insert_date: Date) -> anyhow::Result<RecordId>;
    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<Item>>;
    async fn find(&self, filter: &ItemFilter) -> anyhow::Result<Vec<Item>>;
    /// Replaces the client-owned fields. Returns whether a record matched.
    async fn update(&self, id: RecordId, fields: ItemFields) -> anyhow::Result<bool>;
    /// Returns whether a record matched.
    async fn delete(&self, id: RecordId) -> anyhow::Result<bool>;
    async fn count_by_email(&self) -> anyhow::Result<Vec<EmailCount>>;
}

const SELECT_ITEMS: &str =
    "SELECT id, name, email, item_name, quantity, expiry_date, insert_date FROM items";

#[derive(Clone)]
pub struct PgItems {
    db: PgPool,
}

impl PgItems {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for PgItems {
    async fn insert(&self, fields: ItemFields, insert_date: Date) -> anyhow::Result<RecordId> {
        let id = RecordId::generate();
        sqlx::query(
            r#"
            INSERT INTO items (id, name, email, item_name, quantity, expiry_date, insert_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.item_name)
        .bind(fields.quantity)
        .bind(fields.expiry_date)
        .bind(insert_date)
        .execute(&self.db)
        .await
        .context("insert item")?;
        Ok(id)
    }

    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, email, item_name, quantity, expiry_date, insert_date
              FROM items
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find item by id")?;
        Ok(item)
    }

    async fn find(&self, filter: &ItemFilter) -> anyhow::Result<Vec<Item>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ITEMS);
        filter.push_where(&mut qb);
        debug!(sql = qb.sql(), "item filter");
        let rows = qb
            .build_query_as::<Item>()
            .fetch_all(&self.db)
            .await
            .context("filter items")?;
        Ok(rows)
    }

    async fn update(&self, id: RecordId, fields: ItemFields) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE items
               SET name = $2, email = $3, item_name = $4, quantity = $5, expiry_date = $6
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.item_name)
        .bind(fields.quantity)
        .bind(fields.expiry_date)
        .execute(&self.db)
        .await
        .context("update item")?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete item")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_by_email(&self) -> anyhow::Result<Vec<EmailCount>> {
        let rows = sqlx::query_as::<_, EmailCount>(
            r#"
            SELECT email, COUNT(*) AS count
              FROM items
             GROUP BY email
             ORDER BY email
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("aggregate items by email")?;
        Ok(rows)
    }
}

/// Process-local item collection, kept in insertion order.
#[derive(Default)]
pub struct MemoryItems {
    docs: RwLock<Vec<Item>>,
}

#[async_trait]
impl ItemRepository for MemoryItems {
    async fn insert(&self, fields: ItemFields, insert_date: Date) -> anyhow::Result<RecordId> {
        let id = RecordId::generate();
        self.docs.write().await.push(Item::new(id, fields, insert_date));
        Ok(id)
    }

    async fn find_by_id(&self, id: RecordId) -> anyhow::Result<Option<Item>> {
        Ok(self.docs.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn find(&self, filter: &ItemFilter) -> anyhow::Result<Vec<Item>> {
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn update(&self, id: RecordId, fields: ItemFields) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.replace_fields(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RecordId) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|i| i.id != id);
        Ok(docs.len() != before)
    }

    async fn count_by_email(&self) -> anyhow::Result<Vec<EmailCount>> {
        let docs = self.docs.read().await;
        let mut counts = std::collections::BTreeMap::<&str, i64>::new();
        for item in docs.iter() {
            *counts.entry(item.email.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(email, count)| EmailCount {
                email: email.to_string(),
                count,
            })
            .collect())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use time::Date;

use crate::{dates::iso_date, id::RecordId};

/// Item document as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
    #[serde(with = "iso_date")]
    pub insert_date: Date, // set once at insert
}

/// Client-owned fields; what create writes and update replaces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemFields {
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

impl Item {
    pub fn new(id: RecordId, fields: ItemFields, insert_date: Date) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            item_name: fields.item_name,
            quantity: fields.quantity,
            expiry_date: fields.expiry_date,
            insert_date,
        }
    }

    pub fn replace_fields(&mut self, fields: ItemFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.item_name = fields.item_name;
        self.quantity = fields.quantity;
        self.expiry_date = fields.expiry_date;
    }
}

/// Number of items held per email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EmailCount {
    #[serde(rename = "_id")]
    pub email: String,
    pub count: i64,
}

/// Optional predicates for item lookups. Absent fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub email: Option<String>,
    pub expiry_from: Option<Date>,
    pub insert_from: Option<Date>,
    pub min_quantity: Option<i64>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        self.email.as_ref().map_or(true, |e| &item.email == e)
            && self.expiry_from.map_or(true, |d| item.expiry_date >= d)
            && self.insert_from.map_or(true, |d| item.insert_date >= d)
            && self.min_quantity.map_or(true, |q| item.quantity >= q)
    }

    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";
        if let Some(email) = &self.email {
            qb.push(sep).push("email = ").push_bind(email.clone());
            sep = " AND ";
        }
        if let Some(d) = self.expiry_from {
            qb.push(sep).push("expiry_date >= ").push_bind(d);
            sep = " AND ";
        }
        if let Some(d) = self.insert_from {
            qb.push(sep).push("insert_date >= ").push_bind(d);
            sep = " AND ";
        }
        if let Some(q) = self.min_quantity {
            qb.push(sep).push("quantity >= ").push_bind(q);
        }
    }
}

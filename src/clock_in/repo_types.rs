use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::{dates::iso_datetime, id::RecordId};

/// Attendance entry: who clocked in, where, and when (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ClockInRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub email: String,
    pub location: String,
    #[serde(with = "iso_datetime")]
    pub insert_datetime: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClockInFields {
    pub email: String,
    pub location: String,
}

impl ClockInRecord {
    pub fn new(id: RecordId, fields: ClockInFields, insert_datetime: PrimitiveDateTime) -> Self {
        Self {
            id,
            email: fields.email,
            location: fields.location,
            insert_datetime,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockInFilter {
    pub email: Option<String>,
    pub location: Option<String>,
    pub inserted_from: Option<PrimitiveDateTime>,
}

impl ClockInFilter {
    pub fn matches(&self, record: &ClockInRecord) -> bool {
        self.email.as_ref().map_or(true, |e| &record.email == e)
            && self.location.as_ref().map_or(true, |l| &record.location == l)
            && self.inserted_from.map_or(true, |t| record.insert_datetime >= t)
    }

    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";
        if let Some(email) = &self.email {
            qb.push(sep).push("email = ").push_bind(email.clone());
            sep = " AND ";
        }
        if let Some(location) = &self.location {
            qb.push(sep).push("location = ").push_bind(location.clone());
            sep = " AND ";
        }
        if let Some(t) = self.inserted_from {
            qb.push(sep).push("insert_datetime >= ").push_bind(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> ClockInRecord {
        ClockInRecord {
            id: RecordId::generate(),
            email: "ada@example.com".into(),
            location: "Berlin".into(),
            insert_datetime: datetime!(2024-06-01 9:15:00),
        }
    }

    #[test]
    fn matches_exact_fields_and_inclusive_time() {
        let record = sample();
        let filter = ClockInFilter {
            location: Some("Berlin".into()),
            inserted_from: Some(datetime!(2024-06-01 9:15:00)),
            ..Default::default()
        };
        assert!(filter.matches(&record));

        let other_site = ClockInFilter {
            location: Some("berlin".into()),
            ..Default::default()
        };
        assert!(!other_site.matches(&record));

        let later = ClockInFilter {
            inserted_from: Some(datetime!(2024-06-01 9:15:01)),
            ..Default::default()
        };
        assert!(!later.matches(&record));
    }

    #[test]
    fn builds_where_clause() {
        let filter = ClockInFilter {
            location: Some("Berlin".into()),
            inserted_from: Some(datetime!(2024-06-01 0:00)),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM clock_in_records");
        filter.push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM clock_in_records WHERE location = $1 AND insert_datetime >= $2"
        );
    }

    #[test]
    fn serializes_datetime_with_space_separator() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["insert_datetime"], "2024-06-01 09:15:00");
        assert!(json["_id"].is_string());
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo_types::{ClockInFields, ClockInFilter, ClockInRecord};
use crate::{
    dates,
    error::{ApiError, ApiResult},
    id::RecordId,
    validation::{self, CLOCK_IN_FIELDS},
};

impl ClockInFields {
    pub fn from_payload(payload: &Value) -> ApiResult<Self> {
        validation::validate(payload, CLOCK_IN_FIELDS).into_result()?;
        Self::deserialize(payload).map_err(|e| ApiError::Validation(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClockInFilterParams {
    pub email: Option<String>,
    pub location: Option<String>,
    pub insert_datetime: Option<String>,
}

impl TryFrom<ClockInFilterParams> for ClockInFilter {
    type Error = ApiError;

    fn try_from(p: ClockInFilterParams) -> Result<Self, Self::Error> {
        let inserted_from = match p.insert_datetime.filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => Some(dates::parse_datetime_bound(&s).map_err(|_| {
                ApiError::Validation(
                    "Please provide insert datetime in yyyy-mm-dd hh:mm:ss format.".into(),
                )
            })?),
        };

        Ok(ClockInFilter {
            email: p.email.filter(|s| !s.is_empty()),
            location: p.location.filter(|s| !s.is_empty()),
            inserted_from,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ClockedInResponse {
    pub ok: &'static str,
    #[serde(rename = "clock-in id")]
    pub clock_in_id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct ClockInDetailsResponse {
    pub clock_in_record_details: ClockInRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn payload_requires_location() {
        let err = ClockInFields::from_payload(&json!({ "email": "ada@example.com" })).unwrap_err();
        assert_eq!(err.to_string(), "location key is missing in the payload.");
    }

    #[test]
    fn bare_date_bound_means_midnight() {
        let filter = ClockInFilter::try_from(ClockInFilterParams {
            insert_datetime: Some("2024-06-01".into()),
            location: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.inserted_from, Some(datetime!(2024-06-01 0:00)));
        assert_eq!(filter.location, None);
    }

    #[test]
    fn malformed_bound_is_rejected() {
        assert!(ClockInFilter::try_from(ClockInFilterParams {
            insert_datetime: Some("06/01/2024".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn clocked_in_response_uses_wire_names() {
        let id = RecordId::generate();
        let json = serde_json::to_value(ClockedInResponse {
            ok: "clock-in successful",
            clock_in_id: id,
        })
        .unwrap();
        assert_eq!(json, json!({ "ok": "clock-in successful", "clock-in id": id.to_string() }));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo_types::{Item, ItemFields, ItemFilter};
use crate::{
    dates,
    error::{ApiError, ApiResult},
    id::RecordId,
    validation::{self, ITEM_FIELDS},
};

impl ItemFields {
    /// Validates a raw JSON body and converts it into typed fields.
    pub fn from_payload(payload: &Value) -> ApiResult<Self> {
        validation::validate(payload, ITEM_FIELDS).into_result()?;
        Self::deserialize(payload).map_err(|e| ApiError::Validation(e.to_string()))
    }
}

/// Query string of `GET /items/filter`. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilterParams {
    pub email: Option<String>,
    pub expiry_date: Option<String>,
    pub insert_date: Option<String>,
    pub quantity: Option<String>,
}

impl TryFrom<ItemFilterParams> for ItemFilter {
    type Error = ApiError;

    fn try_from(p: ItemFilterParams) -> Result<Self, Self::Error> {
        let date_bound = |raw: Option<String>, label: &str| -> ApiResult<_> {
            match raw.filter(|s| !s.is_empty()) {
                None => Ok(None),
                Some(s) => dates::parse_date(&s)
                    .map(Some)
                    .map_err(|_| ApiError::Validation(validation::date_format_error(label))),
            }
        };

        let min_quantity = match p.quantity.filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => Some(s.trim().parse::<i64>().map_err(|_| {
                ApiError::Validation("Please provide valid item quantity count.".to_string())
            })?),
        };

        Ok(ItemFilter {
            email: p.email.filter(|s| !s.is_empty()),
            expiry_from: date_bound(p.expiry_date, "expiry")?,
            insert_from: date_bound(p.insert_date, "insert")?,
            min_quantity,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedItemResponse {
    #[serde(rename = "created successfully")]
    pub created: bool,
    pub item_id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct ItemDetailsResponse {
    pub item_details: Item,
}

use serde::Serialize;

pub const NO_MATCHING_RECORDS: &str = "No matching records found.";

/// Filter result: the matching records, or a sentinel object when there are none,
/// so that an empty match is never confused with a failed call.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FilterResponse<T> {
    Records(Vec<T>),
    NoMatch { records: &'static str },
}

impl<T> From<Vec<T>> for FilterResponse<T> {
    fn from(records: Vec<T>) -> Self {
        if records.is_empty() {
            FilterResponse::NoMatch {
                records: NO_MATCHING_RECORDS,
            }
        } else {
            FilterResponse::Records(records)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub info: &'static str,
}

//! Query parameters for the deal listing endpoint.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::domain::entities::DealStage;
use crate::domain::repositories::DealFilter;

/// A date bound accepted as `YYYY-MM-DD` (midnight UTC) or RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound(pub DateTime<Utc>);

impl FromStr for DateBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| Self(d.and_time(NaiveTime::default()).and_utc()))
            .map_err(|_| format!("invalid date '{s}' (expected YYYY-MM-DD or RFC 3339)"))
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Filter parameters for `GET /api/deals`.
///
/// Empty-string values are treated as absent. `page` and `limit` may be sent
/// by clients but are ignored; the endpoint always returns the full filtered set.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_value_range"))]
pub struct DealQueryParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 200, message = "Search text must be at most 200 characters"))]
    pub search: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub stage: Option<DealStage>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub min_value: Option<Decimal>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub max_value: Option<Decimal>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start_date: Option<DateBound>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end_date: Option<DateBound>,
}

fn validate_value_range(params: &DealQueryParams) -> Result<(), ValidationError> {
    match (params.min_value, params.max_value) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("value_range")
            .with_message("minValue must not be greater than maxValue".into())),
        _ => Ok(()),
    }
}

impl DealQueryParams {
    /// Converts the parsed parameters into a repository filter.
    pub fn into_filter(self) -> DealFilter {
        DealFilter::new()
            .with_search(self.search)
            .with_stage(self.stage)
            .with_value_range(self.min_value, self.max_value)
            .with_date_range(
                self.start_date.map(|d| d.0),
                self.end_date.map(|d| d.0),
            )
    }
}

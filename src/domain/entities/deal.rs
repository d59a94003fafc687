//! Deal entity representing a sales-pipeline record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a deal.
///
/// Transmitted verbatim on the wire (`new`, `in_progress`, `negotiation`,
/// `won`, `lost`) and stored as the PostgreSQL enum `deal_stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
pub enum DealStage {
    New,
    InProgress,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    /// All stages in pipeline order.
    pub const ALL: [DealStage; 5] = [
        DealStage::New,
        DealStage::InProgress,
        DealStage::Negotiation,
        DealStage::Won,
        DealStage::Lost,
    ];

    /// Wire representation of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::New => "new",
            DealStage::InProgress => "in_progress",
            DealStage::Negotiation => "negotiation",
            DealStage::Won => "won",
            DealStage::Lost => "lost",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DealStage::New => "New",
            DealStage::InProgress => "In Progress",
            DealStage::Negotiation => "Negotiation",
            DealStage::Won => "Won",
            DealStage::Lost => "Lost",
        }
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known stage names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deal stage '{0}' (expected one of: new, in_progress, negotiation, won, lost)")]
pub struct UnknownStage(pub String);

impl FromStr for DealStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// A sales deal as stored in the `deals` table.
///
/// Read-only to this service. JSON field names match the column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deal {
    pub id: i64,
    pub name: String,
    pub contact_name: String,
    pub company: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub stage: DealStage,
    pub created_at: DateTime<Utc>,
    pub close_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_deal() -> Deal {
        Deal {
            id: 7,
            name: "Acme renewal".to_string(),
            contact_name: "Jane Roe".to_string(),
            company: "Acme Corp".to_string(),
            value: Decimal::new(1250050, 2),
            stage: DealStage::InProgress,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
            close_date: None,
        }
    }

    #[test]
    fn test_stage_round_trips_through_str() {
        for stage in DealStage::ALL {
            assert_eq!(stage.as_str().parse::<DealStage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_stage_rejects_unknown_and_mixed_case() {
        assert!("closed".parse::<DealStage>().is_err());
        assert!("Won".parse::<DealStage>().is_err());
        assert!("".parse::<DealStage>().is_err());
    }

    #[test]
    fn test_stage_serializes_verbatim() {
        let json = serde_json::to_string(&DealStage::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_deal_json_uses_column_names() {
        let json = serde_json::to_value(sample_deal()).unwrap();

        assert_eq!(json["contact_name"], "Jane Roe");
        assert_eq!(json["stage"], "in_progress");
        assert_eq!(json["value"], 12500.5);
        assert!(json["close_date"].is_null());
    }

    #[test]
    fn test_deal_value_is_json_number() {
        let json = serde_json::to_value(sample_deal()).unwrap();
        assert!(json["value"].is_number(), "value is {}", json["value"]);

        let whole = Deal {
            value: Decimal::new(5000, 0),
            ..sample_deal()
        };
        assert_eq!(serde_json::to_value(whole).unwrap()["value"], 5000.0);
    }

    #[test]
    fn test_deal_deserializes_float_value() {
        let mut json = serde_json::to_value(sample_deal()).unwrap();
        json["value"] = serde_json::json!(1500.25);

        let deal: Deal = serde_json::from_value(json).unwrap();
        assert_eq!(deal.value, Decimal::new(150025, 2));
    }

    #[test]
    fn test_deal_deserializes_integer_value() {
        let json = r#"{
            "id": 1,
            "name": "Pilot",
            "contact_name": "Sam",
            "company": "Globex",
            "value": 5000,
            "stage": "won",
            "created_at": "2025-01-10T00:00:00Z",
            "close_date": "2025-02-01T00:00:00Z"
        }"#;

        let deal: Deal = serde_json::from_str(json).unwrap();
        assert_eq!(deal.value, Decimal::new(5000, 0));
        assert_eq!(deal.stage, DealStage::Won);
        assert!(deal.close_date.is_some());
    }
}

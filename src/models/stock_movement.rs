use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// INCREASE adds stock (and serials) to an inventory record, DECREASE
/// removes them. Stored as text in the `stock_movements` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "INCREASE")]
    Increase,
    #[serde(rename = "DECREASE")]
    Decrease,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Increase => "INCREASE",
            MovementType::Decrease => "DECREASE",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "INCREASE" => MovementType::Increase,
            _ => MovementType::Decrease,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct StockMovementRecord {
    pub id: i64,
    pub inventory_id: i64,
    pub movement_type: String,
    pub quantity: i32,
    pub serial_numbers: Vec<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::MovementType;

    #[test]
    fn round_trips_through_db_text() {
        assert_eq!(MovementType::from_db("INCREASE"), MovementType::Increase);
        assert_eq!(MovementType::from_db("DECREASE"), MovementType::Decrease);
        assert_eq!(MovementType::Increase.as_str(), "INCREASE");
    }

    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&MovementType::Decrease).unwrap();
        assert_eq!(json, "\"DECREASE\"");
    }
}

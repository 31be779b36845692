use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Columns every transaction log must carry, in no particular order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "day",
    "amount_transacted",
    "quantity_transactions",
    "quantity_of_merchants",
    "entity",
    "product",
    "payment_method",
];

/// One row of the daily transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "deserialize_day")]
    pub day: NaiveDate,
    pub amount_transacted: f64,
    pub quantity_transactions: u64,
    pub quantity_of_merchants: u64,
    pub entity: String,
    pub product: String,
    pub payment_method: String,
}

/// Accepts `YYYY-MM-DD`, and also a full timestamp whose time part is dropped.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid day {raw:?}, expected YYYY-MM-DD")))
}

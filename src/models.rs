use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Jar type enumeration, stored as lowercase text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JarType {
    #[default]
    Normal,
    Chilled,
}

/// A registered customer, identified primarily by mobile number
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Consumer {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub house_no: Option<String>,
    pub area: Option<String>,
    pub custom_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// One dated delivery record.
///
/// `mobile` and `name` are a snapshot taken at entry time; they reference the
/// consumer only by value, so later consumer edits leave entry history intact
/// unless an explicit mobile rename cascades through the registry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub mobile: String,
    pub name: String,
    pub date: String,
    pub qty: i64,
    pub price: f64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub jar_type: JarType,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Global per-jar rates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rates {
    pub normal: f64,
    pub chilled: f64,
}

/// Create consumer request
#[derive(Debug, Deserialize, Serialize, validator::Validate)]
pub struct CreateConsumerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "mobile is required"))]
    pub mobile: String,
    pub house_no: Option<String>,
    pub area: Option<String>,
    pub custom_rate: Option<f64>,
}

/// Full-replace consumer update. A `mobile` differing from the path mobile
/// triggers the cascade rename of historical entries.
#[derive(Debug, Deserialize, Serialize, validator::Validate)]
pub struct UpdateConsumerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "mobile is required"))]
    pub mobile: String,
    pub house_no: Option<String>,
    pub area: Option<String>,
    pub custom_rate: Option<f64>,
}

/// Create entry request. `price` is optional: when omitted the service
/// computes qty x effective rate; when supplied it is stored as given.
#[derive(Debug, Deserialize, Serialize, validator::Validate)]
pub struct CreateEntryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "mobile is required"))]
    pub mobile: String,
    pub date: String,
    pub qty: i64,
    pub price: Option<f64>,
    #[serde(default, rename = "type")]
    pub jar_type: JarType,
    #[serde(default)]
    pub is_paid: bool,
}

/// Full-replace entry update; price must be resupplied by the caller
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateEntryRequest {
    pub date: String,
    pub qty: i64,
    pub price: f64,
    #[serde(rename = "type")]
    pub jar_type: JarType,
    pub is_paid: bool,
}

/// Bulk payment-status update for one consumer and one calendar month
#[derive(Debug, Deserialize, Serialize)]
pub struct MarkMonthRequest {
    pub mobile: String,
    /// "YYYY-MM", zero-padded
    pub month: String,
    pub status: bool,
}

/// Partial rates update; omitted keys are left untouched
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateRatesRequest {
    pub normal: Option<f64>,
    pub chilled: Option<f64>,
}

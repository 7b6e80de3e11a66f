use crate::database::Database;
use crate::errors::{JarLedgerError, Result};
use crate::models::{
    Consumer, CreateConsumerRequest, CreateEntryRequest, Entry, MarkMonthRequest, Rates,
    UpdateConsumerRequest, UpdateEntryRequest, UpdateRatesRequest,
};
use crate::rates::{
    effective_rate, CHILLED_RATE_KEY, DEFAULT_CHILLED_RATE, DEFAULT_JAR_RATE, JAR_RATE_KEY,
};
use std::sync::Arc;
use tracing::info;

pub struct LedgerService {
    pub db: Arc<Database>,
}

impl LedgerService {
    pub fn new(db: Arc<Database>) -> Self {
        LedgerService { db }
    }

    /// Register a new consumer; duplicate mobiles are rejected
    pub async fn register_consumer(&self, request: CreateConsumerRequest) -> Result<Consumer> {
        validator::Validate::validate(&request)
            .map_err(|e| JarLedgerError::Validation(e.to_string()))?;

        let consumer = self.db.create_consumer(&request).await?;
        info!("Registered consumer {} ({})", consumer.name, consumer.mobile);
        Ok(consumer)
    }

    pub async fn list_consumers(&self) -> Result<Vec<Consumer>> {
        self.db.list_consumers().await
    }

    /// Full update of a consumer. A changed mobile cascades to entry history.
    pub async fn update_consumer(
        &self,
        current_mobile: &str,
        request: UpdateConsumerRequest,
    ) -> Result<Consumer> {
        validator::Validate::validate(&request)
            .map_err(|e| JarLedgerError::Validation(e.to_string()))?;

        let renamed = request.mobile != current_mobile;
        let consumer = self.db.update_consumer(current_mobile, &request).await?;

        if renamed {
            info!("Renamed consumer mobile {} -> {}", current_mobile, consumer.mobile);
        }
        Ok(consumer)
    }

    /// Cascade delete; returns total rows removed, zero included
    pub async fn remove_consumer(&self, mobile: &str) -> Result<u64> {
        let removed = self.db.remove_consumer(mobile).await?;
        info!("Removed consumer {} ({} rows)", mobile, removed);
        Ok(removed)
    }

    /// Record a delivery. When the caller omits the price it is computed as
    /// qty x effective rate, using the consumer's custom rate if one is
    /// registered under this mobile.
    pub async fn create_entry(&self, request: CreateEntryRequest) -> Result<Entry> {
        validator::Validate::validate(&request)
            .map_err(|e| JarLedgerError::Validation(e.to_string()))?;

        let price = match request.price {
            Some(price) => price,
            None => {
                let rates = self.get_rates().await?;
                let custom_rate = self
                    .db
                    .get_consumer_by_mobile(&request.mobile)
                    .await?
                    .and_then(|c| c.custom_rate);
                request.qty as f64 * effective_rate(request.jar_type, custom_rate, &rates)
            }
        };

        self.db.create_entry(&request, price).await
    }

    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        self.db.list_entries().await
    }

    pub async fn update_entry(&self, id: i64, request: UpdateEntryRequest) -> Result<Entry> {
        self.db.update_entry(id, &request).await
    }

    pub async fn remove_entry(&self, id: i64) -> Result<u64> {
        self.db.remove_entry(id).await
    }

    /// Bulk-mark one consumer's entries for a calendar month as paid/unpaid.
    /// Returns the number of entries updated; zero matches is success.
    pub async fn mark_month(&self, request: MarkMonthRequest) -> Result<u64> {
        validate_month(&request.month)?;

        let updated = self
            .db
            .mark_month(&request.mobile, &request.month, request.status)
            .await?;

        info!(
            "Marked {} entries of {} in {} as {}",
            updated,
            request.mobile,
            request.month,
            if request.status { "paid" } else { "unpaid" }
        );
        Ok(updated)
    }

    /// Stored rates, falling back to the defaults for absent or unparsable keys
    pub async fn get_rates(&self) -> Result<Rates> {
        let normal = self
            .db
            .get_setting(JAR_RATE_KEY)
            .await?
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_JAR_RATE);

        let chilled = self
            .db
            .get_setting(CHILLED_RATE_KEY)
            .await?
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_CHILLED_RATE);

        Ok(Rates { normal, chilled })
    }

    /// Upsert each rate present in the request; omitted keys stay untouched.
    /// Returns the resulting rates.
    pub async fn set_rates(&self, request: UpdateRatesRequest) -> Result<Rates> {
        if let Some(normal) = request.normal {
            self.db
                .upsert_setting(JAR_RATE_KEY, &normal.to_string())
                .await?;
        }

        if let Some(chilled) = request.chilled {
            self.db
                .upsert_setting(CHILLED_RATE_KEY, &chilled.to_string())
                .await?;
        }

        self.get_rates().await
    }
}

/// Months must be zero-padded "YYYY-MM". A bare "2024-1" would prefix-match
/// October through December as well, so it is rejected outright.
fn validate_month(month: &str) -> Result<()> {
    let bytes = month.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit)
        && matches!(month[5..].parse::<u8>(), Ok(1..=12));

    if well_formed {
        Ok(())
    } else {
        Err(JarLedgerError::Validation(format!(
            "month must be in YYYY-MM format, got '{month}'"
        )))
    }
}

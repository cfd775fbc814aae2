use crate::calendar::{month_bounds, MAX_QUANTITY};
use crate::errors::{ConsumptionError, StoreError};
use crate::models::{ConsumptionMap, DayRecord, MonthView};
use crate::storage::DrinkStore;
use tracing::debug;

/// Fetches every record dated within the month and keys it by date.
pub async fn load_month(
    store: &dyn DrinkStore,
    view: MonthView,
) -> Result<ConsumptionMap, ConsumptionError> {
    let fetch_failure = |source: StoreError| ConsumptionError::Fetch {
        month: view.label(),
        source,
    };

    let (first, last) = month_bounds(view.year, view.month)
        .ok_or_else(|| fetch_failure(StoreError::OutOfRange(view.label())))?;
    let rows = store.fetch_range(first, last).await.map_err(fetch_failure)?;

    debug!(month = %view.label(), records = rows.len(), "loaded month");
    Ok(rows
        .iter()
        .filter(|row| row.date >= first && row.date <= last)
        .map(DayRecord::from_row)
        .map(|record| (record.date_key, record.quantity))
        .collect())
}

pub fn next_quantity(current: u8) -> u8 {
    if current >= MAX_QUANTITY {
        0
    } else {
        current + 1
    }
}

pub fn cycle_day(current: &ConsumptionMap, view: MonthView, day: u32) -> (u8, ConsumptionMap) {
    let key = view.date_key(day);
    let next = next_quantity(current.get(&key).copied().unwrap_or(0));
    let mut updated = current.clone();
    updated.insert(key, next);
    (next, updated)
}

/// Upserts the record for one date, replacing whatever was stored for it.
pub async fn commit_day(
    store: &dyn DrinkStore,
    view: MonthView,
    day: u32,
    quantity: u8,
) -> Result<(), ConsumptionError> {
    let date_key = view.date_key(day);
    let Some(date) = view.date(day) else {
        return Err(ConsumptionError::Commit {
            source: StoreError::OutOfRange(date_key.clone()),
            date_key,
        });
    };

    store
        .upsert(date, quantity)
        .await
        .map_err(|source| ConsumptionError::Commit {
            date_key: date_key.clone(),
            source,
        })?;

    debug!(%date_key, quantity, "committed day");
    Ok(())
}

use crate::errors::StoreError;
use crate::models::DrinkRow;
use crate::storage::{DrinkStore, StoreFuture};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory drinks table that records traffic and fails or stalls on demand.
#[derive(Default)]
pub struct ScriptedStore {
    rows: Mutex<BTreeMap<NaiveDate, u8>>,
    upserts: Mutex<Vec<(NaiveDate, u8)>>,
    fetched: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    held: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    held_upserts: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    fail_fetch: AtomicBool,
    fail_upsert: AtomicBool,
}

impl ScriptedStore {
    pub fn with_rows(rows: &[(NaiveDate, u8)]) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().extend(rows.iter().copied());
        store
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upsert.store(fail, Ordering::SeqCst);
    }

    /// Stalls the fetch starting at `from` until the returned handle is notified.
    pub fn hold_fetch(&self, from: NaiveDate) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held.lock().unwrap().insert(from, Arc::clone(&notify));
        notify
    }

    /// Stalls the next write for `date` until the returned handle is notified.
    pub fn hold_upsert(&self, date: NaiveDate) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held_upserts.lock().unwrap().insert(date, Arc::clone(&notify));
        notify
    }

    pub fn upserts(&self) -> Vec<(NaiveDate, u8)> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn fetched_ranges(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn quantity_on(&self, date: NaiveDate) -> Option<u8> {
        self.rows.lock().unwrap().get(&date).copied()
    }

    fn unavailable() -> StoreError {
        StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    async fn fetch(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DrinkRow>, StoreError> {
        self.fetched.lock().unwrap().push((from, to));
        let gate = self.held.lock().unwrap().get(&from).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }

        Ok(self
            .rows
            .lock()
            .unwrap()
            .range(from..=to)
            .map(|(date, quantity)| DrinkRow {
                id: None,
                date: *date,
                quantity: *quantity,
            })
            .collect())
    }

    async fn write(&self, date: NaiveDate, quantity: u8) -> Result<(), StoreError> {
        let gate = self.held_upserts.lock().unwrap().remove(&date);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.upserts.lock().unwrap().push((date, quantity));
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.rows.lock().unwrap().insert(date, quantity);
        Ok(())
    }
}

impl DrinkStore for ScriptedStore {
    fn fetch_range(&self, from: NaiveDate, to: NaiveDate) -> StoreFuture<'_, Vec<DrinkRow>> {
        Box::pin(self.fetch(from, to))
    }

    fn upsert(&self, date: NaiveDate, quantity: u8) -> StoreFuture<'_, ()> {
        Box::pin(self.write(date, quantity))
    }
}
